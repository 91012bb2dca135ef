use std::cell::RefCell;
use std::collections::HashMap;

use shapeforge_core::{
    AddFn, EnumShape, InsertFn, LeafKind, PropertyModel, ShapeRegistry, TYPE_I32, TypeId,
    TypeShape,
};

use super::cache::{Slot, SlotState, StrategyCache};
use super::error::BuildError;
use super::limits::Limits;
use super::resolve::{CollectionPolicy, ObjectPlan};
use super::test_shapes;
use super::trace::NoopTracer;
use super::visitor::*;

/// Records which composite shapes were composed, by name.
#[derive(Default)]
struct CountingFactory {
    built: RefCell<HashMap<String, usize>>,
}

impl CountingFactory {
    fn bump(&self, shape: &TypeShape) -> Result<String, BuildError> {
        *self.built.borrow_mut().entry(shape.name.clone()).or_default() += 1;
        Ok(shape.name.clone())
    }

    fn count(&self, name: &str) -> usize {
        self.built.borrow().get(name).copied().unwrap_or(0)
    }
}

impl StrategyFactory for CountingFactory {
    type Node = String;

    fn leaf(&self, kind: LeafKind) -> Result<String, BuildError> {
        Ok(kind.name().to_owned())
    }

    fn enumeration(&self, shape: &TypeShape, _members: &EnumShape) -> Result<String, BuildError> {
        self.bump(shape)
    }

    fn nullable(&self, shape: &TypeShape, _element: Slot) -> Result<String, BuildError> {
        self.bump(shape)
    }

    fn object(&self, shape: &TypeShape, _plan: ObjectPlan) -> Result<String, BuildError> {
        self.bump(shape)
    }

    fn enumerable(
        &self,
        shape: &TypeShape,
        _element: Slot,
        _policy: CollectionPolicy<AddFn>,
    ) -> Result<String, BuildError> {
        self.bump(shape)
    }

    fn dictionary(
        &self,
        shape: &TypeShape,
        _key: Slot,
        _value: Slot,
        _policy: CollectionPolicy<InsertFn>,
    ) -> Result<String, BuildError> {
        self.bump(shape)
    }
}

fn resolve_all(
    registry: &ShapeRegistry,
    factory: &CountingFactory,
    cache: &mut StrategyCache<String>,
    limits: Limits,
    types: &[TypeId],
) -> Vec<Result<Slot, BuildError>> {
    let mut tracer = NoopTracer;
    let mut visitor = Visitor::new(registry, factory, cache, &mut tracer, limits);
    types.iter().map(|&ty| visitor.resolve(ty)).collect()
}

#[test]
fn leaves_are_seeded_at_their_ids() {
    let factory = CountingFactory::default();
    let mut cache = StrategyCache::new();

    seed_leaves(&mut cache, &factory);

    assert_eq!(cache.len(), LeafKind::ALL.len());
    for kind in LeafKind::ALL {
        let slot = cache.slot_of(TypeId::of_leaf(kind)).unwrap();
        assert_eq!(cache.get(slot).unwrap(), kind.name());
    }
}

#[test]
fn each_type_is_composed_once() {
    let mut registry = ShapeRegistry::new();
    let (left, right) = test_shapes::mutual(&mut registry);
    let node = test_shapes::linked_node(&mut registry);
    let factory = CountingFactory::default();
    let mut cache = StrategyCache::new();
    seed_leaves(&mut cache, &factory);

    let results = resolve_all(
        &registry,
        &factory,
        &mut cache,
        Limits::default(),
        &[left, right, node, left, node],
    );

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(results[0], results[3]);
    for name in ["Left", "Right", "Left?", "Right?", "List<Left>", "Node", "Node?"] {
        assert_eq!(factory.count(name), 1, "{name}");
    }
    assert_eq!(cache.pending_count(), 0);
}

#[test]
fn recursion_limit_fails_the_whole_chain() {
    let mut registry = ShapeRegistry::new();
    let mut next = TYPE_I32;
    let mut chain = Vec::new();
    for depth in (0..6).rev() {
        next = registry
            .define(
                TypeShape::object(format!("Level{depth}"))
                    .with_property(PropertyModel::new("inner", next)),
            )
            .unwrap();
        chain.push(next);
    }
    chain.reverse();

    let factory = CountingFactory::default();
    let mut cache = StrategyCache::new();
    seed_leaves(&mut cache, &factory);
    let limits = Limits::default().with_recursion_limit(3);

    let results = resolve_all(&registry, &factory, &mut cache, limits, &[chain[0]]);

    assert_eq!(results[0], Err(BuildError::RecursionLimitExceeded(3)));
    for &ty in &chain[..4] {
        let slot = cache.slot_of(ty).unwrap();
        assert_eq!(cache.state(slot), SlotState::Failed);
    }
    // Never reached.
    assert_eq!(cache.slot_of(chain[4]), None);
    assert_eq!(cache.pending_count(), 0);
    assert_eq!(factory.count("Level0"), 0);
}

#[test]
fn abstract_types_are_rejected() {
    let mut registry = ShapeRegistry::new();
    let any = registry.define_abstract("Any").unwrap();
    let factory = CountingFactory::default();
    let mut cache = StrategyCache::new();

    let results = resolve_all(&registry, &factory, &mut cache, Limits::default(), &[any]);

    assert!(matches!(
        &results[0],
        Err(BuildError::Unsupported { type_name, .. }) if type_name == "Any"
    ));
}

/// `Outer { inner: Inner, broken: Any }` and `Inner { outer: Outer? }`,
/// where `Any` cannot be classified.
fn cycle_through_unsupported(registry: &mut ShapeRegistry) -> [TypeId; 3] {
    let any = registry.define_abstract("Any").unwrap();
    let outer = registry.declare("Outer").unwrap();
    let inner = registry.declare("Inner").unwrap();
    let maybe_outer = registry.nullable_of(outer);
    registry
        .complete(
            outer,
            TypeShape::object("Outer")
                .with_property(PropertyModel::new("inner", inner))
                .with_property(PropertyModel::new("broken", any)),
        )
        .unwrap();
    registry
        .complete(
            inner,
            TypeShape::object("Inner").with_property(PropertyModel::new("outer", maybe_outer)),
        )
        .unwrap();
    [outer, inner, maybe_outer]
}

#[test]
fn failure_in_a_cycle_reaches_types_finished_before_it() {
    let mut registry = ShapeRegistry::new();
    let [outer, inner, maybe_outer] = cycle_through_unsupported(&mut registry);
    let factory = CountingFactory::default();
    let mut cache = StrategyCache::new();
    seed_leaves(&mut cache, &factory);

    let results = resolve_all(
        &registry,
        &factory,
        &mut cache,
        Limits::default(),
        &[outer, inner],
    );

    let expected: Result<Slot, BuildError> = Err(BuildError::Unsupported {
        type_name: "Any".to_owned(),
        reason: "open polymorphic types cannot be classified".to_owned(),
    });
    assert_eq!(results, [expected.clone(), expected]);
    // Composed while `Outer` was pending, then failed along with it.
    assert_eq!(factory.count("Inner"), 1);
    assert_eq!(factory.count("Outer?"), 1);
    for ty in [outer, inner, maybe_outer] {
        let slot = cache.slot_of(ty).unwrap();
        assert_eq!(cache.state(slot), SlotState::Failed);
    }
    assert_eq!(cache.pending_count(), 0);
}

#[test]
fn failure_in_a_cycle_is_the_same_from_either_end() {
    let mut registry = ShapeRegistry::new();
    let [outer, inner, maybe_outer] = cycle_through_unsupported(&mut registry);

    let mut outcomes = Vec::new();
    for order in [[outer, inner], [inner, outer]] {
        let factory = CountingFactory::default();
        let mut cache = StrategyCache::new();
        seed_leaves(&mut cache, &factory);

        let results = resolve_all(&registry, &factory, &mut cache, Limits::default(), &order);

        assert!(results.iter().all(Result::is_err));
        for ty in [outer, inner, maybe_outer] {
            let slot = cache.slot_of(ty).unwrap();
            assert_eq!(cache.state(slot), SlotState::Failed);
        }
        outcomes.push(results.into_iter().map(Result::unwrap_err).collect::<Vec<_>>());
    }
    assert_eq!(outcomes[0], outcomes[1]);
}

#[test]
fn finished_types_outside_the_failing_cycle_stay_resolved() {
    let mut registry = ShapeRegistry::new();
    let pair = test_shapes::pair(&mut registry);
    let any = registry.define_abstract("Any").unwrap();
    let holder = registry
        .define(
            TypeShape::object("Holder")
                .with_property(PropertyModel::new("pair", pair))
                .with_property(PropertyModel::new("broken", any)),
        )
        .unwrap();
    let factory = CountingFactory::default();
    let mut cache = StrategyCache::new();
    seed_leaves(&mut cache, &factory);

    let results = resolve_all(&registry, &factory, &mut cache, Limits::default(), &[holder]);

    assert!(results[0].is_err());
    let slot = cache.slot_of(pair).unwrap();
    assert_eq!(cache.state(slot), SlotState::Resolved);
}
