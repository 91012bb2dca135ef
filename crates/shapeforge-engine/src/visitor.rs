//! Shape visitor: classifies shapes and composes strategies.
//!
//! One visitor drives one synthesis session over a cache. A request first
//! consults the cache; on a miss a pending slot is registered before the
//! shape is classified, so a type reachable from itself finds that slot and
//! captures it instead of recursing. The slot is filled (or marked failed)
//! before `resolve` returns, so no pending entry outlives the call that
//! created it.
//!
//! What a strategy *is* belongs to the [`StrategyFactory`]: codecs and
//! generators share this traversal and differ only in the nodes they build.

use shapeforge_core::{
    AddFn, EnumShape, InsertFn, LeafKind, ShapeKind, ShapeProvider, TypeId, TypeShape,
};

use crate::cache::{Slot, SlotState, StrategyCache};
use crate::error::BuildError;
use crate::limits::Limits;
use crate::resolve::{self, CollectionPolicy, ObjectPlan};
use crate::trace::Tracer;

/// Composes strategy nodes for one family.
///
/// Child strategies arrive as slots; a node must not dereference them until
/// it runs.
pub trait StrategyFactory {
    type Node;

    fn leaf(&self, kind: LeafKind) -> Result<Self::Node, BuildError>;

    fn enumeration(
        &self,
        shape: &TypeShape,
        members: &EnumShape,
    ) -> Result<Self::Node, BuildError>;

    fn nullable(&self, shape: &TypeShape, element: Slot) -> Result<Self::Node, BuildError>;

    fn object(&self, shape: &TypeShape, plan: ObjectPlan) -> Result<Self::Node, BuildError>;

    fn enumerable(
        &self,
        shape: &TypeShape,
        element: Slot,
        policy: CollectionPolicy<AddFn>,
    ) -> Result<Self::Node, BuildError>;

    fn dictionary(
        &self,
        shape: &TypeShape,
        key: Slot,
        value: Slot,
        policy: CollectionPolicy<InsertFn>,
    ) -> Result<Self::Node, BuildError>;
}

/// Register the well-known leaf strategies at their fixed ids.
///
/// Called once when a cache is created; leaves are never re-derived.
pub fn seed_leaves<F: StrategyFactory>(cache: &mut StrategyCache<F::Node>, factory: &F) {
    for kind in LeafKind::ALL {
        let (found, slot) = cache.get_or_register_placeholder(TypeId::of_leaf(kind));
        if found {
            continue;
        }
        match factory.leaf(kind) {
            Ok(node) => cache.finalize(slot, node),
            Err(error) => cache.fail(slot, error),
        }
    }
}

pub struct Visitor<'a, P, F: StrategyFactory, T> {
    provider: &'a P,
    factory: &'a F,
    cache: &'a mut StrategyCache<F::Node>,
    tracer: &'a mut T,
    limits: Limits,
    depth: u32,
    /// Slots under synthesis, innermost last.
    active: Vec<Slot>,
    /// `(referrer, referenced)` pairs recorded while synthesizing.
    edges: Vec<(Slot, Slot)>,
}

impl<'a, P, F, T> Visitor<'a, P, F, T>
where
    P: ShapeProvider,
    F: StrategyFactory,
    T: Tracer,
{
    pub fn new(
        provider: &'a P,
        factory: &'a F,
        cache: &'a mut StrategyCache<F::Node>,
        tracer: &'a mut T,
        limits: Limits,
    ) -> Self {
        Self {
            provider,
            factory,
            cache,
            tracer,
            limits,
            depth: 0,
            active: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Slot holding the strategy for `type_id`, synthesizing it on first use.
    ///
    /// A failure is recorded against the type and returned again on every
    /// later request, without another synthesis attempt.
    pub fn resolve(&mut self, type_id: TypeId) -> Result<Slot, BuildError> {
        let (found, slot) = self.cache.get_or_register_placeholder(type_id);
        if let Some(&referrer) = self.active.last() {
            self.edges.push((referrer, slot));
        }
        if found {
            let name = self.name_of(type_id);
            return match self.cache.outcome(slot) {
                Some(outcome) => {
                    self.tracer.trace_cache_hit(type_id, name);
                    outcome.map(|()| slot)
                }
                None => {
                    self.tracer.trace_recursive_ref(type_id, name);
                    Ok(slot)
                }
            };
        }

        self.tracer.trace_placeholder(type_id, slot);
        let built = if self.depth >= self.limits.recursion_limit {
            Err(BuildError::RecursionLimitExceeded(self.limits.recursion_limit))
        } else {
            self.depth += 1;
            self.active.push(slot);
            let built = self.classify(type_id);
            self.active.pop();
            self.depth -= 1;
            built
        };

        let name = self.name_of(type_id);
        match built {
            Ok(node) => {
                self.cache.finalize(slot, node);
                self.tracer.trace_finalize(type_id, name);
                Ok(slot)
            }
            Err(error) => {
                self.tracer.trace_failure(type_id, name, &error);
                self.cache.fail(slot, error.clone());
                self.fail_dependents(slot, &error);
                Err(error)
            }
        }
    }

    /// Fail every strategy finished during `failed`'s synthesis that can
    /// reach it; they captured its slot while it was pending.
    ///
    /// Slots registered after `failed` were all registered during its
    /// synthesis, so only those can have been finalized against it.
    fn fail_dependents(&mut self, failed: Slot, error: &BuildError) {
        let mut reaching = vec![failed];
        let mut grew = true;
        while grew {
            grew = false;
            for &(referrer, referenced) in &self.edges {
                if referrer.index() > failed.index()
                    && reaching.contains(&referenced)
                    && !reaching.contains(&referrer)
                {
                    reaching.push(referrer);
                    grew = true;
                }
            }
        }

        for &slot in &reaching[1..] {
            if self.cache.state(slot) == SlotState::Resolved {
                self.cache.invalidate(slot, error.clone());
            }
        }
    }

    fn name_of(&self, type_id: TypeId) -> &'a str {
        let provider: &'a P = self.provider;
        provider.name_of(type_id).unwrap_or("<unknown>")
    }

    fn classify(&mut self, type_id: TypeId) -> Result<F::Node, BuildError> {
        let provider: &'a P = self.provider;
        let shape = provider
            .shape(type_id)
            .ok_or(BuildError::UnknownType(type_id))?;
        self.tracer.trace_visit(type_id, &shape.name, shape.kind());

        match &shape.kind {
            ShapeKind::Leaf(kind) => self.factory.leaf(*kind),
            ShapeKind::Enum(members) => self.factory.enumeration(shape, members),
            ShapeKind::Nullable { element } => {
                let element = self.resolve(*element)?;
                self.factory.nullable(shape, element)
            }
            ShapeKind::Dictionary(dictionary) => {
                let key = self.resolve(dictionary.key)?;
                let value = self.resolve(dictionary.value)?;
                let policy = resolve::dictionary_policy(provider, type_id, shape, dictionary);
                self.tracer
                    .trace_collection(type_id, &shape.name, policy.kind());
                self.factory.dictionary(shape, key, value, policy)
            }
            ShapeKind::Enumerable(enumerable) => {
                let element = self.resolve(enumerable.element)?;
                let policy = resolve::collection_policy(provider, type_id, shape, enumerable);
                self.tracer
                    .trace_collection(type_id, &shape.name, policy.kind());
                self.factory.enumerable(shape, element, policy)
            }
            ShapeKind::Object => {
                let members = resolve::gather_members(provider, type_id, shape)?;
                let arity = resolve::select_constructor(shape).map(|c| c.arity());
                self.tracer.trace_constructor(type_id, &shape.name, arity);
                let plan = resolve::plan_object(shape, members, |child| self.resolve(child))?;
                self.factory.object(shape, plan)
            }
            ShapeKind::Abstract => Err(BuildError::Unsupported {
                type_name: shape.name.clone(),
                reason: "open polymorphic types cannot be classified".to_owned(),
            }),
        }
    }
}
