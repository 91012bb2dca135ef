use rand::Rng;
use shapeforge_core::{AddFn, InsertFn, Value};

use crate::cache::{Slot, StrategyCache};
use crate::error::{BuildError, GenerateError};
use crate::leaf::generate_leaf;
use crate::resolve::{CollectionPolicy, Construction, ObjectPlan};
use crate::size;

use super::node::GenNode;

pub(crate) struct Drawer<'c> {
    cache: &'c StrategyCache<GenNode>,
}

impl<'c> Drawer<'c> {
    pub(crate) fn new(cache: &'c StrategyCache<GenNode>) -> Self {
        Self { cache }
    }

    pub(crate) fn draw<R: Rng + ?Sized>(
        &self,
        slot: Slot,
        rng: &mut R,
        size: u32,
    ) -> Result<Value, GenerateError> {
        let node = self
            .cache
            .get(slot)
            .map_err(|e| GenerateError::Unsupported(e.clone()))?;

        match node {
            GenNode::Leaf(kind) => Ok(generate_leaf(*kind, rng, size)),
            GenNode::Enum { members } => {
                let index = rng.gen_range(0..members.len());
                Ok(Value::Enum(members[index].clone()))
            }
            GenNode::Nullable { element } => {
                if rng.gen_bool(0.5) {
                    Ok(Value::Null)
                } else {
                    self.draw(*element, rng, size.saturating_sub(1))
                }
            }
            GenNode::Object(_) if size == 0 => Ok(Value::Null),
            GenNode::Object(plan) => self.draw_object(plan, rng, size),
            GenNode::Sequence { element, policy } => {
                self.draw_sequence(*element, policy, rng, size)
            }
            GenNode::Dictionary {
                type_name,
                key,
                value,
                policy,
            } => self.draw_dictionary(type_name, *key, *value, policy, rng, size),
        }
    }

    /// Constructor arguments first, then setters, all sharing one budget.
    fn draw_object<R: Rng + ?Sized>(
        &self,
        plan: &ObjectPlan,
        rng: &mut R,
        size: u32,
    ) -> Result<Value, GenerateError> {
        let budget = size::descend(size, plan.child_count());

        let mut instance = match &plan.construction {
            Construction::Constructor {
                constructor,
                parameters,
            } => {
                let mut state = constructor.argument_state();
                for param in parameters {
                    let value = self.draw(param.slot, rng, budget)?;
                    state.set(param.parameter.position, value)?;
                }
                constructor.build(state)?
            }
            Construction::Instance(instance) => instance.clone(),
        };

        for (_, member) in plan.setters() {
            let value = self.draw(member.slot, rng, budget)?;
            member.assign(&mut instance, value)?;
        }
        Ok(instance)
    }

    fn draw_sequence<R: Rng + ?Sized>(
        &self,
        element: Slot,
        policy: &CollectionPolicy<AddFn>,
        rng: &mut R,
        size: u32,
    ) -> Result<Value, GenerateError> {
        let count = size::element_count(rng, size);
        let budget = size::descend(size, count);

        match policy {
            CollectionPolicy::FixedLength => {
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.draw(element, rng, budget)?);
                }
                Ok(Value::List(items))
            }
            CollectionPolicy::Mutable { constructor, op } => {
                let mut target = constructor.invoke_default()?;
                for _ in 0..count {
                    let item = self.draw(element, rng, budget)?;
                    op(&mut target, item)?;
                }
                Ok(target)
            }
            CollectionPolicy::FromSequence { constructor } => {
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.draw(element, rng, budget)?);
                }
                let mut state = constructor.argument_state();
                state.set(0, Value::List(items))?;
                Ok(constructor.build(state)?)
            }
            CollectionPolicy::ReadOnly(error) => Err(GenerateError::Unsupported(error.clone())),
        }
    }

    /// Keys drawn twice keep the later value.
    fn draw_dictionary<R: Rng + ?Sized>(
        &self,
        type_name: &str,
        key: Slot,
        value: Slot,
        policy: &CollectionPolicy<InsertFn>,
        rng: &mut R,
        size: u32,
    ) -> Result<Value, GenerateError> {
        let count = size::element_count(rng, size);
        let budget = size::descend(size, count);

        match policy {
            CollectionPolicy::Mutable { constructor, op } => {
                let mut target = constructor.invoke_default()?;
                for _ in 0..count {
                    let k = self.draw(key, rng, budget)?;
                    let v = self.draw(value, rng, budget)?;
                    op(&mut target, k, v)?;
                }
                Ok(target)
            }
            CollectionPolicy::FromSequence { constructor } => {
                let mut pairs: Vec<(Value, Value)> = Vec::with_capacity(count);
                for _ in 0..count {
                    let k = self.draw(key, rng, budget)?;
                    let v = self.draw(value, rng, budget)?;
                    match pairs.iter_mut().find(|(existing, _)| *existing == k) {
                        Some(slot) => slot.1 = v,
                        None => pairs.push((k, v)),
                    }
                }
                let mut state = constructor.argument_state();
                state.set(0, Value::Map(pairs))?;
                Ok(constructor.build(state)?)
            }
            CollectionPolicy::ReadOnly(error) => Err(GenerateError::Unsupported(error.clone())),
            CollectionPolicy::FixedLength => Err(no_strategy(type_name)),
        }
    }
}

fn no_strategy(type_name: &str) -> GenerateError {
    GenerateError::Unsupported(BuildError::NoConstructionStrategy {
        type_name: type_name.to_owned(),
    })
}
