use shapeforge_core::{AddFn, InsertFn, Value};
use shapeforge_wire::Item;

use crate::cache::{Slot, StrategyCache};
use crate::error::{BuildError, DecodeError};
use crate::leaf::decode_leaf;
use crate::resolve::{CollectionPolicy, Construction, ObjectPlan};

use super::node::CodecNode;

pub(crate) struct Decoder<'c> {
    cache: &'c StrategyCache<CodecNode>,
    limit: u32,
}

impl<'c> Decoder<'c> {
    pub(crate) fn new(cache: &'c StrategyCache<CodecNode>, limit: u32) -> Self {
        Self { cache, limit }
    }

    pub(crate) fn decode(&self, slot: Slot, item: &Item, depth: u32) -> Result<Value, DecodeError> {
        if depth > self.limit {
            return Err(DecodeError::DepthExceeded(self.limit));
        }
        let node = self
            .cache
            .get(slot)
            .map_err(|e| DecodeError::Unsupported(e.clone()))?;

        match node {
            CodecNode::Leaf(kind) => decode_leaf(*kind, item, self.limit - depth),
            CodecNode::Enum { type_name, members } => match item {
                Item::Text(name) if members.contains(name) => Ok(Value::Enum(name.clone())),
                Item::Text(name) => Err(DecodeError::UnknownEnumMember {
                    type_name: type_name.clone(),
                    member: name.clone(),
                }),
                other => Err(mismatch("enum member name", other)),
            },
            CodecNode::Nullable { element } => match item {
                Item::Null => Ok(Value::Null),
                present => self.decode(*element, present, depth),
            },
            CodecNode::Object(plan) => match item {
                Item::Null => Ok(Value::Null),
                item => self.decode_object(plan, item, depth),
            },
            CodecNode::Sequence { element, policy } => {
                self.decode_sequence(*element, policy, item, depth)
            }
            CodecNode::Dictionary {
                type_name,
                key,
                value,
                policy,
            } => self.decode_dictionary(type_name, *key, *value, policy, item, depth),
        }
    }

    /// Read-only containers fail before the item is looked at.
    fn decode_sequence(
        &self,
        element: Slot,
        policy: &CollectionPolicy<AddFn>,
        item: &Item,
        depth: u32,
    ) -> Result<Value, DecodeError> {
        let items = match (policy, item) {
            (CollectionPolicy::ReadOnly(error), _) => {
                return Err(DecodeError::Unsupported(error.clone()));
            }
            (_, Item::Null) => return Ok(Value::Null),
            (_, Item::Array(items)) => items,
            (_, other) => return Err(mismatch("array", other)),
        };
        let decode_all = || -> Result<Vec<Value>, DecodeError> {
            items
                .iter()
                .map(|item| self.decode(element, item, depth + 1))
                .collect()
        };

        match policy {
            CollectionPolicy::FixedLength => decode_all().map(Value::List),
            CollectionPolicy::Mutable { constructor, op } => {
                let mut target = constructor.invoke_default()?;
                for item in items {
                    let value = self.decode(element, item, depth + 1)?;
                    op(&mut target, value)?;
                }
                Ok(target)
            }
            CollectionPolicy::FromSequence { constructor } => {
                let mut state = constructor.argument_state();
                state.set(0, Value::List(decode_all()?))?;
                Ok(constructor.build(state)?)
            }
            CollectionPolicy::ReadOnly(error) => Err(DecodeError::Unsupported(error.clone())),
        }
    }

    fn decode_dictionary(
        &self,
        type_name: &str,
        key: Slot,
        value: Slot,
        policy: &CollectionPolicy<InsertFn>,
        item: &Item,
        depth: u32,
    ) -> Result<Value, DecodeError> {
        let entries = match (policy, item) {
            (CollectionPolicy::ReadOnly(error), _) => {
                return Err(DecodeError::Unsupported(error.clone()));
            }
            (CollectionPolicy::FixedLength, _) => return Err(no_strategy(type_name)),
            (_, Item::Null) => return Ok(Value::Null),
            (_, Item::Map(entries)) => entries,
            (_, other) => return Err(mismatch("map", other)),
        };
        let decode_pair = |(k, v): &(Item, Item)| -> Result<(Value, Value), DecodeError> {
            Ok((
                self.decode(key, k, depth + 1)?,
                self.decode(value, v, depth + 1)?,
            ))
        };

        match policy {
            CollectionPolicy::Mutable { constructor, op } => {
                let mut target = constructor.invoke_default()?;
                for entry in entries {
                    let (k, v) = decode_pair(entry)?;
                    op(&mut target, k, v)?;
                }
                Ok(target)
            }
            CollectionPolicy::FromSequence { constructor } => {
                let pairs = entries.iter().map(decode_pair).collect::<Result<_, _>>()?;
                let mut state = constructor.argument_state();
                state.set(0, Value::Map(pairs))?;
                Ok(constructor.build(state)?)
            }
            CollectionPolicy::ReadOnly(error) => Err(DecodeError::Unsupported(error.clone())),
            CollectionPolicy::FixedLength => Err(no_strategy(type_name)),
        }
    }

    /// Gather constructor arguments and setter values from the map, build
    /// once, then run setters in member order.
    ///
    /// Keys that match no member are skipped. A repeated key keeps its last
    /// value.
    fn decode_object(
        &self,
        plan: &ObjectPlan,
        item: &Item,
        depth: u32,
    ) -> Result<Value, DecodeError> {
        let Item::Map(entries) = item else {
            return Err(mismatch("map", item));
        };

        let mut state = match &plan.construction {
            Construction::Constructor { constructor, .. } => Some(constructor.argument_state()),
            Construction::Instance(_) => None,
        };
        let mut seen = vec![false; plan.members.len()];
        let mut setters: Vec<(usize, Value)> = Vec::new();

        for (key, item) in entries {
            let Some(key) = key.as_text() else {
                continue;
            };

            if let Some(param) = plan.parameters().iter().find(|p| p.key == key) {
                let value = self.decode(param.slot, item, depth + 1)?;
                if let Some(state) = &mut state {
                    state.set(param.parameter.position, value)?;
                }
                if let Some(member) = param.member {
                    seen[member] = true;
                }
            } else if let Some((index, member)) = plan
                .setters()
                .find(|(_, m)| m.property.name == key)
            {
                let value = match item {
                    Item::Null if member.property.setter_nullable => Value::Null,
                    item => self.decode(member.slot, item, depth + 1)?,
                };
                seen[index] = true;
                setters.push((index, value));
            }
        }

        if let Some(missing) = plan
            .members
            .iter()
            .zip(&seen)
            .find_map(|(m, &seen)| (m.property.required && !seen).then_some(m))
        {
            return Err(DecodeError::MissingRequired {
                type_name: plan.type_name.clone(),
                member: missing.property.name.clone(),
            });
        }

        let mut instance = match (&plan.construction, state) {
            (Construction::Constructor { constructor, .. }, Some(state)) => {
                constructor.build(state)?
            }
            (Construction::Instance(instance), _) => instance.clone(),
            (Construction::Constructor { constructor, .. }, None) => {
                constructor.invoke_default()?
            }
        };

        setters.sort_by_key(|(index, _)| *index);
        for (index, value) in setters {
            plan.members[index].assign(&mut instance, value)?;
        }
        Ok(instance)
    }
}

fn no_strategy(type_name: &str) -> DecodeError {
    DecodeError::Unsupported(BuildError::NoConstructionStrategy {
        type_name: type_name.to_owned(),
    })
}

fn mismatch(expected: &'static str, found: &Item) -> DecodeError {
    DecodeError::TypeMismatch {
        expected,
        found: found.kind().name(),
    }
}
