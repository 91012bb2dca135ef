use std::borrow::Cow;

use shapeforge_core::Value;
use shapeforge_wire::Item;

use crate::cache::{Slot, StrategyCache};
use crate::error::EncodeError;
use crate::leaf::encode_leaf;
use crate::resolve::ObjectPlan;

use super::node::CodecNode;

pub(crate) struct Encoder<'c> {
    cache: &'c StrategyCache<CodecNode>,
    limit: u32,
}

impl<'c> Encoder<'c> {
    pub(crate) fn new(cache: &'c StrategyCache<CodecNode>, limit: u32) -> Self {
        Self { cache, limit }
    }

    pub(crate) fn encode(&self, slot: Slot, value: &Value, depth: u32) -> Result<Item, EncodeError> {
        if depth > self.limit {
            return Err(EncodeError::DepthExceeded(self.limit));
        }
        let node = self
            .cache
            .get(slot)
            .map_err(|e| EncodeError::Unsupported(e.clone()))?;

        match node {
            CodecNode::Leaf(kind) => encode_leaf(*kind, value, self.limit - depth),
            CodecNode::Enum { type_name, members } => match value {
                Value::Enum(member) if members.contains(member) => Ok(Item::Text(member.clone())),
                Value::Enum(member) => Err(EncodeError::UnknownEnumMember {
                    type_name: type_name.clone(),
                    member: member.clone(),
                }),
                other => Err(mismatch("enum", other)),
            },
            CodecNode::Nullable { element } => match value {
                Value::Null => Ok(Item::Null),
                present => self.encode(*element, present, depth),
            },
            // Composite values are references; null encodes as wire null.
            _ if value.is_null() => Ok(Item::Null),
            CodecNode::Object(plan) => self.encode_object(plan, value, depth),
            CodecNode::Sequence { element, .. } => match value {
                Value::List(items) => items
                    .iter()
                    .map(|item| self.encode(*element, item, depth + 1))
                    .collect::<Result<_, _>>()
                    .map(Item::Array),
                other => Err(mismatch("list", other)),
            },
            CodecNode::Dictionary { key, value: v, .. } => match value {
                Value::Map(entries) => entries
                    .iter()
                    .map(|(k, item)| {
                        Ok((
                            self.encode(*key, k, depth + 1)?,
                            self.encode(*v, item, depth + 1)?,
                        ))
                    })
                    .collect::<Result<_, EncodeError>>()
                    .map(Item::Map),
                other => Err(mismatch("map", other)),
            },
        }
    }

    /// One map entry per readable member, in member order. Absent optional
    /// members are left out.
    fn encode_object(
        &self,
        plan: &ObjectPlan,
        value: &Value,
        depth: u32,
    ) -> Result<Item, EncodeError> {
        let mut entries = Vec::with_capacity(plan.members.len());
        for member in &plan.members {
            let property = &member.property;
            if !property.readable {
                continue;
            }

            let field: Option<Cow<'_, Value>> = match (&property.getter, value) {
                (Some(getter), _) => getter(value).map(Cow::Owned),
                (None, Value::Record(record)) => record.get(&property.name).map(Cow::Borrowed),
                (None, other) => return Err(mismatch("record", other)),
            };

            let item = match field {
                Some(field) if field.is_null() && property.getter_nullable => Item::Null,
                Some(field) => self.encode(member.slot, &field, depth + 1)?,
                None if property.required => {
                    return Err(EncodeError::MissingMember {
                        type_name: plan.type_name.clone(),
                        member: property.name.clone(),
                    });
                }
                None => continue,
            };
            entries.push((Item::text(property.name.as_str()), item));
        }
        Ok(Item::Map(entries))
    }
}

fn mismatch(expected: &'static str, found: &Value) -> EncodeError {
    EncodeError::TypeMismatch {
        expected,
        found: found.variant_name(),
    }
}
