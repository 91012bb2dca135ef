//! Generator strategy nodes.

use shapeforge_core::{AddFn, EnumShape, InsertFn, LeafKind, TypeShape};

use crate::cache::Slot;
use crate::error::BuildError;
use crate::resolve::{CollectionPolicy, ObjectPlan};
use crate::visitor::StrategyFactory;

/// One random-value generator. Children are referenced by slot.
pub enum GenNode {
    Leaf(LeafKind),
    Enum {
        members: Vec<String>,
    },
    Nullable {
        element: Slot,
    },
    Object(ObjectPlan),
    Sequence {
        element: Slot,
        policy: CollectionPolicy<AddFn>,
    },
    Dictionary {
        type_name: String,
        key: Slot,
        value: Slot,
        policy: CollectionPolicy<InsertFn>,
    },
}

/// Builds generator nodes.
///
/// Unlike codecs, a generator must be able to produce values, so read-only
/// containers and member-less enums are rejected at build time.
pub struct GeneratorFactory;

impl StrategyFactory for GeneratorFactory {
    type Node = GenNode;

    fn leaf(&self, kind: LeafKind) -> Result<GenNode, BuildError> {
        Ok(GenNode::Leaf(kind))
    }

    fn enumeration(&self, shape: &TypeShape, members: &EnumShape) -> Result<GenNode, BuildError> {
        if members.members.is_empty() {
            return Err(BuildError::Unsupported {
                type_name: shape.name.clone(),
                reason: "enum has no members to choose from".to_owned(),
            });
        }
        Ok(GenNode::Enum {
            members: members.members.clone(),
        })
    }

    fn nullable(&self, _shape: &TypeShape, element: Slot) -> Result<GenNode, BuildError> {
        Ok(GenNode::Nullable { element })
    }

    fn object(&self, _shape: &TypeShape, plan: ObjectPlan) -> Result<GenNode, BuildError> {
        Ok(GenNode::Object(plan))
    }

    fn enumerable(
        &self,
        _shape: &TypeShape,
        element: Slot,
        policy: CollectionPolicy<AddFn>,
    ) -> Result<GenNode, BuildError> {
        if let CollectionPolicy::ReadOnly(error) = &policy {
            return Err(error.clone());
        }
        Ok(GenNode::Sequence { element, policy })
    }

    fn dictionary(
        &self,
        shape: &TypeShape,
        key: Slot,
        value: Slot,
        policy: CollectionPolicy<InsertFn>,
    ) -> Result<GenNode, BuildError> {
        if let CollectionPolicy::ReadOnly(error) = &policy {
            return Err(error.clone());
        }
        Ok(GenNode::Dictionary {
            type_name: shape.name.clone(),
            key,
            value,
            policy,
        })
    }
}
