//! Codec strategy nodes.

use shapeforge_core::{AddFn, EnumShape, InsertFn, LeafKind, TypeShape};

use crate::cache::Slot;
use crate::error::BuildError;
use crate::resolve::{CollectionPolicy, ObjectPlan};
use crate::visitor::StrategyFactory;

/// One encoder/decoder pair. Children are referenced by slot.
pub enum CodecNode {
    Leaf(LeafKind),
    Enum {
        type_name: String,
        members: EnumShape,
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

/// Builds codec nodes. Every classified shape gets a codec; read-only
/// containers still encode and report the error recorded in their policy on
/// decode.
pub struct CodecFactory;

impl StrategyFactory for CodecFactory {
    type Node = CodecNode;

    fn leaf(&self, kind: LeafKind) -> Result<CodecNode, BuildError> {
        Ok(CodecNode::Leaf(kind))
    }

    fn enumeration(&self, shape: &TypeShape, members: &EnumShape) -> Result<CodecNode, BuildError> {
        Ok(CodecNode::Enum {
            type_name: shape.name.clone(),
            members: members.clone(),
        })
    }

    fn nullable(&self, _shape: &TypeShape, element: Slot) -> Result<CodecNode, BuildError> {
        Ok(CodecNode::Nullable { element })
    }

    fn object(&self, _shape: &TypeShape, plan: ObjectPlan) -> Result<CodecNode, BuildError> {
        Ok(CodecNode::Object(plan))
    }

    fn enumerable(
        &self,
        _shape: &TypeShape,
        element: Slot,
        policy: CollectionPolicy<AddFn>,
    ) -> Result<CodecNode, BuildError> {
        Ok(CodecNode::Sequence { element, policy })
    }

    fn dictionary(
        &self,
        shape: &TypeShape,
        key: Slot,
        value: Slot,
        policy: CollectionPolicy<InsertFn>,
    ) -> Result<CodecNode, BuildError> {
        Ok(CodecNode::Dictionary {
            type_name: shape.name.clone(),
            key,
            value,
            policy,
        })
    }
}
