//! Errors raised while building and running strategies.

use shapeforge_core::{ConstructError, TypeId};
use shapeforge_wire::WireError;

/// Strategy synthesis failure.
///
/// Recorded in the cache against the offending type and returned unchanged
/// on every later request for it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// The shape cannot be classified into a supported kind.
    #[error("type `{type_name}` is not supported: {reason}")]
    Unsupported { type_name: String, reason: String },

    /// The provider has no shape for this id.
    #[error("unknown type id {}", .0.0)]
    UnknownType(TypeId),

    /// A container exposes neither a mutable builder nor a sequence constructor.
    #[error("type `{type_name}` has no usable construction strategy")]
    NoConstructionStrategy { type_name: String },

    #[error("shape nesting exceeds the recursion limit of {0}")]
    RecursionLimitExceeded(u32),
}

/// Per-value encoding failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{member}` is not a member of enum `{type_name}`")]
    UnknownEnumMember { type_name: String, member: String },

    #[error("`{type_name}` value has no readable `{member}`")]
    MissingMember { type_name: String, member: String },

    #[error("{value} is out of range for {target}")]
    OutOfRange { target: &'static str, value: String },

    #[error("value nesting exceeds {0} levels")]
    DepthExceeded(u32),

    /// The strategy reached a type whose synthesis failed.
    #[error(transparent)]
    Unsupported(BuildError),
}

/// Per-value decoding failure. Never affects the cached strategy.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{member}` is not a member of enum `{type_name}`")]
    UnknownEnumMember { type_name: String, member: String },

    #[error("{value} is out of range for {target}")]
    OutOfRange { target: &'static str, value: String },

    #[error("missing required member `{member}` of `{type_name}`")]
    MissingRequired { type_name: String, member: String },

    /// Well-typed wire item with invalid content (bad date text, wrong uuid length...).
    #[error("invalid {target}: {reason}")]
    InvalidLeaf { target: &'static str, reason: String },

    #[error(transparent)]
    Unsupported(BuildError),

    #[error(transparent)]
    Construct(#[from] ConstructError),

    #[error("item nesting exceeds {0} levels")]
    DepthExceeded(u32),

    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Per-value generation failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Construct(#[from] ConstructError),

    #[error(transparent)]
    Unsupported(BuildError),
}
