#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Wire data model and binary codec.
//!
//! This crate contains:
//! - The `Item` tree, one node per encoded value (CBOR data model)
//! - Arbitrary-width integers (`Int`) and width-tagged floats (`Float`)
//! - A definite-length CBOR writer and a bounds-checked reader

mod error;
mod item;
mod read;
mod write;

#[cfg(test)]
mod item_tests;
#[cfg(test)]
mod read_tests;
#[cfg(test)]
mod write_tests;

pub use error::WireError;
pub use item::{
    Float, Int, Item, TAG_DATE_STRING, TAG_DATETIME_STRING, TAG_DECIMAL, TAG_DURATION, TAG_EPOCH,
    TAG_NEGATIVE_BIGNUM, TAG_POSITIVE_BIGNUM, TAG_UUID, WireKind,
};
pub use read::{DEFAULT_MAX_DEPTH, decode, decode_with_limit};
pub use write::{encode, encode_into};
