//! Shape-driven strategy synthesis.
//!
//! Given a [`ShapeProvider`](shapeforge_core::ShapeProvider), this crate
//! derives a strategy per type, caches it, and reuses it for every later
//! request. Two strategy families share one traversal:
//! - **Codecs**: encode values to wire items (and bytes) and decode them back
//! - **Generators**: produce random values under a shrinking size budget
//!
//! # Example
//!
//! ```
//! use shapeforge_core::{PropertyModel, Record, ShapeRegistry, TYPE_I32, TypeShape, Value};
//! use shapeforge_engine::Codecs;
//!
//! let mut registry = ShapeRegistry::new();
//! let point = registry
//!     .define(
//!         TypeShape::object("Point")
//!             .with_property(PropertyModel::new("x", TYPE_I32))
//!             .with_property(PropertyModel::new("y", TYPE_I32)),
//!     )
//!     .expect("fresh registry");
//!
//! let mut codecs = Codecs::new(&registry);
//! let codec = codecs.build(point).expect("point is supported");
//!
//! let value = Value::Record(
//!     Record::new("Point")
//!         .with("x", Value::Int(1))
//!         .with("y", Value::Int(2)),
//! );
//! let bytes = codec.to_bytes(&value).expect("encodes");
//! assert_eq!(codec.from_bytes(&bytes).expect("decodes"), value);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod cache;
pub mod codec;
pub mod error;
pub mod generate;
mod invariants;
pub mod leaf;
pub mod limits;
pub mod resolve;
pub mod size;
pub mod trace;
pub mod visitor;

#[cfg(test)]
mod leaf_tests;
#[cfg(test)]
mod test_shapes;
#[cfg(test)]
mod visitor_tests;

pub use cache::{Slot, SlotState, StrategyCache};
pub use codec::{Codec, CodecFactory, CodecNode, Codecs};
pub use error::{BuildError, DecodeError, EncodeError, GenerateError};
pub use generate::{GenNode, Generator, GeneratorFactory, Generators};
pub use limits::Limits;
pub use resolve::{CollectionPolicy, PolicyKind};
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
pub use visitor::{StrategyFactory, Visitor};
