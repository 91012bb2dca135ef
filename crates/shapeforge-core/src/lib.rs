#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Shape model for shapeforge.
//!
//! Everything the strategy engine knows about a type comes from here:
//! - **Shapes**: `TypeShape` with a closed `ShapeKind` union, properties and constructors
//! - **Identity**: `TypeId`, with the well-known leaf types at fixed ids
//! - **Values**: the dynamic `Value` model strategies read and produce
//! - **Provider**: the `ShapeProvider` query trait and the in-memory `ShapeRegistry`

mod construct;
mod kind;
mod provider;
mod registry;
mod types;
mod value;


pub use construct::{
    AddFn, ArgumentState, ConstructError, ConstructorModel, FactoryFn, GetterFn, InsertFn,
    ParameterModel, SetterFn,
};
pub use kind::{Kind, LeafKind};
pub use provider::ShapeProvider;
pub use registry::{ShapeError, ShapeRegistry, list_add, map_insert};
pub use types::{
    DictionaryShape, EnumShape, EnumerableShape, FIRST_CUSTOM_TYPE, PropertyModel, ShapeKind,
    TYPE_BOOL, TYPE_BYTES, TYPE_CHAR, TYPE_DATE, TYPE_DECIMAL, TYPE_DURATION, TYPE_DYNAMIC,
    TYPE_F16, TYPE_F32, TYPE_F64, TYPE_I8, TYPE_I16, TYPE_I32, TYPE_I64, TYPE_I128, TYPE_TEXT,
    TYPE_TIMESTAMP, TYPE_U8, TYPE_U16, TYPE_U32, TYPE_U64, TYPE_U128, TYPE_UUID, TypeId,
    TypeShape,
};
pub use value::{Decimal, Record, Value};
