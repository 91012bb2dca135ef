//! Shape descriptors.
//!
//! A `TypeShape` is the provider's answer to "what does this type look like".
//! `ShapeKind` is a closed union: each kind carries exactly the descriptor the
//! engine needs for it, while properties and constructors sit beside it on
//! every shape.

use std::fmt;
use std::sync::Arc;

use crate::construct::{AddFn, ConstructError, ConstructorModel, GetterFn, InsertFn, SetterFn};
use crate::kind::{Kind, LeafKind};
use crate::value::Value;

/// Type identity.
///
/// Index into a registry. Ids below [`FIRST_CUSTOM_TYPE`] are the well-known
/// leaf types, one per [`LeafKind`] at the id equal to its discriminant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const fn of_leaf(kind: LeafKind) -> Self {
        Self(kind as u32)
    }

    pub fn is_builtin(self) -> bool {
        self.0 < FIRST_CUSTOM_TYPE.0
    }

    /// The leaf kind for builtin ids.
    pub fn leaf_kind(self) -> Option<LeafKind> {
        if !self.is_builtin() {
            return None;
        }
        LeafKind::from_u8(self.0 as u8)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

pub const TYPE_BOOL: TypeId = TypeId::of_leaf(LeafKind::Bool);
pub const TYPE_I8: TypeId = TypeId::of_leaf(LeafKind::I8);
pub const TYPE_I16: TypeId = TypeId::of_leaf(LeafKind::I16);
pub const TYPE_I32: TypeId = TypeId::of_leaf(LeafKind::I32);
pub const TYPE_I64: TypeId = TypeId::of_leaf(LeafKind::I64);
pub const TYPE_I128: TypeId = TypeId::of_leaf(LeafKind::I128);
pub const TYPE_U8: TypeId = TypeId::of_leaf(LeafKind::U8);
pub const TYPE_U16: TypeId = TypeId::of_leaf(LeafKind::U16);
pub const TYPE_U32: TypeId = TypeId::of_leaf(LeafKind::U32);
pub const TYPE_U64: TypeId = TypeId::of_leaf(LeafKind::U64);
pub const TYPE_U128: TypeId = TypeId::of_leaf(LeafKind::U128);
pub const TYPE_F16: TypeId = TypeId::of_leaf(LeafKind::F16);
pub const TYPE_F32: TypeId = TypeId::of_leaf(LeafKind::F32);
pub const TYPE_F64: TypeId = TypeId::of_leaf(LeafKind::F64);
pub const TYPE_DECIMAL: TypeId = TypeId::of_leaf(LeafKind::Decimal);
pub const TYPE_CHAR: TypeId = TypeId::of_leaf(LeafKind::Char);
pub const TYPE_TEXT: TypeId = TypeId::of_leaf(LeafKind::Text);
pub const TYPE_BYTES: TypeId = TypeId::of_leaf(LeafKind::Bytes);
pub const TYPE_TIMESTAMP: TypeId = TypeId::of_leaf(LeafKind::Timestamp);
pub const TYPE_DATE: TypeId = TypeId::of_leaf(LeafKind::Date);
pub const TYPE_DURATION: TypeId = TypeId::of_leaf(LeafKind::Duration);
pub const TYPE_UUID: TypeId = TypeId::of_leaf(LeafKind::Uuid);
pub const TYPE_DYNAMIC: TypeId = TypeId::of_leaf(LeafKind::Dynamic);

/// First id available to provider-defined types.
pub const FIRST_CUSTOM_TYPE: TypeId = TypeId(LeafKind::ALL.len() as u32);

/// Enum descriptor: declared member names in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumShape {
    pub members: Vec<String>,
}

impl EnumShape {
    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }
}

/// Sequence descriptor.
#[derive(Clone)]
pub struct EnumerableShape {
    pub element: TypeId,
    /// Incremental "add one element" operation, if the container is mutable.
    pub add: Option<AddFn>,
    /// Fixed-length array target: length is known before elements are built.
    pub is_array: bool,
}

/// Key/value collection descriptor.
#[derive(Clone)]
pub struct DictionaryShape {
    pub key: TypeId,
    pub value: TypeId,
    /// Incremental "insert one pair" operation, if the dictionary is mutable.
    pub insert: Option<InsertFn>,
}

/// Kind-specific part of a shape.
#[derive(Clone)]
pub enum ShapeKind {
    Leaf(LeafKind),
    Object,
    Enum(EnumShape),
    Nullable { element: TypeId },
    Enumerable(EnumerableShape),
    Dictionary(DictionaryShape),
    Abstract,
}

impl ShapeKind {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Leaf(_) => Kind::Leaf,
            Self::Object => Kind::Object,
            Self::Enum(_) => Kind::Enum,
            Self::Nullable { .. } => Kind::Nullable,
            Self::Enumerable(_) => Kind::Enumerable,
            Self::Dictionary(_) => Kind::Dictionary,
            Self::Abstract => Kind::Abstract,
        }
    }
}

impl fmt::Debug for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(leaf) => f.debug_tuple("Leaf").field(leaf).finish(),
            Self::Object => f.write_str("Object"),
            Self::Enum(shape) => f.debug_tuple("Enum").field(&shape.members).finish(),
            Self::Nullable { element } => {
                f.debug_struct("Nullable").field("element", element).finish()
            }
            Self::Enumerable(shape) => f
                .debug_struct("Enumerable")
                .field("element", &shape.element)
                .field("mutable", &shape.add.is_some())
                .field("is_array", &shape.is_array)
                .finish(),
            Self::Dictionary(shape) => f
                .debug_struct("Dictionary")
                .field("key", &shape.key)
                .field("value", &shape.value)
                .field("mutable", &shape.insert.is_some())
                .finish(),
            Self::Abstract => f.write_str("Abstract"),
        }
    }
}

/// Property or field declared on a type.
#[derive(Clone)]
pub struct PropertyModel {
    pub name: String,
    pub type_id: TypeId,
    pub readable: bool,
    pub writable: bool,
    /// Writable only during initialization.
    pub init_only: bool,
    /// Must be present when decoding.
    pub required: bool,
    /// The getter may return null even if the type is not nullable.
    pub getter_nullable: bool,
    /// The setter accepts null even if the type is not nullable.
    pub setter_nullable: bool,
    /// Custom accessor; `None` reads the record field of the same name.
    pub getter: Option<GetterFn>,
    /// Custom mutator; `None` writes the record field of the same name.
    pub setter: Option<SetterFn>,
}

impl fmt::Debug for PropertyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyModel")
            .field("name", &self.name)
            .field("type_id", &self.type_id)
            .field("readable", &self.readable)
            .field("writable", &self.writable)
            .field("init_only", &self.init_only)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

impl PropertyModel {
    /// Readable and writable property with default record access.
    pub fn new(name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            name: name.into(),
            type_id,
            readable: true,
            writable: true,
            init_only: false,
            required: false,
            getter_nullable: false,
            setter_nullable: false,
            getter: None,
            setter: None,
        }
    }

    /// Readable-only property (typically paired with a constructor parameter).
    pub fn read_only(name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            writable: false,
            ..Self::new(name, type_id)
        }
    }

    pub fn init_only(self) -> Self {
        Self {
            init_only: true,
            ..self
        }
    }

    pub fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    pub fn with_getter(
        self,
        getter: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            getter: Some(Arc::new(getter)),
            ..self
        }
    }

    pub fn with_setter(
        self,
        setter: impl Fn(&mut Value, Value) -> Result<(), ConstructError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            setter: Some(Arc::new(setter)),
            ..self
        }
    }
}

/// Complete shape of one type.
#[derive(Clone, Debug)]
pub struct TypeShape {
    pub name: String,
    pub kind: ShapeKind,
    /// Base type whose members are inherited.
    pub base: Option<TypeId>,
    /// Members declared directly on this type.
    pub properties: Vec<PropertyModel>,
    pub constructors: Vec<ConstructorModel>,
    /// Instance populated directly when no constructor is accessible.
    pub default_instance: Option<Value>,
}

impl TypeShape {
    pub fn new(name: impl Into<String>, kind: ShapeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            base: None,
            properties: Vec::new(),
            constructors: Vec::new(),
            default_instance: None,
        }
    }

    pub fn leaf(kind: LeafKind) -> Self {
        Self::new(kind.name(), ShapeKind::Leaf(kind))
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, ShapeKind::Object)
    }

    pub fn with_property(mut self, property: PropertyModel) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_constructor(mut self, constructor: ConstructorModel) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn with_base(mut self, base: TypeId) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_default_instance(mut self, instance: Value) -> Self {
        self.default_instance = Some(instance);
        self
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind.kind()
    }
}
