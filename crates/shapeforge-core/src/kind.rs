//! Canonical kind definitions.
//!
//! `Kind` is the discriminant the visitor dispatches on; `LeafKind` enumerates
//! the well-known terminal types that get a fixed strategy instead of being
//! derived from their members.

/// Shape kinds.
///
/// A container shape also carries property and constructor metadata like an
/// object does. The kind only says which handling takes precedence.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Kind {
    /// Well-known terminal type with a registered strategy.
    Leaf = 0,
    /// Record with named members (the default classification).
    Object = 1,
    /// Closed set of named values.
    Enum = 2,
    /// `T?` - a value that may be absent.
    Nullable = 3,
    /// Ordered sequence of elements.
    Enumerable = 4,
    /// Key/value collection.
    Dictionary = 5,
    /// Open polymorphic type with no statically known variant set.
    Abstract = 6,
}

impl Kind {
    /// Convert from raw discriminant.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Leaf),
            1 => Some(Self::Object),
            2 => Some(Self::Enum),
            3 => Some(Self::Nullable),
            4 => Some(Self::Enumerable),
            5 => Some(Self::Dictionary),
            6 => Some(Self::Abstract),
            _ => None,
        }
    }

    /// Whether this is a container kind (Enumerable, Dictionary).
    pub fn is_container(self) -> bool {
        matches!(self, Self::Enumerable | Self::Dictionary)
    }

    /// Whether values of this kind are built from child strategies.
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            Self::Object | Self::Nullable | Self::Enumerable | Self::Dictionary
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Leaf => "leaf",
            Self::Object => "object",
            Self::Enum => "enum",
            Self::Nullable => "nullable",
            Self::Enumerable => "enumerable",
            Self::Dictionary => "dictionary",
            Self::Abstract => "abstract",
        }
    }
}

/// Well-known leaf types.
///
/// Each leaf kind is pre-registered in every registry at the type id equal to
/// its discriminant, so `TypeId(LeafKind::Text as u32)` is always text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum LeafKind {
    Bool = 0,
    I8 = 1,
    I16 = 2,
    I32 = 3,
    I64 = 4,
    I128 = 5,
    U8 = 6,
    U16 = 7,
    U32 = 8,
    U64 = 9,
    U128 = 10,
    F16 = 11,
    F32 = 12,
    F64 = 13,
    Decimal = 14,
    Char = 15,
    Text = 16,
    Bytes = 17,
    Timestamp = 18,
    Date = 19,
    Duration = 20,
    Uuid = 21,
    /// Untyped value; handled structurally.
    Dynamic = 22,
}

impl LeafKind {
    /// All leaf kinds in discriminant order.
    pub const ALL: [LeafKind; 23] = [
        Self::Bool,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::I128,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::U128,
        Self::F16,
        Self::F32,
        Self::F64,
        Self::Decimal,
        Self::Char,
        Self::Text,
        Self::Bytes,
        Self::Timestamp,
        Self::Date,
        Self::Duration,
        Self::Uuid,
        Self::Dynamic,
    ];

    /// Convert from raw discriminant.
    pub fn from_u8(v: u8) -> Option<Self> {
        Self::ALL.get(v as usize).copied()
    }

    pub fn is_signed_integer(self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::I128
        )
    }

    pub fn is_unsigned_integer(self) -> bool {
        matches!(
            self,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::U128
        )
    }

    pub fn is_integer(self) -> bool {
        self.is_signed_integer() || self.is_unsigned_integer()
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::F16 | Self::F32 | Self::F64)
    }

    pub fn is_temporal(self) -> bool {
        matches!(self, Self::Timestamp | Self::Date | Self::Duration)
    }

    /// Inclusive bounds for integer kinds, as i128/u128 pairs.
    ///
    /// Returns `None` for non-integer kinds.
    pub fn signed_bounds(self) -> Option<(i128, i128)> {
        match self {
            Self::I8 => Some((i8::MIN as i128, i8::MAX as i128)),
            Self::I16 => Some((i16::MIN as i128, i16::MAX as i128)),
            Self::I32 => Some((i32::MIN as i128, i32::MAX as i128)),
            Self::I64 => Some((i64::MIN as i128, i64::MAX as i128)),
            Self::I128 => Some((i128::MIN, i128::MAX)),
            _ => None,
        }
    }

    pub fn unsigned_max(self) -> Option<u128> {
        match self {
            Self::U8 => Some(u8::MAX as u128),
            Self::U16 => Some(u16::MAX as u128),
            Self::U32 => Some(u32::MAX as u128),
            Self::U64 => Some(u64::MAX as u128),
            Self::U128 => Some(u128::MAX),
            _ => None,
        }
    }

    /// Display name, also used as the registered type name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::F16 => "f16",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Decimal => "decimal",
            Self::Char => "char",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Timestamp => "timestamp",
            Self::Date => "date",
            Self::Duration => "duration",
            Self::Uuid => "uuid",
            Self::Dynamic => "dynamic",
        }
    }
}
