//! Wire data model.

use std::fmt;

use half::f16;

/// RFC 3339 date/time text.
pub const TAG_DATETIME_STRING: u64 = 0;
/// Seconds since the Unix epoch.
pub const TAG_EPOCH: u64 = 1;
/// Unsigned bignum (big-endian byte string).
pub const TAG_POSITIVE_BIGNUM: u64 = 2;
/// Negative bignum: value is -1 minus the big-endian byte string.
pub const TAG_NEGATIVE_BIGNUM: u64 = 3;
/// Decimal fraction `[exponent, mantissa]`.
pub const TAG_DECIMAL: u64 = 4;
/// Binary UUID (16-byte string).
pub const TAG_UUID: u64 = 37;
/// Duration `[seconds, nanoseconds]`.
pub const TAG_DURATION: u64 = 1002;
/// Full-date text (RFC 3339 `YYYY-MM-DD`).
pub const TAG_DATE_STRING: u64 = 1004;

/// Arbitrary-width integer in the wire's sign/magnitude form.
///
/// A negative `Int` with magnitude `m` denotes `-1 - m`, so every `i128` and
/// every `u128` has exactly one representation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Int {
    pub negative: bool,
    pub magnitude: u128,
}

impl Int {
    pub fn from_i128(v: i128) -> Self {
        if v < 0 {
            Self {
                negative: true,
                magnitude: (!v) as u128,
            }
        } else {
            Self {
                negative: false,
                magnitude: v as u128,
            }
        }
    }

    pub fn from_u128(v: u128) -> Self {
        Self {
            negative: false,
            magnitude: v,
        }
    }

    pub fn to_i128(self) -> Option<i128> {
        if self.negative {
            let m = i128::try_from(self.magnitude).ok()?;
            Some(!m)
        } else {
            i128::try_from(self.magnitude).ok()
        }
    }

    pub fn to_u128(self) -> Option<u128> {
        (!self.negative).then_some(self.magnitude)
    }

    pub fn to_i64(self) -> Option<i64> {
        self.to_i128().and_then(|v| i64::try_from(v).ok())
    }

    /// Whether the integer needs a bignum tag on the wire.
    pub fn is_big(self) -> bool {
        self.magnitude > u64::MAX as u128
    }
}

impl From<i64> for Int {
    fn from(v: i64) -> Self {
        Self::from_i128(v as i128)
    }
}

impl From<u64> for Int {
    fn from(v: u64) -> Self {
        Self::from_u128(v as u128)
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            // -1 - m, printed without overflowing for m = u128::MAX
            match self.magnitude.checked_add(1) {
                Some(abs) => write!(f, "-{abs}"),
                None => write!(f, "-340282366920938463463374607431768211456"),
            }
        } else {
            write!(f, "{}", self.magnitude)
        }
    }
}

/// Floating-point value tagged with its wire width.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Float {
    F16(f16),
    F32(f32),
    F64(f64),
}

impl Float {
    pub fn to_f64(self) -> f64 {
        match self {
            Self::F16(v) => v.to_f64(),
            Self::F32(v) => v as f64,
            Self::F64(v) => v,
        }
    }

    /// Narrowest width that represents `v` exactly.
    pub fn shortest(v: f64) -> Self {
        let half = f16::from_f64(v);
        if half.to_f64() == v || (v.is_nan() && half.is_nan()) {
            return Self::F16(half);
        }
        let single = v as f32;
        if single as f64 == v {
            return Self::F32(single);
        }
        Self::F64(v)
    }

    /// Width in bits.
    pub fn width(self) -> u8 {
        match self {
            Self::F16(_) => 16,
            Self::F32(_) => 32,
            Self::F64(_) => 64,
        }
    }
}

/// Wire item kinds, for error reporting.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum WireKind {
    Null,
    Bool,
    Integer,
    Float,
    Text,
    Bytes,
    Array,
    Map,
    Tagged,
}

impl WireKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text string",
            Self::Bytes => "byte string",
            Self::Array => "array",
            Self::Map => "map",
            Self::Tagged => "tagged item",
        }
    }
}

impl fmt::Display for WireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One encoded value.
///
/// `Map` keeps entries in wire order; duplicate keys are preserved as read.
#[derive(Clone, PartialEq, Debug)]
pub enum Item {
    Null,
    Bool(bool),
    Integer(Int),
    Float(Float),
    Text(String),
    Bytes(Vec<u8>),
    Array(Vec<Item>),
    Map(Vec<(Item, Item)>),
    Tagged { tag: u64, item: Box<Item> },
}

impl Item {
    pub fn kind(&self) -> WireKind {
        match self {
            Self::Null => WireKind::Null,
            Self::Bool(_) => WireKind::Bool,
            Self::Integer(_) => WireKind::Integer,
            Self::Float(_) => WireKind::Float,
            Self::Text(_) => WireKind::Text,
            Self::Bytes(_) => WireKind::Bytes,
            Self::Array(_) => WireKind::Array,
            Self::Map(_) => WireKind::Map,
            Self::Tagged { .. } => WireKind::Tagged,
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn int(v: i128) -> Self {
        Self::Integer(Int::from_i128(v))
    }

    pub fn tagged(tag: u64, item: Item) -> Self {
        Self::Tagged {
            tag,
            item: Box::new(item),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<Int> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Look up a text key in a map item.
    pub fn get(&self, key: &str) -> Option<&Item> {
        let Self::Map(entries) = self else {
            return None;
        };
        entries
            .iter()
            .find_map(|(k, v)| (k.as_text() == Some(key)).then_some(v))
    }
}
