//! Leaf strategies for the well-known types.
//!
//! Each leaf kind has a fixed wire mapping:
//!
//! | Kind | Wire item |
//! |---|---|
//! | integers | integer (bignum tags past 64 bits) |
//! | f16 / f32 / f64 | float of the same width |
//! | decimal | tag 4 `[exponent, mantissa]` |
//! | char | one-character text |
//! | timestamp | tag 0 RFC 3339 text (tag 1 epoch seconds also accepted) |
//! | date | tag 1004 `YYYY-MM-DD` text |
//! | duration | tag 1002 `[seconds, nanoseconds]` |
//! | uuid | tag 37 16-byte string |
//! | dynamic | structural mapping of the value |
//!
//! Decoding accepts the untagged form of tagged leaves.

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeDelta, Utc};
use half::f16;
use rand::Rng;
use shapeforge_core::{Decimal, LeafKind, Value};
use shapeforge_wire::{
    Float, Int, Item, TAG_DATE_STRING, TAG_DATETIME_STRING, TAG_DECIMAL, TAG_DURATION, TAG_EPOCH,
    TAG_UUID,
};
use uuid::Uuid;

use crate::error::{DecodeError, EncodeError};

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 _-.,:;!?";

/// Last day of year 9999, counted from 0001-01-01 as day 1.
const MAX_DAYS_FROM_CE: i32 = 3_652_059;
/// 2100-01-01T00:00:00Z.
const MAX_EPOCH_SECONDS: i64 = 4_102_444_800;

pub fn encode_leaf(kind: LeafKind, value: &Value, limit: u32) -> Result<Item, EncodeError> {
    let item = match (kind, value) {
        (LeafKind::Dynamic, value) => return encode_dynamic(value, 0, limit),
        (LeafKind::Bool, Value::Bool(b)) => Item::Bool(*b),
        (k, Value::Int(v)) if k.is_integer() => integer_item(k, Int::from_i128(*v))?,
        (k, Value::UInt(v)) if k.is_integer() => integer_item(k, Int::from_u128(*v))?,
        (LeafKind::F16, Value::Float(v)) => Item::Float(Float::F16(f16::from_f64(*v))),
        (LeafKind::F32, Value::Float(v)) => Item::Float(Float::F32(*v as f32)),
        (LeafKind::F64, Value::Float(v)) => Item::Float(Float::F64(*v)),
        (LeafKind::Decimal, Value::Decimal(d)) => Item::tagged(
            TAG_DECIMAL,
            Item::Array(vec![Item::int(d.exponent as i128), Item::int(d.mantissa)]),
        ),
        (LeafKind::Char, Value::Char(c)) => Item::Text(c.to_string()),
        (LeafKind::Text, Value::Text(s)) => Item::Text(s.clone()),
        (LeafKind::Bytes, Value::Bytes(b)) => Item::Bytes(b.clone()),
        (LeafKind::Timestamp, Value::Timestamp(t)) => Item::tagged(
            TAG_DATETIME_STRING,
            Item::Text(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        ),
        (LeafKind::Date, Value::Date(d)) => {
            Item::tagged(TAG_DATE_STRING, Item::Text(d.format("%Y-%m-%d").to_string()))
        }
        (LeafKind::Duration, Value::Duration(d)) => Item::tagged(
            TAG_DURATION,
            Item::Array(vec![
                Item::int(d.num_seconds() as i128),
                Item::int(d.subsec_nanos() as i128),
            ]),
        ),
        (LeafKind::Uuid, Value::Uuid(u)) => {
            Item::tagged(TAG_UUID, Item::Bytes(u.as_bytes().to_vec()))
        }
        _ => {
            return Err(EncodeError::TypeMismatch {
                expected: kind.name(),
                found: value.variant_name(),
            });
        }
    };
    Ok(item)
}

pub fn decode_leaf(kind: LeafKind, item: &Item, limit: u32) -> Result<Value, DecodeError> {
    let mismatch = |item: &Item| DecodeError::TypeMismatch {
        expected: kind.name(),
        found: item.kind().name(),
    };

    match kind {
        LeafKind::Dynamic => decode_dynamic(item, 0, limit),
        LeafKind::Bool => match item {
            Item::Bool(b) => Ok(Value::Bool(*b)),
            other => Err(mismatch(other)),
        },
        k if k.is_integer() => match item {
            Item::Integer(int) => decode_integer(k, *int),
            other => Err(mismatch(other)),
        },
        LeafKind::F16 | LeafKind::F32 | LeafKind::F64 => match item {
            Item::Float(f) => Ok(Value::Float(f.to_f64())),
            Item::Integer(int) => match int.to_i64() {
                Some(v) => Ok(Value::Float(v as f64)),
                None => Err(out_of_range(kind, int)),
            },
            other => Err(mismatch(other)),
        },
        LeafKind::Decimal => match untag(item, TAG_DECIMAL) {
            Item::Array(parts) => match parts.as_slice() {
                [Item::Integer(exponent), Item::Integer(mantissa)] => {
                    let exponent = exponent
                        .to_i128()
                        .and_then(|e| i32::try_from(e).ok())
                        .ok_or_else(|| out_of_range(kind, exponent))?;
                    let mantissa = mantissa
                        .to_i128()
                        .ok_or_else(|| out_of_range(kind, mantissa))?;
                    Ok(Value::Decimal(Decimal::new(mantissa, exponent)))
                }
                _ => Err(invalid(kind, "expected [exponent, mantissa]")),
            },
            other => Err(mismatch(other)),
        },
        LeafKind::Char => match item {
            Item::Text(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(invalid(kind, "expected exactly one character")),
                }
            }
            other => Err(mismatch(other)),
        },
        LeafKind::Text => match item {
            Item::Text(s) => Ok(Value::Text(s.clone())),
            other => Err(mismatch(other)),
        },
        LeafKind::Bytes => match item {
            Item::Bytes(b) => Ok(Value::Bytes(b.clone())),
            other => Err(mismatch(other)),
        },
        LeafKind::Timestamp => decode_timestamp(item).unwrap_or_else(|| Err(mismatch(item))),
        LeafKind::Date => match untag(item, TAG_DATE_STRING) {
            Item::Text(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|e| invalid(kind, e.to_string())),
            other => Err(mismatch(other)),
        },
        LeafKind::Duration => match untag(item, TAG_DURATION) {
            Item::Array(parts) => match parts.as_slice() {
                [Item::Integer(secs), Item::Integer(nanos)] => {
                    let secs = secs.to_i64().ok_or_else(|| out_of_range(kind, secs))?;
                    let nanos = nanos
                        .to_i64()
                        .filter(|n| n.abs() < 1_000_000_000)
                        .ok_or_else(|| out_of_range(kind, nanos))?;
                    TimeDelta::try_seconds(secs)
                        .and_then(|d| d.checked_add(&TimeDelta::nanoseconds(nanos)))
                        .map(Value::Duration)
                        .ok_or_else(|| invalid(kind, "outside the representable range"))
                }
                _ => Err(invalid(kind, "expected [seconds, nanoseconds]")),
            },
            other => Err(mismatch(other)),
        },
        LeafKind::Uuid => match untag(item, TAG_UUID) {
            Item::Bytes(b) => Uuid::from_slice(b)
                .map(Value::Uuid)
                .map_err(|e| invalid(kind, e.to_string())),
            other => Err(mismatch(other)),
        },
        // Integer kinds are covered by the guard above.
        _ => Err(mismatch(item)),
    }
}

/// Whether `int` lies within the declared width of `kind`.
fn fits(kind: LeafKind, int: &Int) -> bool {
    if let Some((min, max)) = kind.signed_bounds() {
        return int.to_i128().is_some_and(|v| (min..=max).contains(&v));
    }
    kind.unsigned_max().zip(int.to_u128()).is_some_and(|(max, v)| v <= max)
}

fn integer_item(kind: LeafKind, int: Int) -> Result<Item, EncodeError> {
    if !fits(kind, &int) {
        return Err(EncodeError::OutOfRange {
            target: kind.name(),
            value: int.to_string(),
        });
    }
    Ok(Item::Integer(int))
}

fn decode_integer(kind: LeafKind, int: Int) -> Result<Value, DecodeError> {
    if !fits(kind, &int) {
        return Err(out_of_range(kind, &int));
    }
    let value = if kind.signed_bounds().is_some() {
        int.to_i128().map(Value::Int)
    } else {
        int.to_u128().map(Value::UInt)
    };
    value.ok_or_else(|| out_of_range(kind, &int))
}

/// `None` when the item has no timestamp form at all.
fn decode_timestamp(item: &Item) -> Option<Result<Value, DecodeError>> {
    let kind = LeafKind::Timestamp;
    let parsed = match item {
        Item::Tagged { tag: TAG_EPOCH, item } => {
            let seconds = match item.as_ref() {
                Item::Integer(int) => int.to_i64().map(|s| (s, 0)),
                Item::Float(f) => {
                    let v = f.to_f64();
                    v.is_finite().then(|| {
                        let secs = v.floor();
                        (secs as i64, ((v - secs) * 1e9) as u32)
                    })
                }
                _ => return None,
            };
            seconds
                .and_then(|(secs, nanos)| DateTime::from_timestamp(secs, nanos))
                .map(Value::Timestamp)
                .ok_or_else(|| invalid(kind, "epoch seconds outside the representable range"))
        }
        other => match untag(other, TAG_DATETIME_STRING) {
            Item::Text(s) => DateTime::parse_from_rfc3339(s)
                .map(|t| Value::Timestamp(t.with_timezone(&Utc)))
                .map_err(|e| invalid(kind, e.to_string())),
            _ => return None,
        },
    };
    Some(parsed)
}

/// Strip `tag` if present; any other item is returned unchanged.
fn untag(item: &Item, tag: u64) -> &Item {
    match item {
        Item::Tagged { tag: t, item } if *t == tag => item,
        other => other,
    }
}

fn out_of_range(kind: LeafKind, int: &Int) -> DecodeError {
    DecodeError::OutOfRange {
        target: kind.name(),
        value: int.to_string(),
    }
}

fn invalid(kind: LeafKind, reason: impl Into<String>) -> DecodeError {
    DecodeError::InvalidLeaf {
        target: kind.name(),
        reason: reason.into(),
    }
}

/// Structural encoding for untyped values.
pub fn encode_dynamic(value: &Value, depth: u32, limit: u32) -> Result<Item, EncodeError> {
    if depth > limit {
        return Err(EncodeError::DepthExceeded(limit));
    }
    let item = match value {
        Value::Null => Item::Null,
        Value::Bool(b) => Item::Bool(*b),
        Value::Int(v) => Item::Integer(Int::from_i128(*v)),
        Value::UInt(v) => Item::Integer(Int::from_u128(*v)),
        Value::Float(v) => Item::Float(Float::shortest(*v)),
        Value::Decimal(_) => encode_leaf(LeafKind::Decimal, value, limit)?,
        Value::Char(c) => Item::Text(c.to_string()),
        Value::Text(s) => Item::Text(s.clone()),
        Value::Bytes(b) => Item::Bytes(b.clone()),
        Value::Timestamp(_) => encode_leaf(LeafKind::Timestamp, value, limit)?,
        Value::Date(_) => encode_leaf(LeafKind::Date, value, limit)?,
        Value::Duration(_) => encode_leaf(LeafKind::Duration, value, limit)?,
        Value::Uuid(_) => encode_leaf(LeafKind::Uuid, value, limit)?,
        Value::Enum(member) => Item::Text(member.clone()),
        Value::Record(record) => Item::Map(
            record
                .fields
                .iter()
                .map(|(name, v)| Ok((Item::text(name), encode_dynamic(v, depth + 1, limit)?)))
                .collect::<Result<_, EncodeError>>()?,
        ),
        Value::List(items) => Item::Array(
            items
                .iter()
                .map(|v| encode_dynamic(v, depth + 1, limit))
                .collect::<Result<_, _>>()?,
        ),
        Value::Map(entries) => Item::Map(
            entries
                .iter()
                .map(|(k, v)| {
                    Ok((
                        encode_dynamic(k, depth + 1, limit)?,
                        encode_dynamic(v, depth + 1, limit)?,
                    ))
                })
                .collect::<Result<_, EncodeError>>()?,
        ),
    };
    Ok(item)
}

/// Structural decoding for untyped values; well-known tags become leaves.
pub fn decode_dynamic(item: &Item, depth: u32, limit: u32) -> Result<Value, DecodeError> {
    if depth > limit {
        return Err(DecodeError::DepthExceeded(limit));
    }
    match item {
        Item::Null => Ok(Value::Null),
        Item::Bool(b) => Ok(Value::Bool(*b)),
        Item::Integer(int) => match (int.to_i128(), int.to_u128()) {
            (Some(v), _) => Ok(Value::Int(v)),
            (None, Some(v)) => Ok(Value::UInt(v)),
            (None, None) => Err(out_of_range(LeafKind::Dynamic, int)),
        },
        Item::Float(f) => Ok(Value::Float(f.to_f64())),
        Item::Text(s) => Ok(Value::Text(s.clone())),
        Item::Bytes(b) => Ok(Value::Bytes(b.clone())),
        Item::Array(items) => items
            .iter()
            .map(|i| decode_dynamic(i, depth + 1, limit))
            .collect::<Result<_, _>>()
            .map(Value::List),
        Item::Map(entries) => entries
            .iter()
            .map(|(k, v)| {
                Ok((
                    decode_dynamic(k, depth + 1, limit)?,
                    decode_dynamic(v, depth + 1, limit)?,
                ))
            })
            .collect::<Result<_, DecodeError>>()
            .map(Value::Map),
        Item::Tagged { tag, item: inner } => match *tag {
            TAG_DATETIME_STRING | TAG_EPOCH => decode_leaf(LeafKind::Timestamp, item, limit),
            TAG_DATE_STRING => decode_leaf(LeafKind::Date, item, limit),
            TAG_DURATION => decode_leaf(LeafKind::Duration, item, limit),
            TAG_UUID => decode_leaf(LeafKind::Uuid, item, limit),
            TAG_DECIMAL => decode_leaf(LeafKind::Decimal, item, limit),
            _ => decode_dynamic(inner, depth + 1, limit),
        },
    }
}

/// Random value of a leaf kind.
///
/// Text and byte lengths stay below `size`; numbers ignore it. Floats are
/// always finite and exactly representable at their width.
pub fn generate_leaf<R: Rng + ?Sized>(kind: LeafKind, rng: &mut R, size: u32) -> Value {
    match kind {
        LeafKind::Bool => Value::Bool(rng.gen_bool(0.5)),
        LeafKind::I8 => Value::Int(rng.gen_range(i8::MIN..=i8::MAX) as i128),
        LeafKind::I16 => Value::Int(rng.gen_range(i16::MIN..=i16::MAX) as i128),
        LeafKind::I32 => Value::Int(rng.gen_range(i32::MIN..=i32::MAX) as i128),
        LeafKind::I64 => Value::Int(rng.gen_range(i64::MIN..=i64::MAX) as i128),
        LeafKind::I128 => Value::Int(rng.gen_range(i128::MIN..=i128::MAX)),
        LeafKind::U8 => Value::UInt(rng.gen_range(u8::MIN..=u8::MAX) as u128),
        LeafKind::U16 => Value::UInt(rng.gen_range(u16::MIN..=u16::MAX) as u128),
        LeafKind::U32 => Value::UInt(rng.gen_range(u32::MIN..=u32::MAX) as u128),
        LeafKind::U64 => Value::UInt(rng.gen_range(u64::MIN..=u64::MAX) as u128),
        LeafKind::U128 => Value::UInt(rng.gen_range(u128::MIN..=u128::MAX)),
        LeafKind::F16 => {
            Value::Float(f16::from_f32(rng.gen_range(-1000.0f32..1000.0)).to_f64())
        }
        LeafKind::F32 => Value::Float(rng.gen_range(-1.0e6f32..1.0e6) as f64),
        LeafKind::F64 => Value::Float(rng.gen_range(-1.0e9..1.0e9)),
        LeafKind::Decimal => Value::Decimal(Decimal::new(
            rng.gen_range(-1_000_000_000_000i128..=1_000_000_000_000),
            rng.gen_range(-6..=0),
        )),
        LeafKind::Char => Value::Char(pick_char(rng)),
        LeafKind::Text => {
            let len = crate::size::element_count(rng, size);
            Value::Text((0..len).map(|_| pick_char(rng)).collect())
        }
        LeafKind::Bytes => {
            let mut bytes = vec![0u8; crate::size::element_count(rng, size)];
            rng.fill(bytes.as_mut_slice());
            Value::Bytes(bytes)
        }
        LeafKind::Timestamp => Value::Timestamp(
            DateTime::from_timestamp(
                rng.gen_range(0..=MAX_EPOCH_SECONDS),
                rng.gen_range(0..1_000_000_000),
            )
            .unwrap_or_default(),
        ),
        LeafKind::Date => Value::Date(
            NaiveDate::from_num_days_from_ce_opt(rng.gen_range(1..=MAX_DAYS_FROM_CE))
                .unwrap_or_default(),
        ),
        LeafKind::Duration => Value::Duration(
            TimeDelta::new(
                rng.gen_range(-1_000_000_000..=1_000_000_000),
                rng.gen_range(0..1_000_000_000),
            )
            .unwrap_or_default(),
        ),
        LeafKind::Uuid => {
            let mut bytes = [0u8; 16];
            rng.fill(&mut bytes);
            Value::Uuid(Uuid::from_bytes(bytes))
        }
        LeafKind::Dynamic => generate_dynamic(rng, size),
    }
}

/// Untyped values come from a deliberately narrow set: null, booleans,
/// small integers and text.
fn generate_dynamic<R: Rng + ?Sized>(rng: &mut R, size: u32) -> Value {
    match rng.gen_range(0..4) {
        0 => Value::Null,
        1 => Value::Bool(rng.gen_bool(0.5)),
        2 => Value::Int(rng.gen_range(-1000..=1000)),
        _ => generate_leaf(LeafKind::Text, rng, size),
    }
}

fn pick_char<R: Rng + ?Sized>(rng: &mut R) -> char {
    ALPHABET[rng.gen_range(0..ALPHABET.len())] as char
}
