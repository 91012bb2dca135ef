use chrono::{DateTime, NaiveDate, TimeDelta};
use half::f16;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shapeforge_core::{Decimal, LeafKind, Value};
use shapeforge_wire::{Float, Int, Item, TAG_DATE_STRING, TAG_DATETIME_STRING, TAG_EPOCH};
use uuid::Uuid;

use super::error::{DecodeError, EncodeError};
use super::leaf::*;

const LIMIT: u32 = 64;

fn round_trip(kind: LeafKind, value: Value) -> Value {
    let item = encode_leaf(kind, &value, LIMIT).unwrap();
    decode_leaf(kind, &item, LIMIT).unwrap()
}

#[test]
fn integers_are_range_checked_on_decode() {
    let err = decode_leaf(LeafKind::U8, &Item::int(300), LIMIT).unwrap_err();
    assert_eq!(err.to_string(), "300 is out of range for u8");

    let err = decode_leaf(LeafKind::I8, &Item::int(-129), LIMIT).unwrap_err();
    assert_eq!(
        err,
        DecodeError::OutOfRange {
            target: "i8",
            value: "-129".to_owned(),
        }
    );

    let err = decode_leaf(LeafKind::U64, &Item::int(-1), LIMIT).unwrap_err();
    assert!(matches!(err, DecodeError::OutOfRange { target: "u64", .. }));

    assert_eq!(
        decode_leaf(LeafKind::I8, &Item::int(-128), LIMIT),
        Ok(Value::Int(-128))
    );
    assert_eq!(
        decode_leaf(LeafKind::U16, &Item::int(65535), LIMIT),
        Ok(Value::UInt(65535))
    );
}

#[test]
fn integers_are_range_checked_on_encode() {
    let err = encode_leaf(LeafKind::I8, &Value::Int(1000), LIMIT).unwrap_err();
    assert_eq!(err.to_string(), "1000 is out of range for i8");

    let err = encode_leaf(LeafKind::U32, &Value::Int(-1), LIMIT).unwrap_err();
    assert_eq!(
        err,
        EncodeError::OutOfRange {
            target: "u32",
            value: "-1".to_owned(),
        }
    );

    let err = encode_leaf(LeafKind::I64, &Value::UInt(u64::MAX as u128), LIMIT).unwrap_err();
    assert!(matches!(err, EncodeError::OutOfRange { target: "i64", .. }));

    assert_eq!(round_trip(LeafKind::I8, Value::Int(-128)), Value::Int(-128));
    assert_eq!(round_trip(LeafKind::U8, Value::Int(255)), Value::UInt(255));
}

#[test]
fn wide_integers_survive() {
    assert_eq!(
        round_trip(LeafKind::I128, Value::Int(i128::MIN)),
        Value::Int(i128::MIN)
    );
    assert_eq!(
        round_trip(LeafKind::U128, Value::UInt(u128::MAX)),
        Value::UInt(u128::MAX)
    );
}

#[test]
fn floats_keep_their_width() {
    let item = encode_leaf(LeafKind::F32, &Value::Float(0.5), LIMIT).unwrap();
    assert_eq!(item, Item::Float(Float::F32(0.5)));

    let item = encode_leaf(LeafKind::F16, &Value::Float(1.5), LIMIT).unwrap();
    assert_eq!(item, Item::Float(Float::F16(f16::from_f32(1.5))));

    // Integers are accepted where a float is expected.
    assert_eq!(
        decode_leaf(LeafKind::F64, &Item::int(3), LIMIT),
        Ok(Value::Float(3.0))
    );
}

#[test]
fn decimal_is_exponent_then_mantissa() {
    let value = Value::Decimal(Decimal::new(-12345, -2));
    let item = encode_leaf(LeafKind::Decimal, &value, LIMIT).unwrap();

    assert_eq!(
        item,
        Item::tagged(4, Item::Array(vec![Item::int(-2), Item::int(-12345)]))
    );
    assert_eq!(decode_leaf(LeafKind::Decimal, &item, LIMIT), Ok(value));
}

#[test]
fn char_must_be_a_single_character() {
    assert_eq!(round_trip(LeafKind::Char, Value::Char('ß')), Value::Char('ß'));

    let err = decode_leaf(LeafKind::Char, &Item::text("ab"), LIMIT).unwrap_err();
    assert_eq!(err.to_string(), "invalid char: expected exactly one character");
}

#[test]
fn timestamp_encodes_as_rfc3339_text() {
    let at = DateTime::from_timestamp(1_714_979_289, 500_000_000).unwrap();
    let item = encode_leaf(LeafKind::Timestamp, &Value::Timestamp(at), LIMIT).unwrap();

    assert_eq!(
        item,
        Item::tagged(TAG_DATETIME_STRING, Item::text("2024-05-06T07:08:09.500Z"))
    );
    assert_eq!(
        decode_leaf(LeafKind::Timestamp, &item, LIMIT),
        Ok(Value::Timestamp(at))
    );
}

#[test]
fn timestamp_accepts_epoch_seconds() {
    let item = Item::tagged(TAG_EPOCH, Item::int(86_400));
    let expected = DateTime::from_timestamp(86_400, 0).unwrap();

    assert_eq!(
        decode_leaf(LeafKind::Timestamp, &item, LIMIT),
        Ok(Value::Timestamp(expected))
    );
}

#[test]
fn untagged_forms_are_accepted() {
    let date = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
    assert_eq!(
        decode_leaf(LeafKind::Date, &Item::text("1999-12-31"), LIMIT),
        Ok(Value::Date(date))
    );
    assert_eq!(
        decode_leaf(
            LeafKind::Date,
            &Item::tagged(TAG_DATE_STRING, Item::text("1999-12-31")),
            LIMIT
        ),
        Ok(Value::Date(date))
    );
}

#[test]
fn negative_duration_round_trips() {
    let took = TimeDelta::new(-5, 300_000_000).unwrap();
    assert_eq!(
        round_trip(LeafKind::Duration, Value::Duration(took)),
        Value::Duration(took)
    );
}

#[test]
fn uuid_needs_sixteen_bytes() {
    let id = Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
    assert_eq!(round_trip(LeafKind::Uuid, Value::Uuid(id)), Value::Uuid(id));

    let err = decode_leaf(LeafKind::Uuid, &Item::Bytes(vec![1, 2, 3]), LIMIT).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidLeaf { target: "uuid", .. }));
}

#[test]
fn wire_kind_mismatch_is_reported() {
    let err = decode_leaf(LeafKind::Bool, &Item::text("yes"), LIMIT).unwrap_err();
    assert_eq!(err.to_string(), "expected bool, found text string");

    let err = encode_leaf(LeafKind::Text, &Value::Int(1), LIMIT).unwrap_err();
    assert_eq!(
        err,
        EncodeError::TypeMismatch {
            expected: "text",
            found: "int",
        }
    );
}

#[test]
fn dynamic_maps_structure_and_known_tags() {
    let value = Value::List(vec![
        Value::Null,
        Value::Float(0.25),
        Value::Map(vec![(Value::text("k"), Value::Bool(true))]),
    ]);
    let item = encode_dynamic(&value, 0, LIMIT).unwrap();
    assert_eq!(
        item,
        Item::Array(vec![
            Item::Null,
            Item::Float(Float::F16(f16::from_f32(0.25))),
            Item::Map(vec![(Item::text("k"), Item::Bool(true))]),
        ])
    );
    assert_eq!(decode_dynamic(&item, 0, LIMIT), Ok(value));

    let tagged = Item::tagged(TAG_DATE_STRING, Item::text("2020-02-29"));
    assert_eq!(
        decode_dynamic(&tagged, 0, LIMIT),
        Ok(Value::Date(NaiveDate::from_ymd_opt(2020, 2, 29).unwrap()))
    );

    // Unknown tags are looked through.
    let unknown = Item::tagged(999, Item::int(7));
    assert_eq!(decode_dynamic(&unknown, 0, LIMIT), Ok(Value::Int(7)));

    let big = Item::Integer(Int::from_u128(u128::MAX));
    assert_eq!(decode_dynamic(&big, 0, LIMIT), Ok(Value::UInt(u128::MAX)));
}

#[test]
fn dynamic_depth_is_bounded() {
    let mut item = Item::Null;
    for _ in 0..10 {
        item = Item::Array(vec![item]);
    }

    let err = decode_dynamic(&item, 0, 4).unwrap_err();
    assert_eq!(err, DecodeError::DepthExceeded(4));
}

#[test]
fn generated_text_is_shorter_than_budget() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    for _ in 0..200 {
        let Value::Text(text) = generate_leaf(LeafKind::Text, &mut rng, 6) else {
            panic!("expected text");
        };
        assert!(text.chars().count() < 6);
    }
    assert_eq!(
        generate_leaf(LeafKind::Text, &mut rng, 0),
        Value::Text(String::new())
    );
}

#[test]
fn generated_floats_are_exact_at_their_width() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    for kind in [LeafKind::F16, LeafKind::F32, LeafKind::F64] {
        for _ in 0..100 {
            let value = generate_leaf(kind, &mut rng, 8);
            let Value::Float(v) = value else {
                panic!("expected float");
            };
            assert!(v.is_finite());
            assert_eq!(round_trip(kind, value.clone()), value);
        }
    }
}

#[test]
fn generated_dynamic_values_stay_in_narrow_set() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    for _ in 0..200 {
        match generate_leaf(LeafKind::Dynamic, &mut rng, 8) {
            Value::Null | Value::Bool(_) | Value::Text(_) => {}
            Value::Int(v) => assert!((-1000..=1000).contains(&v)),
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn every_generated_leaf_round_trips() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    for kind in LeafKind::ALL {
        for _ in 0..50 {
            let value = generate_leaf(kind, &mut rng, 16);
            assert_eq!(round_trip(kind, value.clone()), value, "{}", kind.name());
        }
    }
}
