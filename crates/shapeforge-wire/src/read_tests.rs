use super::error::WireError;
use super::item::*;
use super::read::*;
use super::write::encode;

#[test]
fn decodes_what_was_encoded() {
    let item = Item::Map(vec![
        (Item::text("id"), Item::int(-70000)),
        (
            Item::text("tags"),
            Item::Array(vec![Item::text("x"), Item::Bool(true), Item::Null]),
        ),
        (Item::text("raw"), Item::Bytes(vec![0, 255])),
        (
            Item::text("at"),
            Item::tagged(TAG_DATETIME_STRING, Item::text("2024-01-01T00:00:00Z")),
        ),
        (Item::text("ratio"), Item::Float(Float::F64(0.1))),
    ]);

    assert_eq!(decode(&encode(&item)).unwrap(), item);
}

#[test]
fn bignums_fold_into_integers() {
    let bytes = [0xc2, 0x49, 0x01, 0, 0, 0, 0, 0, 0, 0, 0];
    assert_eq!(decode(&bytes).unwrap(), Item::int(1 << 64));

    let extreme = Item::Integer(Int::from_u128(u128::MAX));
    assert_eq!(decode(&encode(&extreme)).unwrap(), extreme);

    let lowest = Item::int(i128::MIN);
    assert_eq!(decode(&encode(&lowest)).unwrap(), lowest);
}

#[test]
fn oversized_bignum_stays_tagged() {
    let mut bytes = vec![0xc2, 0x51];
    bytes.extend([1u8; 17]);

    let item = decode(&bytes).unwrap();
    assert_eq!(item, Item::tagged(TAG_POSITIVE_BIGNUM, Item::Bytes(vec![1; 17])));
}

#[test]
fn undefined_reads_as_null() {
    assert_eq!(decode(&[0xf7]).unwrap(), Item::Null);
}

#[test]
fn truncated_input() {
    assert_eq!(decode(&[]), Err(WireError::UnexpectedEof(0)));
    assert_eq!(decode(&[0x18]), Err(WireError::UnexpectedEof(1)));
    assert_eq!(
        decode(&[0x7a, 0xff, 0xff, 0xff, 0xff]),
        Err(WireError::UnexpectedEof(5))
    );
}

#[test]
fn trailing_bytes() {
    assert_eq!(decode(&[0x00, 0x00, 0x00]), Err(WireError::TrailingBytes(2)));
}

#[test]
fn invalid_utf8() {
    assert_eq!(decode(&[0x62, 0xff, 0xfe]), Err(WireError::InvalidUtf8(1)));
}

#[test]
fn indefinite_and_reserved_heads() {
    let err = decode(&[0x5f]).unwrap_err();
    insta::assert_snapshot!(err, @"unsupported encoding 0x5f at offset 0");

    let err = decode(&[0x81, 0x1c]).unwrap_err();
    assert_eq!(err, WireError::Unsupported { byte: 0x1c, offset: 1 });

    let err = decode(&[0xf8, 0x20]).unwrap_err();
    assert_eq!(err, WireError::Unsupported { byte: 0xf8, offset: 0 });
}

#[test]
fn depth_limit() {
    let nested = [0x81, 0x81, 0x81, 0x00];
    assert_eq!(decode_with_limit(&nested, 2), Err(WireError::DepthExceeded(2)));
    assert!(decode_with_limit(&nested, 3).is_ok());
}
