use half::f16;

use super::item::*;
use super::write::*;

#[test]
fn integers_use_shortest_head() {
    assert_eq!(encode(&Item::int(0)), [0x00]);
    assert_eq!(encode(&Item::int(23)), [0x17]);
    assert_eq!(encode(&Item::int(24)), [0x18, 0x18]);
    assert_eq!(encode(&Item::int(500)), [0x19, 0x01, 0xf4]);
    assert_eq!(encode(&Item::int(70000)), [0x1a, 0x00, 0x01, 0x11, 0x70]);
    assert_eq!(encode(&Item::int(-1)), [0x20]);
    assert_eq!(encode(&Item::int(-500)), [0x39, 0x01, 0xf3]);
}

#[test]
fn wide_integers_become_bignums() {
    let bytes = encode(&Item::int(1 << 64));
    assert_eq!(bytes, [0xc2, 0x49, 0x01, 0, 0, 0, 0, 0, 0, 0, 0]);

    let bytes = encode(&Item::int(-(1 << 64) - 1));
    assert_eq!(bytes, [0xc3, 0x49, 0x01, 0, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn simple_values() {
    assert_eq!(encode(&Item::Null), [0xf6]);
    assert_eq!(encode(&Item::Bool(false)), [0xf4]);
    assert_eq!(encode(&Item::Bool(true)), [0xf5]);
}

#[test]
fn floats_keep_their_width() {
    let half = Item::Float(Float::F16(f16::from_f64(1.5)));
    assert_eq!(encode(&half), [0xf9, 0x3e, 0x00]);

    let single = Item::Float(Float::F32(1.5));
    assert_eq!(encode(&single), [0xfa, 0x3f, 0xc0, 0x00, 0x00]);

    let double = Item::Float(Float::F64(0.1));
    assert_eq!(
        encode(&double),
        [0xfb, 0x3f, 0xb9, 0x99, 0x99, 0x99, 0x99, 0x99, 0x9a]
    );
}

#[test]
fn strings_and_containers() {
    assert_eq!(encode(&Item::text("a")), [0x61, 0x61]);
    assert_eq!(encode(&Item::Bytes(vec![1, 2])), [0x42, 0x01, 0x02]);
    assert_eq!(
        encode(&Item::Array(vec![Item::int(1), Item::Null])),
        [0x82, 0x01, 0xf6]
    );
    assert_eq!(
        encode(&Item::Map(vec![(Item::text("a"), Item::int(1))])),
        [0xa1, 0x61, 0x61, 0x01]
    );
}

#[test]
fn tagged_items() {
    let item = Item::tagged(TAG_DATE_STRING, Item::text("x"));
    assert_eq!(encode(&item), [0xd9, 0x03, 0xec, 0x61, 0x78]);

    let item = Item::tagged(TAG_UUID, Item::Bytes(vec![]));
    assert_eq!(encode(&item), [0xd8, 0x25, 0x40]);
}

#[test]
fn encode_into_appends() {
    let mut out = vec![0xff];
    encode_into(&Item::int(1), &mut out);
    assert_eq!(out, [0xff, 0x01]);
}
