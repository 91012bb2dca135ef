use super::item::*;

#[test]
fn int_sign_magnitude_conversions() {
    let minus_one = Int::from_i128(-1);
    assert!(minus_one.negative);
    assert_eq!(minus_one.magnitude, 0);
    assert_eq!(minus_one.to_i128(), Some(-1));
    assert_eq!(minus_one.to_u128(), None);

    let min = Int::from_i128(i128::MIN);
    assert_eq!(min.magnitude, i128::MAX as u128);
    assert_eq!(min.to_i128(), Some(i128::MIN));

    let max = Int::from_u128(u128::MAX);
    assert_eq!(max.to_i128(), None);
    assert_eq!(max.to_u128(), Some(u128::MAX));
    assert!(max.is_big());
    assert!(!Int::from(u64::MAX).is_big());
}

#[test]
fn int_to_i64_checks_range() {
    assert_eq!(Int::from(-5i64).to_i64(), Some(-5));
    assert_eq!(Int::from_i128(i64::MAX as i128 + 1).to_i64(), None);
}

#[test]
fn int_display() {
    assert_eq!(Int::from_i128(-1).to_string(), "-1");
    assert_eq!(Int::from(42u64).to_string(), "42");
    let lowest = Int {
        negative: true,
        magnitude: u128::MAX,
    };
    assert_eq!(
        lowest.to_string(),
        "-340282366920938463463374607431768211456"
    );
}

#[test]
fn float_shortest_width() {
    assert_eq!(Float::shortest(1.5).width(), 16);
    assert_eq!(Float::shortest(100000.0).width(), 32);
    assert_eq!(Float::shortest(0.1).width(), 64);
    assert_eq!(Float::shortest(f64::INFINITY).width(), 16);
    assert!(Float::shortest(f64::NAN).to_f64().is_nan());
    assert_eq!(Float::shortest(0.1).to_f64(), 0.1);
}

#[test]
fn map_lookup_by_text_key() {
    let item = Item::Map(vec![
        (Item::int(1), Item::text("skip")),
        (Item::text("name"), Item::text("ada")),
    ]);

    assert_eq!(item.get("name"), Some(&Item::text("ada")));
    assert_eq!(item.get("missing"), None);
    assert_eq!(Item::Null.get("name"), None);
}

#[test]
fn kind_names() {
    assert_eq!(Item::Bytes(vec![]).kind().name(), "byte string");
    assert_eq!(Item::tagged(TAG_UUID, Item::Null).kind(), WireKind::Tagged);
    assert_eq!(WireKind::Map.to_string(), "map");
}
