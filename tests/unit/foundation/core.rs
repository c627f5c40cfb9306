use super::*;

#[test]
fn leading_int_strips_unit_suffixes() {
    assert_eq!(parse_leading_int("100px"), Some(100));
    assert_eq!(parse_leading_int("  42"), Some(42));
    assert_eq!(parse_leading_int("-7px"), Some(-7));
    assert_eq!(parse_leading_int("+3"), Some(3));
    assert_eq!(parse_leading_int("12.7"), Some(12));
    assert_eq!(parse_leading_int("px100"), None);
    assert_eq!(parse_leading_int(""), None);
    assert_eq!(parse_leading_int("-"), None);
}

#[test]
fn leading_number_returns_unit() {
    assert_eq!(parse_leading_number("24px"), Some((24.0, "px")));
    assert_eq!(parse_leading_number("1.5 em"), Some((1.5, "em")));
    assert_eq!(parse_leading_number("18"), Some((18.0, "")));
    assert_eq!(parse_leading_number("large"), None);
}

#[test]
fn malformed_values_degrade_to_defaults() {
    assert_eq!(coord_or("abc", 86), 86);
    assert_eq!(coord_or("148px", 0), 148);
    assert_eq!(coord_or("99999999999", 0), i32::MAX);
    assert_eq!(extent_or("0", 272), 272);
    assert_eq!(extent_or("-5px", 272), 272);
    assert_eq!(extent_or("64px", 272), 64);
}

#[test]
fn region_rect_matches_fields() {
    let r = Region::new(
        Position { top: 148, left: 86 },
        Size {
            width: 272,
            height: 272,
        },
    );
    assert_eq!(r.to_rect(), Rect::new(86.0, 148.0, 358.0, 420.0));
    assert_eq!(r.position(), Position { top: 148, left: 86 });
}
