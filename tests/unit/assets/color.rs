use super::*;

#[test]
fn parses_hex_forms() {
    assert_eq!(parse_css_color("#ff0000").unwrap(), Rgba8::rgb(255, 0, 0));
    assert_eq!(
        parse_css_color("#0000ff80").unwrap(),
        Rgba8::rgba(0, 0, 255, 128)
    );
    assert_eq!(parse_css_color("#fff").unwrap(), Rgba8::rgb(255, 255, 255));
    assert_eq!(
        parse_css_color("#F008").unwrap(),
        Rgba8::rgba(255, 0, 0, 136)
    );
}

#[test]
fn parses_functions_and_names() {
    assert_eq!(
        parse_css_color("rgb(10, 20, 30)").unwrap(),
        Rgba8::rgb(10, 20, 30)
    );
    assert_eq!(
        parse_css_color("RGBA(10,20,30,0.5)").unwrap(),
        Rgba8::rgba(10, 20, 30, 128)
    );
    assert_eq!(parse_css_color(" White ").unwrap(), Rgba8::rgb(255, 255, 255));
    assert_eq!(parse_css_color("navy").unwrap(), Rgba8::rgb(0, 0, 128));
}

#[test]
fn rejects_malformed_literals() {
    assert!(parse_css_color("#12").is_err());
    assert!(parse_css_color("#gggggg").is_err());
    assert!(parse_css_color("rgb(1,2)").is_err());
    assert!(parse_css_color("blurple").is_err());
    assert!(parse_css_color("").is_err());
}
