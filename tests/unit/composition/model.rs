use std::path::PathBuf;

use super::*;

fn bg() -> ImageRef {
    ImageRef::Path(PathBuf::from("bg.png"))
}

#[test]
fn strict_validation_requires_background() {
    assert!(RenderSpec::new(bg()).validate_strict().is_ok());

    let missing = RenderSpec {
        background: None,
        text: Some(TextSpec::new("hi")),
        profile: Some(ProfileSpec::new(ImageRef::Url(
            "https://x.test/p.png".to_string(),
        ))),
    };
    let err = missing.validate_strict().unwrap_err();
    assert!(matches!(err, TesseraError::Validation(_)));
    assert!(err.to_string().contains("backgroundImage"));
}

#[test]
fn font_size_tokens() {
    assert_eq!(FontDescription::parse("24px", "Inter").size_px, 24.0);
    assert_eq!(FontDescription::parse("30", "Inter").size_px, 30.0);
    assert_eq!(FontDescription::parse("12pt", "Inter").size_px, 16.0);
    assert_eq!(FontDescription::parse("2em", "Inter").size_px, 32.0);
    assert_eq!(FontDescription::parse("150%", "Inter").size_px, 24.0);
}

#[test]
fn malformed_font_size_degrades_to_default() {
    for token in ["", "big", "-4px", "0", "12furlongs"] {
        assert_eq!(
            FontDescription::parse(token, "Inter").size_px,
            FontDescription::DEFAULT_SIZE_PX,
            "token {token:?}"
        );
    }
    assert_eq!(FontDescription::parse("20px", "  ").family, "Arial");
}

#[test]
fn profile_region_fills_only_missing_fields() {
    let defaults = Region {
        x: 86,
        y: 148,
        width: 272,
        height: 272,
    };

    let p = ProfileSpec::new(bg());
    assert_eq!(p.region(defaults), defaults);

    let p = ProfileSpec {
        position: Some(Position { top: 10, left: 20 }),
        ..ProfileSpec::new(bg())
    };
    assert_eq!(
        p.region(defaults),
        Region {
            x: 20,
            y: 10,
            width: 272,
            height: 272
        }
    );

    let p = ProfileSpec {
        size: Some(Size {
            width: 50,
            height: 60,
        }),
        ..ProfileSpec::new(bg())
    };
    assert_eq!(
        p.region(defaults),
        Region {
            x: 86,
            y: 148,
            width: 50,
            height: 60
        }
    );
}
