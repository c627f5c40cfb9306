use std::path::PathBuf;

use super::*;
use crate::foundation::core::Size;

fn json(body: &str) -> RenderSpec {
    RenderRequest::from_json_slice(body.as_bytes())
        .unwrap()
        .into_render_spec()
}

#[test]
fn query_defaults_fill_text_layer() {
    let spec = RenderRequest::from_query_str("backgroundImage=bg.png").into_render_spec();
    assert_eq!(spec.background, Some(ImageRef::Path(PathBuf::from("bg.png"))));
    assert_eq!(spec.profile, None);

    let text = spec.text.unwrap();
    assert_eq!(text.content, "Dynamic Text");
    assert_eq!(text.color, "#000000");
    assert_eq!(text.font.size_px, 24.0);
    assert_eq!(text.font.family, "Arial");
    assert_eq!(text.position, Some(Position { top: 100, left: 50 }));
}

#[test]
fn query_decodes_components_and_units() {
    let spec = RenderRequest::from_query_str(
        "?backgroundImage=bg.png&textContent=Hello+big%20world&textColor=%23ff0000\
         &textFontSize=18pt&textPositionTop=40px&textPositionLeft=oops",
    )
    .into_render_spec();

    let text = spec.text.unwrap();
    assert_eq!(text.content, "Hello big world");
    assert_eq!(text.color, "#ff0000");
    assert_eq!(text.font.size_px, 24.0);
    assert_eq!(text.position, Some(Position { top: 40, left: 50 }));
}

#[test]
fn query_first_repeated_key_wins_and_unknown_keys_are_ignored() {
    let q = QueryParams::from_query_str("textContent=a&textContent=b&whatever=1");
    assert_eq!(q.text_content.as_deref(), Some("a"));
    assert_eq!(q.background_image, None);
}

#[test]
fn query_profile_only_when_src_given() {
    let spec = RenderRequest::from_query_str(
        "backgroundImage=bg.png&profileImageSrc=me.png&profileImagePositionTop=10\
         &profileImageWidth=64",
    )
    .into_render_spec();

    let profile = spec.profile.unwrap();
    assert_eq!(profile.src, ImageRef::Path(PathBuf::from("me.png")));
    assert_eq!(
        profile.position,
        Some(Position {
            top: 10,
            left: DEFAULT_PROFILE_POSITION.left
        })
    );
    assert_eq!(
        profile.size,
        Some(Size {
            width: 64,
            height: 64
        })
    );

    let spec = RenderRequest::from_query_str("backgroundImage=bg.png&profileImageSrc=")
        .into_render_spec();
    assert_eq!(spec.profile, None);
}

#[test]
fn json_null_text_equals_omitted_text() {
    let omitted = json(r#"{"backgroundImage":"bg.png"}"#);
    let null = json(r#"{"backgroundImage":"bg.png","text":null,"profileImage":null}"#);
    assert_eq!(omitted, null);
    assert_eq!(omitted.text, None);
    assert_eq!(omitted.profile, None);
}

#[test]
fn json_accepts_numbers_and_unit_strings() {
    let spec = json(
        r##"{
            "backgroundImage": "bg.png",
            "text": {
                "content": "Hi",
                "fontSize": 2,
                "fontFamily": "Inter",
                "color": "navy",
                "position": {"top": "120px", "left": 30.9}
            },
            "profileImage": {
                "src": "https://example.com/me.png",
                "position": {"top": 5, "left": 6},
                "size": {"width": "80px", "height": 90}
            }
        }"##,
    );

    let text = spec.text.unwrap();
    assert_eq!(text.content, "Hi");
    assert_eq!(text.font.size_px, 2.0);
    assert_eq!(text.font.family, "Inter");
    assert_eq!(text.color, "navy");
    assert_eq!(text.position, Some(Position { top: 120, left: 30 }));

    let profile = spec.profile.unwrap();
    assert_eq!(
        profile.src,
        ImageRef::Url("https://example.com/me.png".to_string())
    );
    assert_eq!(profile.position, Some(Position { top: 5, left: 6 }));
    assert_eq!(
        profile.size,
        Some(Size {
            width: 80,
            height: 90
        })
    );
}

#[test]
fn json_text_without_position_selects_fallback_placement() {
    let spec = json(r#"{"backgroundImage":"bg.png","text":{"content":"x"}}"#);
    let text = spec.text.unwrap();
    assert_eq!(text.position, None);
    assert_eq!(text.font, FontDescription::default());
}

#[test]
fn json_profile_without_src_is_dropped() {
    let spec = json(r#"{"backgroundImage":"bg.png","profileImage":{"size":{"width":10}}}"#);
    assert_eq!(spec.profile, None);
}

#[test]
fn json_missing_background_is_left_for_the_renderer() {
    let spec = json(r#"{"text":{"content":"x"}}"#);
    assert_eq!(spec.background, None);
    assert!(spec.validate_strict().is_err());
}

#[test]
fn malformed_json_is_a_client_error() {
    let err = RenderRequest::from_json_slice(b"{not json").unwrap_err();
    assert!(matches!(err, TesseraError::Serde(_)));
    assert!(err.is_client_error());

    let err = RenderRequest::from_json_slice(br#"{"text":{"fontSize":true}}"#).unwrap_err();
    assert!(matches!(err, TesseraError::Serde(_)));
}
