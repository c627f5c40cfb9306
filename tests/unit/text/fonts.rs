use super::*;

fn any_system_font() -> Option<Vec<u8>> {
    let registry = FontRegistry::system();
    registry
        .resolve("sans-serif")
        .ok()
        .map(|face| face.data.as_ref().clone())
}

#[test]
fn empty_registry_without_system_fonts_fails_with_text_error() {
    let registry = FontRegistry::builder()
        .system_fallback(false)
        .build()
        .unwrap();
    let err = registry.resolve("Arial").unwrap_err();
    assert!(matches!(err, RenderError::Text(_)));
    assert!(err.to_string().contains("Arial"));
}

#[test]
fn rejects_blank_family_and_empty_bytes() {
    assert!(
        FontRegistry::builder()
            .register_bytes("  ", vec![1, 2, 3])
            .is_err()
    );
    assert!(FontRegistry::builder().register_bytes("Brand", vec![]).is_err());
}

#[test]
fn unknown_default_family_is_rejected_at_build() {
    let err = FontRegistry::builder()
        .default_family("Nope")
        .system_fallback(false)
        .build()
        .unwrap_err();
    assert!(err.is_client_error());
}

#[test]
fn missing_font_file_reports_path() {
    let err = FontRegistry::builder()
        .register_file("target/definitely/missing.ttf", "Brand")
        .unwrap_err();
    assert!(err.to_string().contains("missing.ttf"));
}

#[test]
fn lookup_is_case_insensitive_and_falls_back_to_default() {
    let Some(bytes) = any_system_font() else {
        return;
    };

    let registry = FontRegistry::builder()
        .register_bytes("Brand Sans", bytes.clone())
        .unwrap()
        .register_bytes("Other", bytes)
        .unwrap()
        .default_family("Other")
        .system_fallback(false)
        .build()
        .unwrap();

    assert_eq!(registry.families(), vec!["Brand Sans", "Other"]);
    assert_eq!(registry.resolve("brand sans").unwrap().family, "Brand Sans");
    assert_eq!(registry.resolve("Unregistered").unwrap().family, "Other");
}

#[test]
fn reregistering_a_family_replaces_it() {
    let Some(bytes) = any_system_font() else {
        return;
    };

    let registry = FontRegistry::builder()
        .register_bytes("Brand", vec![0; 4])
        .unwrap()
        .register_bytes("BRAND", bytes.clone())
        .unwrap()
        .system_fallback(false)
        .build()
        .unwrap();

    assert_eq!(registry.families().len(), 1);
    assert_eq!(registry.resolve("brand").unwrap().data.len(), bytes.len());
}

#[test]
fn unregistered_family_uses_platform_default() {
    let registry = FontRegistry::system();
    if any_system_font().is_none() {
        return;
    }
    let face = registry.resolve("Some Family Nobody Installs").unwrap();
    assert!(!face.data.is_empty());
}
