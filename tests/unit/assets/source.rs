use std::{collections::HashMap, io::Cursor};

use super::*;

struct MapFetcher(HashMap<String, Vec<u8>>);

impl Fetch for MapFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageLoadError> {
        self.0
            .get(url)
            .cloned()
            .ok_or_else(|| ImageLoadError::Fetch {
                url: url.to_string(),
                source: anyhow!("404"),
            })
    }
}

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([1, 2, 3, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn b64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn resolver(entries: &[(&str, Vec<u8>)]) -> ImageResolver {
    let map = entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    ImageResolver::new(Arc::new(MapFetcher(map)))
}

#[test]
fn parse_classifies_every_source_kind() {
    assert_eq!(ImageRef::parse("   "), None);
    assert_eq!(
        ImageRef::parse("https://cdn.example.com/bg.png"),
        Some(ImageRef::Url("https://cdn.example.com/bg.png".to_string()))
    );
    assert_eq!(
        ImageRef::parse("HTTP://example.com/a.jpg"),
        Some(ImageRef::Url("HTTP://example.com/a.jpg".to_string()))
    );
    assert!(matches!(
        ImageRef::parse("data:image/png;base64,AAAA"),
        Some(ImageRef::DataUri(_))
    ));
    assert_eq!(
        ImageRef::parse("file:///tmp/my%20bg.png"),
        Some(ImageRef::Path(PathBuf::from("/tmp/my bg.png")))
    );
    assert_eq!(
        ImageRef::parse("assets/bg.png"),
        Some(ImageRef::Path(PathBuf::from("assets/bg.png")))
    );

    let png = png_bytes(2, 2);
    assert_eq!(
        ImageRef::parse(&b64(&png)),
        Some(ImageRef::Inline(Arc::new(png)))
    );
}

#[test]
fn base64_text_without_image_signature_is_a_path() {
    let not_image = b64(b"just some plain words here");
    assert_eq!(
        ImageRef::parse(&not_image),
        Some(ImageRef::Path(PathBuf::from(&not_image)))
    );
}

#[test]
fn resolves_url_through_fetcher() {
    let r = resolver(&[("https://x.test/a.png", png_bytes(3, 2))]);
    let img = r
        .resolve(&ImageRef::Url("https://x.test/a.png".to_string()))
        .unwrap();
    assert_eq!((img.width, img.height), (3, 2));

    let err = r
        .resolve(&ImageRef::Url("https://x.test/missing.png".to_string()))
        .unwrap_err();
    assert!(matches!(err, ImageLoadError::Fetch { .. }));
}

#[test]
fn resolves_data_uris() {
    let r = resolver(&[]);
    let uri = format!("data:image/png;base64,{}", b64(&png_bytes(4, 1)));
    let img = r.resolve(&ImageRef::DataUri(uri)).unwrap();
    assert_eq!((img.width, img.height), (4, 1));

    let svg_uri = "data:image/svg+xml,%3Csvg%20xmlns%3D%22http%3A%2F%2Fwww.w3.org%2F2000%2Fsvg%22%20width%3D%225%22%20height%3D%226%22%3E%3C%2Fsvg%3E";
    let img = r.resolve(&ImageRef::DataUri(svg_uri.to_string())).unwrap();
    assert_eq!((img.width, img.height), (5, 6));

    let err = r
        .resolve(&ImageRef::DataUri("data:image/png;base64,@@@".to_string()))
        .unwrap_err();
    assert!(matches!(err, ImageLoadError::Inline(_)));

    let err = decode_data_uri("data:image/png;base64").unwrap_err();
    assert!(matches!(err, ImageLoadError::Inline(_)));
}

#[test]
fn resolves_relative_paths_against_base_dir() {
    let dir = PathBuf::from("target").join("unit_source_paths");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("bg.png"), png_bytes(6, 5)).unwrap();

    let r = resolver(&[]).with_base_dir(&dir);
    let img = r.resolve(&ImageRef::Path(PathBuf::from("bg.png"))).unwrap();
    assert_eq!((img.width, img.height), (6, 5));

    let err = r
        .resolve(&ImageRef::Path(PathBuf::from("nope.png")))
        .unwrap_err();
    let ImageLoadError::Read { path, .. } = err else {
        panic!("expected read error, got {err:?}");
    };
    assert_eq!(path, dir.join("nope.png"));
}

#[test]
fn byte_limit_applies_to_every_source() {
    let png = png_bytes(8, 8);
    let limit = (png.len() - 1) as u64;
    let r = resolver(&[("https://x.test/a.png", png.clone())]).with_max_bytes(limit);

    for source in [
        ImageRef::Url("https://x.test/a.png".to_string()),
        ImageRef::Inline(Arc::new(png.clone())),
    ] {
        let err = r.resolve(&source).unwrap_err();
        assert!(matches!(err, ImageLoadError::TooLarge { .. }), "{err:?}");
    }
}

#[test]
fn describe_never_dumps_payloads() {
    let uri = format!("data:image/png;base64,{}", b64(&png_bytes(1, 1)));
    let d = ImageRef::DataUri(uri.clone()).describe();
    assert!(d.starts_with("data:image/png;base64,"));
    assert!(!d.contains(&uri[30..]));
}
