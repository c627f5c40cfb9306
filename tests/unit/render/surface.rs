use super::*;
use kurbo::Shape as _;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RasterImage {
    let mut bytes: Vec<u8> = rgba.iter().copied().cycle().take((w * h * 4) as usize).collect();
    crate::assets::decode::premultiply_rgba8_in_place(&mut bytes);
    RasterImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(bytes),
    }
}

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

#[test]
fn rejects_empty_and_oversized_surfaces() {
    assert!(Surface::new(0, 10).is_err());
    assert!(Surface::new(10, 0).is_err());
    assert!(Surface::new(70_000, 10).is_err());
}

#[test]
fn fresh_surface_is_transparent() {
    let frame = Surface::new(4, 3).unwrap().finish();
    assert_eq!((frame.width, frame.height), (4, 3));
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn clear_fills_every_pixel() {
    let mut surface = Surface::new(5, 5).unwrap();
    surface.clear(Rgba8::rgb(0, 0, 255));
    let frame = surface.finish();
    assert_eq!(px(&frame, 0, 0), [0, 0, 255, 255]);
    assert_eq!(px(&frame, 4, 4), [0, 0, 255, 255]);
}

#[test]
fn image_is_stretched_to_destination() {
    let mut surface = Surface::new(20, 10).unwrap();
    surface
        .draw_image(&solid(2, 2, [255, 0, 0, 255]), Rect::new(0.0, 0.0, 20.0, 10.0))
        .unwrap();
    let frame = surface.finish();
    assert_eq!(px(&frame, 10, 5), [255, 0, 0, 255]);
    assert_eq!(px(&frame, 1, 1), [255, 0, 0, 255]);
    assert_eq!(px(&frame, 18, 8), [255, 0, 0, 255]);
}

#[test]
fn clip_restricts_drawing_and_is_always_popped() {
    let mut surface = Surface::new(20, 20).unwrap();
    let clip = Rect::new(5.0, 5.0, 15.0, 15.0).to_path(0.1);

    let seen = surface
        .with_clip(&clip, |s| {
            let mode = s.mode();
            s.draw_image(&solid(1, 1, [0, 255, 0, 255]), Rect::new(0.0, 0.0, 20.0, 20.0))?;
            Ok(mode)
        })
        .unwrap();
    assert_eq!(seen, ContextMode::Clipped);
    assert_eq!(surface.mode(), ContextMode::Normal);

    let failed: Result<(), RenderError> =
        surface.with_clip(&clip, |_| Err(RenderError::surface("boom")));
    assert!(failed.is_err());
    assert_eq!(surface.mode(), ContextMode::Normal);

    let frame = surface.finish();
    assert_eq!(px(&frame, 10, 10), [0, 255, 0, 255]);
    assert_eq!(px(&frame, 1, 1)[3], 0);
    assert_eq!(px(&frame, 18, 18)[3], 0);
}

#[test]
fn png_encoding_unpremultiplies() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![64, 0, 0, 128],
        premultiplied: true,
    };
    let png = frame.encode_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    let p = decoded.get_pixel(0, 0).0;
    assert_eq!(p[3], 128);
    assert!((i32::from(p[0]) - 128).abs() <= 1);
}

#[test]
fn png_encoding_rejects_short_buffers() {
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 4],
        premultiplied: false,
    };
    assert!(frame.encode_png().is_err());
}
