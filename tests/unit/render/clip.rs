use std::sync::Arc;

use super::*;
use crate::render::surface::ContextMode;

fn white(w: u32, h: u32) -> RasterImage {
    RasterImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(vec![255; (w * h * 4) as usize]),
    }
}

#[test]
fn profile_card_region_geometry() {
    let clip = CircularClip::for_region(Region {
        x: 86,
        y: 148,
        width: 272,
        height: 272,
    });
    assert_eq!(clip.center, Point::new(222.0, 284.0));
    assert_eq!(clip.radius, 136.0);
    assert!(clip.contains(Point::new(222.0, 148.0)));
    assert!(!clip.contains(Point::new(86.0, 148.0)));
}

#[test]
fn non_square_region_uses_width() {
    let clip = CircularClip::for_region(Region {
        x: 0,
        y: 0,
        width: 40,
        height: 100,
    });
    assert_eq!(clip.center, Point::new(20.0, 50.0));
    assert_eq!(clip.radius, 20.0);
}

#[test]
fn drawn_pixels_stay_inside_the_circle() {
    let region = Region {
        x: 10,
        y: 20,
        width: 60,
        height: 60,
    };
    let clip = CircularClip::for_region(region);

    let mut surface = Surface::new(100, 100).unwrap();
    draw_clipped_circular(&mut surface, &white(3, 3), region).unwrap();
    assert_eq!(surface.mode(), ContextMode::Normal);
    let frame = surface.finish();

    let mut inside = 0;
    for y in 0..frame.height {
        for x in 0..frame.width {
            let a = frame.data[((y * frame.width + x) * 4 + 3) as usize];
            if a == 0 {
                continue;
            }
            inside += 1;
            let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            assert!(
                clip.center.distance(center) <= clip.radius + 1.0,
                "pixel ({x},{y}) drawn outside clip"
            );
        }
    }
    assert!(inside > 2000);
}

#[test]
fn empty_region_is_a_no_op() {
    let mut surface = Surface::new(10, 10).unwrap();
    draw_clipped_circular(
        &mut surface,
        &white(1, 1),
        Region {
            x: 0,
            y: 0,
            width: 0,
            height: 5,
        },
    )
    .unwrap();
    assert!(surface.finish().data.iter().all(|&b| b == 0));
}
