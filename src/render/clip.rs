use kurbo::Shape as _;

use crate::{
    assets::decode::RasterImage,
    foundation::core::{BezPath, Point, Region},
    foundation::error::RenderError,
    render::surface::Surface,
};

/// Flattening tolerance for the clip circle, in pixels.
const CIRCLE_TOLERANCE: f64 = 0.1;

/// Circle inscribed in a profile region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircularClip {
    /// Center of the region.
    pub center: Point,
    /// Half the region width. Non-square regions use the width as well.
    pub radius: f64,
}

impl CircularClip {
    /// Clip for `region`: center `(x + w/2, y + h/2)`, radius `w/2`.
    pub fn for_region(region: Region) -> Self {
        let w = f64::from(region.width);
        let h = f64::from(region.height);
        Self {
            center: Point::new(f64::from(region.x) + w / 2.0, f64::from(region.y) + h / 2.0),
            radius: w / 2.0,
        }
    }

    /// Whether `p` lies inside (or on) the circle.
    pub fn contains(&self, p: Point) -> bool {
        self.center.distance(p) <= self.radius
    }

    /// Circle outline as a path.
    pub fn to_path(&self) -> BezPath {
        kurbo::Circle::new(self.center, self.radius).to_path(CIRCLE_TOLERANCE)
    }
}

/// Draw `image` stretched over `region`, masked to the region's circle.
///
/// Empty regions draw nothing. The surface is back in normal mode on return.
pub fn draw_clipped_circular(
    surface: &mut Surface,
    image: &RasterImage,
    region: Region,
) -> Result<(), RenderError> {
    if region.width == 0 || region.height == 0 {
        return Ok(());
    }
    let clip = CircularClip::for_region(region);
    tracing::debug!(
        cx = clip.center.x,
        cy = clip.center.y,
        radius = clip.radius,
        "circular clip"
    );
    surface.with_clip(&clip.to_path(), |s| s.draw_image(image, region.to_rect()))
}

#[cfg(test)]
#[path = "../../tests/unit/render/clip.rs"]
mod tests;
