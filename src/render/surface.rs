use std::{io::Cursor, sync::Arc};

use crate::{
    assets::{color::Rgba8, decode::RasterImage, decode::unpremultiply_rgba8_in_place},
    foundation::core::{Affine, BezPath, Point, Rect},
    foundation::error::RenderError,
};

/// Drawing-context mode. Initial and terminal state is [`ContextMode::Normal`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextMode {
    /// No clip active.
    Normal,
    /// At least one clip layer is pushed.
    Clipped,
}

/// Finished frame pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 bytes.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied by alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Encode as a straight-alpha PNG.
    pub fn encode_png(self) -> Result<Vec<u8>, RenderError> {
        let Self {
            width,
            height,
            mut data,
            premultiplied,
        } = self;
        if premultiplied {
            unpremultiply_rgba8_in_place(&mut data);
        }

        let img = image::RgbaImage::from_raw(width, height, data)
            .ok_or_else(|| RenderError::surface("frame byte length does not match dimensions"))?;
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .map_err(RenderError::Encode)?;
        Ok(out)
    }
}

/// One render's private canvas. Never shared between renders.
pub struct Surface {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    clip_depth: u32,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("mode", &self.mode())
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Fully transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::surface(format!(
                "surface must be non-empty, got {width}x{height}"
            )));
        }
        let w: u16 = width
            .try_into()
            .map_err(|_| RenderError::surface(format!("surface width {width} exceeds u16")))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| RenderError::surface(format!("surface height {height} exceeds u16")))?;

        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            width: w,
            height: h,
            clip_depth: 0,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Current drawing-context mode.
    pub fn mode(&self) -> ContextMode {
        if self.clip_depth == 0 {
            ContextMode::Normal
        } else {
            ContextMode::Clipped
        }
    }

    /// Paint the whole surface with `color`. A fresh surface is already transparent.
    pub fn clear(&mut self, color: Rgba8) {
        self.reset_transforms(Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
    }

    /// Draw `image` stretched to fill `dest`.
    pub fn draw_image(&mut self, image: &RasterImage, dest: Rect) -> Result<(), RenderError> {
        if dest.width() <= 0.0 || dest.height() <= 0.0 {
            return Ok(());
        }
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let (iw, ih) = (f64::from(image.width), f64::from(image.height));

        let transform = Affine::translate((dest.x0, dest.y0))
            * Affine::scale_non_uniform(dest.width() / iw, dest.height() / ih);
        self.reset_transforms(transform);
        self.ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        Ok(())
    }

    /// Fill a glyph run. Glyph positions are relative to `origin`.
    pub fn fill_glyphs(
        &mut self,
        font: &vello_cpu::peniko::FontData,
        font_size: f32,
        color: Rgba8,
        origin: Point,
        glyphs: impl Iterator<Item = vello_cpu::Glyph>,
    ) {
        self.reset_transforms(Affine::translate(origin.to_vec2()));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx
            .glyph_run(font)
            .font_size(font_size)
            .fill_glyphs(glyphs);
    }

    /// Run `draw` with drawing restricted to the interior of `clip`.
    ///
    /// The clip layer is popped before returning, whether `draw` succeeded or not.
    pub fn with_clip<T>(
        &mut self,
        clip: &BezPath,
        draw: impl FnOnce(&mut Self) -> Result<T, RenderError>,
    ) -> Result<T, RenderError> {
        self.reset_transforms(Affine::IDENTITY);
        self.ctx.push_clip_layer(&bezpath_to_cpu(clip));
        self.clip_depth += 1;

        let out = draw(self);

        self.ctx.pop_layer();
        self.clip_depth -= 1;
        out
    }

    /// Rasterize everything drawn so far.
    pub fn finish(mut self) -> FrameRGBA {
        debug_assert_eq!(self.mode(), ContextMode::Normal);
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);

        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn reset_transforms(&mut self, transform: Affine) {
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> Result<vello_cpu::Pixmap, RenderError> {
    let w: u16 = width
        .try_into()
        .map_err(|_| RenderError::surface(format!("image width {width} exceeds u16")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| RenderError::surface(format!("image height {height} exceeds u16")))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(RenderError::surface("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels: Vec<_> = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
