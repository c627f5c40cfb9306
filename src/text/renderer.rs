use crate::{
    assets::color::{Rgba8, parse_css_color},
    composition::model::TextSpec,
    foundation::core::{Point, Position},
    foundation::error::RenderError,
    render::surface::Surface,
    text::fonts::{FontFace, FontRegistry},
};

/// Text placement policy, chosen by the deployment template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextLayout {
    /// Left edge at `position.left`, first alphabetic baseline at `position.top`.
    ///
    /// Text without a position is centered horizontally with its top at `fallback_top`.
    Explicit {
        /// Line-box top used when the text has no position.
        fallback_top: i32,
    },
    /// Horizontally centered on the surface, line-box top at `top`. Positions are ignored.
    Centered {
        /// Line-box top in surface pixels.
        top: i32,
    },
}

/// Shaped-text measurements needed for placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// Advance width of the widest line.
    pub width: f32,
    /// Distance from the layout top to the first line's baseline.
    pub first_baseline: f32,
}

/// Top-left origin of the text layout on a surface `surface_width` pixels wide.
pub fn place_text(
    layout: TextLayout,
    position: Option<Position>,
    surface_width: u32,
    metrics: TextMetrics,
) -> Point {
    let centered = |top: i32| {
        Point::new(
            f64::from(surface_width) / 2.0 - f64::from(metrics.width) / 2.0,
            f64::from(top),
        )
    };
    match (layout, position) {
        (TextLayout::Explicit { .. }, Some(p)) => Point::new(
            f64::from(p.left),
            f64::from(p.top) - f64::from(metrics.first_baseline),
        ),
        (TextLayout::Explicit { fallback_top }, None) => centered(fallback_top),
        (TextLayout::Centered { top }, _) => centered(top),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layouts.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Shaped single-paragraph text plus the face it was shaped with.
pub struct ShapedText {
    layout: parley::Layout<TextBrushRgba8>,
    font: FontFace,
}

impl ShapedText {
    /// Placement measurements.
    pub fn metrics(&self) -> TextMetrics {
        TextMetrics {
            width: self.layout.width(),
            first_baseline: self
                .layout
                .lines()
                .next()
                .map(|l| l.metrics().baseline)
                .unwrap_or(0.0),
        }
    }

    /// Face used for shaping.
    pub fn font(&self) -> &FontFace {
        &self.font
    }
}

/// Per-render Parley contexts. Holds no state that outlives one render.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Fresh contexts with an empty font collection.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape `text` with `font` at `size_px`, unwrapped.
    pub fn layout_plain(
        &mut self,
        text: &str,
        font: &FontFace,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> Result<ShapedText, RenderError> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(RenderError::text("font size must be finite and > 0"));
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.data.as_ref().clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            RenderError::text(format!(
                "font data for family \"{}\" contains no usable face",
                font.family
            ))
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| RenderError::text("registered font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        Ok(ShapedText {
            layout,
            font: font.clone(),
        })
    }
}

/// Resolve the text's font and color, place it by `layout`, and paint it onto `surface`.
///
/// Unknown families fall back through the registry; invalid colors fall back to black.
pub fn draw_text(
    surface: &mut Surface,
    spec: &TextSpec,
    layout: TextLayout,
    fonts: &FontRegistry,
) -> Result<(), RenderError> {
    if spec.content.trim().is_empty() {
        tracing::debug!("empty text content, nothing to draw");
        return Ok(());
    }

    let color = parse_css_color(&spec.color).unwrap_or_else(|err| {
        tracing::debug!(color = %spec.color, %err, "invalid text color, using black");
        Rgba8::BLACK
    });
    let face = fonts.resolve(&spec.font.family)?;

    let mut engine = TextLayoutEngine::new();
    let shaped = engine.layout_plain(&spec.content, &face, spec.font.size_px, color.into())?;
    let origin = place_text(layout, spec.position, surface.width(), shaped.metrics());
    tracing::debug!(
        family = %face.family,
        size_px = spec.font.size_px,
        x = origin.x,
        y = origin.y,
        "drawing text"
    );

    let font = vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(face.data.as_ref().clone()),
        face.index,
    );
    for line in shaped.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            surface.fill_glyphs(
                &font,
                run.run().font_size(),
                Rgba8::rgba(brush.r, brush.g, brush.b, brush.a),
                origin,
                glyphs,
            );
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/text/renderer.rs"]
mod tests;
