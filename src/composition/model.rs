use crate::{
    assets::source::ImageRef,
    foundation::core::{Position, Region, Size, parse_leading_number},
    foundation::error::{TesseraError, TesseraResult},
};

/// CSS pixels per typographic point.
const PX_PER_PT: f64 = 4.0 / 3.0;
/// Root font size used to resolve `em`/`rem`/`%` size tokens.
const ROOT_FONT_PX: f64 = 16.0;

#[derive(Clone, Debug, Default, PartialEq)]
/// Normalized description of one composite image.
///
/// Built once per request by the request mapper, consumed once by
/// [`crate::Renderer::render`]. Layers are always composited in the fixed order
/// background → text → profile picture.
pub struct RenderSpec {
    /// Base layer. Mandatory; absence is a validation failure under the strict input policy.
    pub background: Option<ImageRef>,
    /// Optional text overlay.
    pub text: Option<TextSpec>,
    /// Optional circularly clipped profile picture.
    pub profile: Option<ProfileSpec>,
}

impl RenderSpec {
    /// Spec with only a background layer.
    pub fn new(background: ImageRef) -> Self {
        Self {
            background: Some(background),
            text: None,
            profile: None,
        }
    }

    /// Add (or replace) the text layer.
    pub fn with_text(mut self, text: TextSpec) -> Self {
        self.text = Some(text);
        self
    }

    /// Add (or replace) the profile layer.
    pub fn with_profile(mut self, profile: ProfileSpec) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Reject specs that cannot render under the strict input policy.
    pub fn validate_strict(&self) -> TesseraResult<()> {
        if self.background.is_none() {
            return Err(TesseraError::validation("backgroundImage is required"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Styled text overlay.
pub struct TextSpec {
    /// Text to draw (single paragraph).
    pub content: String,
    /// Resolved size and family.
    pub font: FontDescription,
    /// Fill color literal, passed through to the renderer (hex, `rgb()`, or a name).
    pub color: String,
    /// Explicit placement; `None` selects the centered fallback.
    pub position: Option<Position>,
}

impl TextSpec {
    /// Text with default font, black fill and no explicit position.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font: FontDescription::default(),
            color: "#000000".to_string(),
            position: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Font size and family requested for a text layer.
pub struct FontDescription {
    /// Font size in pixels.
    pub size_px: f32,
    /// Logical family name, looked up in the font registry.
    pub family: String,
}

impl FontDescription {
    /// Size used when the size token is missing or malformed.
    pub const DEFAULT_SIZE_PX: f32 = 24.0;
    /// Family used when none is given.
    pub const DEFAULT_FAMILY: &'static str = "Arial";

    /// Combine a size token (`"24px"`, `"18pt"`, `"1.5em"`) and a family name.
    pub fn parse(size_token: &str, family: &str) -> Self {
        let family = family.trim();
        Self {
            size_px: parse_font_size(size_token).unwrap_or(Self::DEFAULT_SIZE_PX),
            family: if family.is_empty() {
                Self::DEFAULT_FAMILY.to_string()
            } else {
                family.to_string()
            },
        }
    }
}

impl Default for FontDescription {
    fn default() -> Self {
        Self {
            size_px: Self::DEFAULT_SIZE_PX,
            family: Self::DEFAULT_FAMILY.to_string(),
        }
    }
}

fn parse_font_size(token: &str) -> Option<f32> {
    let (value, unit) = parse_leading_number(token)?;
    let px = match unit.to_ascii_lowercase().as_str() {
        "" | "px" => value,
        "pt" => value * PX_PER_PT,
        "em" | "rem" => value * ROOT_FONT_PX,
        "%" => value / 100.0 * ROOT_FONT_PX,
        _ => return None,
    };
    (px > 0.0 && px.is_finite()).then_some(px as f32)
}

#[derive(Clone, Debug, PartialEq)]
/// Profile picture drawn inside a circular clip.
pub struct ProfileSpec {
    /// Image source.
    pub src: ImageRef,
    /// Top/left of the clip box; template default when `None`.
    pub position: Option<Position>,
    /// Clip box extent; template default when `None`.
    pub size: Option<Size>,
}

impl ProfileSpec {
    /// Profile with template-default placement.
    pub fn new(src: ImageRef) -> Self {
        Self {
            src,
            position: None,
            size: None,
        }
    }

    /// Fill unset placement fields from `defaults`.
    pub fn region(&self, defaults: Region) -> Region {
        Region::new(
            self.position.unwrap_or(defaults.position()),
            self.size.unwrap_or(defaults.size()),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
