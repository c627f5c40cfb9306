use crate::{
    assets::source::ImageRef,
    composition::model::{FontDescription, ProfileSpec, RenderSpec, TextSpec},
    foundation::core::{Position, Size, coord_or, extent_or},
    foundation::error::{TesseraError, TesseraResult},
    render::template::DEFAULT_PROFILE_POSITION,
};

/// Default text placement for flat query requests and partial JSON positions.
const DEFAULT_TEXT_TOP: i32 = 100;
const DEFAULT_TEXT_LEFT: i32 = 50;
const DEFAULT_TEXT_CONTENT: &str = "Dynamic Text";
const DEFAULT_TEXT_COLOR: &str = "#000000";
const DEFAULT_FONT_SIZE: &str = "24px";

/// A render request in one of the shapes the transport layer accepts.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderRequest {
    /// Flat, string-only URL query parameters.
    Query(QueryParams),
    /// Nested JSON request body.
    Json(JsonBody),
}

impl RenderRequest {
    /// Parse a raw URL query string (with or without the leading `?`).
    pub fn from_query_str(query: &str) -> Self {
        Self::Query(QueryParams::from_query_str(query))
    }

    /// Parse a JSON request body.
    pub fn from_json_slice(bytes: &[u8]) -> TesseraResult<Self> {
        let body: JsonBody = serde_json::from_slice(bytes)
            .map_err(|e| TesseraError::serde(format!("invalid render request body: {e}")))?;
        Ok(Self::Json(body))
    }

    /// Normalize into the single strict internal type.
    ///
    /// Never fails: malformed numbers fall back to per-field defaults and missing mandatory
    /// data (the background) is left for the renderer's input policy to judge.
    pub fn into_render_spec(self) -> RenderSpec {
        match self {
            Self::Query(q) => q.into_render_spec(),
            Self::Json(b) => b.into_render_spec(),
        }
    }
}

/// Flat query parameters, named as clients send them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// `backgroundImage`
    pub background_image: Option<String>,
    /// `textContent`
    pub text_content: Option<String>,
    /// `textColor`
    pub text_color: Option<String>,
    /// `textFontSize`
    pub text_font_size: Option<String>,
    /// `textFontFamily`
    pub text_font_family: Option<String>,
    /// `textPositionTop`
    pub text_position_top: Option<String>,
    /// `textPositionLeft`
    pub text_position_left: Option<String>,
    /// `profileImageSrc`
    pub profile_image_src: Option<String>,
    /// `profileImagePositionTop`
    pub profile_image_position_top: Option<String>,
    /// `profileImagePositionLeft`
    pub profile_image_position_left: Option<String>,
    /// `profileImageWidth`
    pub profile_image_width: Option<String>,
    /// `profileImageHeight`
    pub profile_image_height: Option<String>,
}

impl QueryParams {
    /// Parse `a=1&b=two%20words` style input. Unknown keys are ignored; the first
    /// occurrence of a repeated key wins.
    pub fn from_query_str(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(query.split('&').filter(|p| !p.is_empty()).map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(k), decode_component(v))
        }))
    }

    /// Build from already-decoded key/value pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut out = Self::default();
        for (k, v) in pairs {
            let slot = match k.as_ref() {
                "backgroundImage" => &mut out.background_image,
                "textContent" => &mut out.text_content,
                "textColor" => &mut out.text_color,
                "textFontSize" => &mut out.text_font_size,
                "textFontFamily" => &mut out.text_font_family,
                "textPositionTop" => &mut out.text_position_top,
                "textPositionLeft" => &mut out.text_position_left,
                "profileImageSrc" => &mut out.profile_image_src,
                "profileImagePositionTop" => &mut out.profile_image_position_top,
                "profileImagePositionLeft" => &mut out.profile_image_position_left,
                "profileImageWidth" => &mut out.profile_image_width,
                "profileImageHeight" => &mut out.profile_image_height,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(v.into());
            }
        }
        out
    }

    fn into_render_spec(self) -> RenderSpec {
        let text = TextSpec {
            content: non_empty(self.text_content)
                .unwrap_or_else(|| DEFAULT_TEXT_CONTENT.to_string()),
            font: FontDescription::parse(
                self.text_font_size.as_deref().unwrap_or(DEFAULT_FONT_SIZE),
                self.text_font_family
                    .as_deref()
                    .unwrap_or(FontDescription::DEFAULT_FAMILY),
            ),
            color: non_empty(self.text_color).unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
            position: Some(Position {
                top: coord_or(
                    self.text_position_top.as_deref().unwrap_or(""),
                    DEFAULT_TEXT_TOP,
                ),
                left: coord_or(
                    self.text_position_left.as_deref().unwrap_or(""),
                    DEFAULT_TEXT_LEFT,
                ),
            }),
        };

        let profile = self
            .profile_image_src
            .as_deref()
            .and_then(ImageRef::parse)
            .map(|src| ProfileSpec {
                src,
                position: partial_position(
                    self.profile_image_position_top.as_deref(),
                    self.profile_image_position_left.as_deref(),
                    DEFAULT_PROFILE_POSITION,
                ),
                size: partial_size(
                    self.profile_image_width.as_deref(),
                    self.profile_image_height.as_deref(),
                ),
            });

        RenderSpec {
            background: self.background_image.as_deref().and_then(ImageRef::parse),
            text: Some(text),
            profile,
        }
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

/// Numeric field that clients send either as a number or as a unit-suffixed string.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    /// Plain JSON number.
    Number(f64),
    /// String such as `"100px"`.
    Text(String),
}

impl Dimension {
    fn token(&self) -> String {
        match self {
            Self::Number(n) if n.is_finite() => n.to_string(),
            Self::Number(_) => String::new(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Nested JSON request body.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonBody {
    /// Background reference (URL, path, data URI or bare base64).
    #[serde(default)]
    pub background_image: Option<String>,
    /// Text layer; `null` and omission are equivalent.
    #[serde(default)]
    pub text: Option<JsonText>,
    /// Profile layer; `null` and omission are equivalent.
    #[serde(default)]
    pub profile_image: Option<JsonProfile>,
}

/// `text` object of a JSON body.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonText {
    /// Text to draw.
    #[serde(default)]
    pub content: Option<String>,
    /// Size token or number of pixels.
    #[serde(default)]
    pub font_size: Option<Dimension>,
    /// Logical family name.
    #[serde(default)]
    pub font_family: Option<String>,
    /// Fill color literal.
    #[serde(default)]
    pub color: Option<String>,
    /// Explicit placement.
    #[serde(default)]
    pub position: Option<JsonPosition>,
}

/// `{top, left}` object.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct JsonPosition {
    /// Distance from the top edge.
    #[serde(default)]
    pub top: Option<Dimension>,
    /// Distance from the left edge.
    #[serde(default)]
    pub left: Option<Dimension>,
}

/// `{width, height}` object.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct JsonSize {
    /// Box width.
    #[serde(default)]
    pub width: Option<Dimension>,
    /// Box height.
    #[serde(default)]
    pub height: Option<Dimension>,
}

/// `profileImage` object of a JSON body.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct JsonProfile {
    /// Image reference; the layer is dropped when empty.
    #[serde(default)]
    pub src: Option<String>,
    /// Clip box placement.
    #[serde(default)]
    pub position: Option<JsonPosition>,
    /// Clip box extent.
    #[serde(default)]
    pub size: Option<JsonSize>,
}

impl JsonBody {
    fn into_render_spec(self) -> RenderSpec {
        let text = self.text.map(|t| {
            let size = t.font_size.as_ref().map(Dimension::token);
            TextSpec {
                content: t.content.unwrap_or_default(),
                font: FontDescription::parse(
                    size.as_deref().unwrap_or(DEFAULT_FONT_SIZE),
                    t.font_family
                        .as_deref()
                        .unwrap_or(FontDescription::DEFAULT_FAMILY),
                ),
                color: non_empty(t.color).unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
                position: t.position.map(|p| {
                    partial_position(
                        p.top.as_ref().map(Dimension::token).as_deref(),
                        p.left.as_ref().map(Dimension::token).as_deref(),
                        Position {
                            top: DEFAULT_TEXT_TOP,
                            left: DEFAULT_TEXT_LEFT,
                        },
                    )
                    .unwrap_or(Position {
                        top: DEFAULT_TEXT_TOP,
                        left: DEFAULT_TEXT_LEFT,
                    })
                }),
            }
        });

        let profile = self.profile_image.and_then(|p| {
            let src = p.src.as_deref().and_then(ImageRef::parse)?;
            Some(ProfileSpec {
                src,
                position: p.position.and_then(|pos| {
                    partial_position(
                        pos.top.as_ref().map(Dimension::token).as_deref(),
                        pos.left.as_ref().map(Dimension::token).as_deref(),
                        DEFAULT_PROFILE_POSITION,
                    )
                }),
                size: p.size.and_then(|s| {
                    partial_size(
                        s.width.as_ref().map(Dimension::token).as_deref(),
                        s.height.as_ref().map(Dimension::token).as_deref(),
                    )
                }),
            })
        });

        RenderSpec {
            background: self.background_image.as_deref().and_then(ImageRef::parse),
            text,
            profile,
        }
    }
}

/// `None` when neither coordinate is given; otherwise missing or malformed coordinates take
/// their value from `defaults`.
fn partial_position(top: Option<&str>, left: Option<&str>, defaults: Position) -> Option<Position> {
    if top.is_none() && left.is_none() {
        return None;
    }
    Some(Position {
        top: coord_or(top.unwrap_or(""), defaults.top),
        left: coord_or(left.unwrap_or(""), defaults.left),
    })
}

/// `None` when no valid extent is given; a single valid extent yields a square box.
fn partial_size(width: Option<&str>, height: Option<&str>) -> Option<Size> {
    let w = width.map(|w| extent_or(w, 0)).filter(|&w| w > 0);
    let h = height.map(|h| extent_or(h, 0)).filter(|&h| h > 0);
    match (w, h) {
        (Some(width), Some(height)) => Some(Size { width, height }),
        (Some(side), None) | (None, Some(side)) => Some(Size {
            width: side,
            height: side,
        }),
        (None, None) => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/request/mapper.rs"]
mod tests;
