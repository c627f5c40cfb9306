//! Tessera composites a background image, an optional styled text overlay and an optional
//! circularly clipped profile picture into a PNG.
//!
//! # Pipeline overview
//!
//! 1. **Map**: a [`RenderRequest`] (flat query parameters or a nested JSON body) is normalized
//!    into one strict [`RenderSpec`]. Malformed numbers degrade to per-field defaults.
//! 2. **Resolve**: [`ImageResolver`] loads each [`ImageRef`] (URL, path, data URI, bare base64)
//!    into a premultiplied [`RasterImage`].
//! 3. **Composite**: [`Renderer::render`] clears a fresh [`Surface`], draws the background
//!    full-bleed, then the text, then the profile picture inside a [`CircularClip`].
//! 4. **Encode**: the surface is encoded to PNG and returned as a [`RenderedImage`].
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Immutable at render time**: fonts and HTTP settings are fixed when the [`Renderer`] is
//!   built; every render owns its surface, so a renderer can be shared across threads.
//! - **Explicit policies**: canvas sizing, text placement, missing-background handling and
//!   profile failure handling are deployment choices ([`Template`], [`InputPolicy`],
//!   [`ProfileFailure`]), never per-request guesses.
//!
//! # Getting started
//!
//! ```no_run
//! let renderer = tessera::RenderConfig::default().build_renderer()?;
//! let request = tessera::RenderRequest::from_query_str(
//!     "backgroundImage=bg.png&textContent=Hello&profileImageSrc=me.png",
//! );
//! let png = renderer.render_request(request)?;
//! std::fs::write("out.png", &png.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod composition;
mod config;
mod foundation;
mod render;
mod request;
mod text;

pub use assets::color::{Rgba8, parse_css_color};
pub use assets::decode::{RasterImage, decode_image, is_image_signature};
pub use assets::source::{
    Fetch, FetchConfig, HttpFetcher, ImageRef, ImageResolver, decode_data_uri,
};
pub use composition::model::{FontDescription, ProfileSpec, RenderSpec, TextSpec};
pub use config::{RenderConfig, TemplateConfig, TemplatePreset};
pub use foundation::core::{
    Affine, BezPath, Point, Position, Rect, Region, Size, coord_or, extent_or,
    parse_leading_int, parse_leading_number,
};
pub use foundation::error::{
    ImageLoadError, Layer, RenderError, TesseraError, TesseraResult,
};
pub use render::clip::{CircularClip, draw_clipped_circular};
pub use render::pipeline::{InputPolicy, ProfileFailure, RenderedImage, Renderer};
pub use render::surface::{ContextMode, FrameRGBA, Surface};
pub use render::template::{CanvasPolicy, DEFAULT_PROFILE_POSITION, Template};
pub use request::mapper::{
    Dimension, JsonBody, JsonPosition, JsonProfile, JsonSize, JsonText, QueryParams,
    RenderRequest,
};
pub use text::fonts::{FontFace, FontRegistry, FontRegistryBuilder, FontSource};
pub use text::renderer::{
    ShapedText, TextBrushRgba8, TextLayout, TextLayoutEngine, TextMetrics, draw_text, place_text,
};
