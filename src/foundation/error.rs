use std::path::PathBuf;

/// Convenience result type used across Tessera.
pub type TesseraResult<T> = Result<T, TesseraError>;

/// Top-level error taxonomy used by the public API.
#[derive(thiserror::Error, Debug)]
pub enum TesseraError {
    /// The request is missing mandatory data and was rejected before any IO.
    #[error("validation error: {0}")]
    Validation(String),

    /// A render was attempted and aborted; the partial surface was discarded.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Errors when deserializing request or configuration documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TesseraError {
    /// Build a [`TesseraError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TesseraError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the failure was caused by the caller's input rather than by the renderer.
    ///
    /// Transport layers map `true` to a client-error status and `false` to a server error.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Serde(_))
    }
}

/// Compositing layer a failure is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    /// Full-bleed background image.
    Background,
    /// Styled text overlay.
    Text,
    /// Circularly clipped profile picture.
    Profile,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Background => "background",
            Self::Text => "text",
            Self::Profile => "profile",
        })
    }
}

/// Failure to fetch or decode an image reference.
#[derive(thiserror::Error, Debug)]
pub enum ImageLoadError {
    /// No reference was supplied for a layer that requires one.
    #[error("no image reference supplied")]
    Missing,

    /// Network fetch failed (unreachable host, timeout, non-success status).
    #[error("fetch '{url}': {source}")]
    Fetch {
        /// URL that was requested.
        url: String,
        /// Underlying transport error.
        #[source]
        source: anyhow::Error,
    },

    /// Local file could not be read.
    #[error("read '{}': {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Inline payload (data URI or bare base64) was malformed.
    #[error("inline image payload: {0}")]
    Inline(String),

    /// Bytes were fetched but are not a decodable image.
    #[error("decode image: {0}")]
    Decode(#[source] anyhow::Error),

    /// Source exceeded the configured byte limit.
    #[error("image source is {len} bytes (limit {limit})")]
    TooLarge {
        /// Observed (or announced) byte length.
        len: u64,
        /// Configured limit.
        limit: u64,
    },
}

/// Failure while drawing or encoding a render.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// An image layer could not be resolved.
    #[error("{layer} layer: {source}")]
    Load {
        /// Layer whose source failed.
        layer: Layer,
        /// Original load failure.
        #[source]
        source: ImageLoadError,
    },

    /// Text could not be shaped or drawn.
    #[error("text layer: {0}")]
    Text(String),

    /// The drawing surface could not be created or painted.
    #[error("surface: {0}")]
    Surface(String),

    /// The finished surface could not be encoded.
    #[error("encode png: {0}")]
    Encode(#[source] image::ImageError),
}

impl RenderError {
    /// Build a [`RenderError::Load`] value.
    pub fn load(layer: Layer, source: ImageLoadError) -> Self {
        Self::Load { layer, source }
    }

    /// Build a [`RenderError::Text`] value.
    pub fn text(msg: impl Into<String>) -> Self {
        Self::Text(msg.into())
    }

    /// Build a [`RenderError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Layer this failure is attributed to, if any.
    pub fn layer(&self) -> Option<Layer> {
        match self {
            Self::Load { layer, .. } => Some(*layer),
            Self::Text(_) => Some(Layer::Text),
            Self::Surface(_) | Self::Encode(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
