use std::{
    io::Read as _,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, anyhow};
use base64::Engine as _;

use crate::{
    assets::decode::{RasterImage, decode_image, is_image_signature},
    foundation::error::{ImageLoadError, TesseraError, TesseraResult},
};

/// Shortest string considered as a bare base64 image payload.
const MIN_BARE_BASE64_LEN: usize = 16;

/// Where an image comes from. Callers pass one string; [`ImageRef::parse`] classifies it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageRef {
    /// `http://` or `https://` URL.
    Url(String),
    /// Local file path (relative paths resolve against the resolver's base directory).
    Path(PathBuf),
    /// `data:` URI, decoded at resolution time.
    DataUri(String),
    /// Bare base64 payload already decoded to bytes.
    Inline(Arc<Vec<u8>>),
}

impl ImageRef {
    /// Classify a client-supplied reference. Returns `None` for empty input.
    ///
    /// Order: URL scheme, `data:` URI, `file://` URI, bare base64 with a recognised image
    /// signature, then filesystem path.
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if starts_with_ci(s, "http://") || starts_with_ci(s, "https://") {
            return Some(Self::Url(s.to_string()));
        }
        if starts_with_ci(s, "data:") {
            return Some(Self::DataUri(s.to_string()));
        }
        if let Some(rest) = s.strip_prefix("file://") {
            let path = urlencoding::decode(rest)
                .map(|p| p.into_owned())
                .unwrap_or_else(|_| rest.to_string());
            return Some(Self::Path(PathBuf::from(path)));
        }
        if let Some(bytes) = decode_bare_base64(s) {
            return Some(Self::Inline(Arc::new(bytes)));
        }
        Some(Self::Path(PathBuf::from(s)))
    }

    /// Short human-readable description that never dumps inline payloads.
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Path(p) => p.display().to_string(),
            Self::DataUri(uri) => {
                let header = uri.split(',').next().unwrap_or("data:");
                format!("{header},… ({} bytes)", uri.len())
            }
            Self::Inline(bytes) => format!("inline base64 ({} bytes)", bytes.len()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Url(_) => "url",
            Self::Path(_) => "path",
            Self::DataUri(_) => "data-uri",
            Self::Inline(_) => "inline",
        }
    }
}

fn starts_with_ci(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn decode_bare_base64(s: &str) -> Option<Vec<u8>> {
    if s.len() < MIN_BARE_BASE64_LEN
        || !s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
    {
        return None;
    }
    let bytes = base64::engine::general_purpose::STANDARD.decode(s).ok()?;
    is_image_signature(&bytes).then_some(bytes)
}

/// Network transport used for [`ImageRef::Url`] sources.
pub trait Fetch: Send + Sync {
    /// Fetch the full body at `url`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageLoadError>;
}

/// HTTP client settings for URL sources.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Overall per-request timeout.
    pub timeout_secs: u64,
    /// Largest accepted body (also applied to files and inline payloads).
    pub max_bytes: u64,
    /// `User-Agent` header sent with requests.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_bytes: 20 * 1024 * 1024,
            user_agent: concat!("tessera/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Blocking HTTP fetcher backed by `reqwest`.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    max_bytes: u64,
}

impl HttpFetcher {
    /// Build the client once at startup; it is shared by every render afterwards.
    pub fn new(config: &FetchConfig) -> TesseraResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(config.user_agent.clone())
            .build()
            .context("build http client")
            .map_err(TesseraError::from)?;
        Ok(Self {
            client,
            max_bytes: config.max_bytes,
        })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageLoadError> {
        let fetch_err = |source: anyhow::Error| ImageLoadError::Fetch {
            url: url.to_string(),
            source,
        };

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| fetch_err(e.into()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(fetch_err(anyhow!("HTTP status {status}")));
        }
        if let Some(len) = resp.content_length()
            && len > self.max_bytes
        {
            return Err(ImageLoadError::TooLarge {
                len,
                limit: self.max_bytes,
            });
        }

        let mut body = Vec::new();
        resp.take(self.max_bytes.saturating_add(1))
            .read_to_end(&mut body)
            .map_err(|e| fetch_err(anyhow::Error::new(e).context("read response body")))?;
        if body.len() as u64 > self.max_bytes {
            return Err(ImageLoadError::TooLarge {
                len: body.len() as u64,
                limit: self.max_bytes,
            });
        }
        Ok(body)
    }
}

/// Turns any [`ImageRef`] into a decoded [`RasterImage`].
///
/// Stateless apart from configuration: nothing is cached, every call performs its own IO.
#[derive(Clone)]
pub struct ImageResolver {
    fetcher: Arc<dyn Fetch>,
    base_dir: Option<PathBuf>,
    max_bytes: u64,
}

impl std::fmt::Debug for ImageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageResolver")
            .field("base_dir", &self.base_dir)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

impl ImageResolver {
    /// Resolver using `fetcher` for URLs and the default byte limit.
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            fetcher,
            base_dir: None,
            max_bytes: FetchConfig::default().max_bytes,
        }
    }

    /// Resolve relative paths against `dir` instead of the process working directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Cap the size of file and inline sources.
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Load and decode `source`.
    #[tracing::instrument(skip_all, fields(kind = source.kind(), source = %source.describe()))]
    pub fn resolve(&self, source: &ImageRef) -> Result<RasterImage, ImageLoadError> {
        let bytes = self.load_bytes(source)?;
        let image = decode_image(&bytes)?;
        tracing::debug!(width = image.width, height = image.height, "image resolved");
        Ok(image)
    }

    /// Load the encoded bytes of `source` without decoding them.
    pub fn load_bytes(&self, source: &ImageRef) -> Result<Vec<u8>, ImageLoadError> {
        let bytes = match source {
            ImageRef::Url(url) => self.fetcher.fetch(url)?,
            ImageRef::Path(path) => self.read_file(path)?,
            ImageRef::DataUri(uri) => decode_data_uri(uri)?,
            ImageRef::Inline(bytes) => bytes.to_vec(),
        };
        self.check_len(bytes.len() as u64)?;
        Ok(bytes)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>, ImageLoadError> {
        let full = match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        };
        let read_err = |source| ImageLoadError::Read {
            path: full.clone(),
            source,
        };
        let meta = std::fs::metadata(&full).map_err(read_err)?;
        self.check_len(meta.len())?;
        std::fs::read(&full).map_err(read_err)
    }

    fn check_len(&self, len: u64) -> Result<(), ImageLoadError> {
        if len > self.max_bytes {
            return Err(ImageLoadError::TooLarge {
                len,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// Decode the payload of a `data:[<mediatype>][;base64],<data>` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ImageLoadError> {
    if !starts_with_ci(uri, "data:") {
        return Err(ImageLoadError::Inline("not a data URI".to_string()));
    }
    let rest = &uri[5..];
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageLoadError::Inline("data URI has no ',' separator".to_string()))?;

    if header.to_ascii_lowercase().ends_with(";base64") {
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(cleaned)
            .map_err(|e| ImageLoadError::Inline(format!("invalid base64: {e}")))
    } else {
        Ok(urlencoding::decode_binary(payload.as_bytes()).into_owned())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
