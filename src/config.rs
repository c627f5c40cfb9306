use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    assets::color::Rgba8,
    assets::source::{Fetch, FetchConfig, HttpFetcher, ImageResolver},
    foundation::error::{TesseraError, TesseraResult},
    render::{
        pipeline::{InputPolicy, ProfileFailure, Renderer},
        template::{CanvasPolicy, Template},
    },
    text::{
        fonts::{FontRegistry, FontSource},
        renderer::TextLayout,
    },
};

/// Built-in template presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplatePreset {
    /// See [`Template::freeform`].
    #[default]
    Freeform,
    /// See [`Template::profile_card`].
    ProfileCard,
}

/// Template preset plus optional overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Base preset.
    pub preset: TemplatePreset,
    /// Fixed canvas width; takes effect together with `canvas_height`.
    pub canvas_width: Option<u32>,
    /// Fixed canvas height; takes effect together with `canvas_width`.
    pub canvas_height: Option<u32>,
    /// Straight RGBA color painted before the background.
    pub clear_rgba: Option<[u8; 4]>,
    /// Vertical text anchor (centered top, or explicit fallback top).
    pub text_top: Option<i32>,
}

impl TemplateConfig {
    /// Resolve the preset and apply overrides.
    pub fn to_template(&self) -> Template {
        let mut t = match self.preset {
            TemplatePreset::Freeform => Template::freeform(),
            TemplatePreset::ProfileCard => Template::profile_card(),
        };
        if let (Some(width), Some(height)) = (self.canvas_width, self.canvas_height) {
            t.canvas = CanvasPolicy::Fixed { width, height };
        }
        if let Some([r, g, b, a]) = self.clear_rgba {
            t.clear = Some(Rgba8::rgba(r, g, b, a));
        }
        if let Some(top) = self.text_top {
            t.text_layout = match t.text_layout {
                TextLayout::Explicit { .. } => TextLayout::Explicit { fallback_top: top },
                TextLayout::Centered { .. } => TextLayout::Centered { top },
            };
        }
        t
    }
}

/// Deployment configuration, loaded once at startup.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Template preset and overrides.
    pub template: TemplateConfig,
    /// Mandatory-field checking.
    pub input_policy: InputPolicy,
    /// Profile failure handling.
    pub profile_failure: ProfileFailure,
    /// Font files registered under logical family names.
    pub fonts: Vec<FontSource>,
    /// Registered family used for unknown families.
    pub default_family: Option<String>,
    /// Fall back to platform fonts.
    pub system_fonts: bool,
    /// HTTP client settings.
    pub fetch: FetchConfig,
    /// Root for relative image and font paths.
    pub base_dir: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template: TemplateConfig::default(),
            input_policy: InputPolicy::default(),
            profile_failure: ProfileFailure::default(),
            fonts: Vec::new(),
            default_family: None,
            system_fonts: true,
            fetch: FetchConfig::default(),
            base_dir: None,
        }
    }
}

impl RenderConfig {
    /// Parse a JSON config document.
    pub fn from_reader<R: std::io::Read>(r: R) -> TesseraResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| TesseraError::serde(format!("parse render config JSON: {e}")))
    }

    /// Parse a JSON config file. Relative `base_dir` is taken relative to the file.
    pub fn from_path(path: impl AsRef<Path>) -> TesseraResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TesseraError::validation(format!("open render config '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_reader(BufReader::new(f))?;

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        cfg.base_dir = Some(match cfg.base_dir.take() {
            Some(base) if base.is_relative() => dir.join(base),
            Some(base) => base,
            None => dir.to_path_buf(),
        });
        Ok(cfg)
    }

    /// Apply `TESSERA_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`; unparsable values are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("TESSERA_FETCH_TIMEOUT_SECS") {
            match v.trim().parse::<u64>() {
                Ok(n) if n > 0 => self.fetch.timeout_secs = n,
                _ => tracing::warn!(value = %v, "ignoring invalid TESSERA_FETCH_TIMEOUT_SECS"),
            }
        }
        if let Some(v) = lookup("TESSERA_FETCH_MAX_BYTES") {
            match v.trim().parse::<u64>() {
                Ok(n) if n > 0 => self.fetch.max_bytes = n,
                _ => tracing::warn!(value = %v, "ignoring invalid TESSERA_FETCH_MAX_BYTES"),
            }
        }
        if let Some(v) = lookup("TESSERA_PROFILE_FAILURE") {
            match v.trim().to_ascii_lowercase().as_str() {
                "abort" => self.profile_failure = ProfileFailure::Abort,
                "skip" => self.profile_failure = ProfileFailure::Skip,
                _ => tracing::warn!(value = %v, "ignoring invalid TESSERA_PROFILE_FAILURE"),
            }
        }
    }

    /// Register fonts, build the HTTP client, and freeze everything into a [`Renderer`].
    pub fn build_renderer(&self) -> TesseraResult<Renderer> {
        let fetcher = HttpFetcher::new(&self.fetch)?;
        self.build_renderer_with_fetcher(Arc::new(fetcher))
    }

    /// Like [`RenderConfig::build_renderer`] with a caller-supplied URL fetcher.
    pub fn build_renderer_with_fetcher(&self, fetcher: Arc<dyn Fetch>) -> TesseraResult<Renderer> {
        let mut fonts = FontRegistry::builder().system_fallback(self.system_fonts);
        for font in &self.fonts {
            fonts = fonts.register_file(self.resolve_path(&font.path), &font.family)?;
        }
        if let Some(family) = &self.default_family {
            fonts = fonts.default_family(family.clone());
        }
        let fonts = fonts.build()?;

        let mut resolver = ImageResolver::new(fetcher).with_max_bytes(self.fetch.max_bytes);
        if let Some(base) = &self.base_dir {
            resolver = resolver.with_base_dir(base.clone());
        }

        let template = self.template.to_template();
        tracing::info!(
            preset = ?self.template.preset,
            input_policy = ?self.input_policy,
            profile_failure = ?self.profile_failure,
            "renderer configured"
        );
        Ok(Renderer::new(template, Arc::new(fonts), resolver)
            .with_input_policy(self.input_policy)
            .with_profile_failure(self.profile_failure))
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
