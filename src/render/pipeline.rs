use std::sync::Arc;

use rayon::prelude::*;

use crate::{
    assets::decode::RasterImage,
    assets::source::{ImageRef, ImageResolver},
    composition::model::RenderSpec,
    foundation::core::Rect,
    foundation::error::{ImageLoadError, Layer, RenderError, TesseraError, TesseraResult},
    render::{
        clip::draw_clipped_circular,
        surface::Surface,
        template::{CanvasPolicy, Template},
    },
    request::mapper::RenderRequest,
    text::{fonts::FontRegistry, renderer::draw_text},
};

/// How strictly a spec's mandatory fields are checked before rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputPolicy {
    /// Reject a spec without a background before any IO.
    #[default]
    Strict,
    /// Attempt the render; a missing background fails at load time.
    Lenient,
}

/// What a failed profile picture does to the render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileFailure {
    /// Fail the whole render.
    Abort,
    /// Log a warning and emit the image without the profile layer.
    #[default]
    Skip,
}

/// Encoded render output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedImage {
    /// PNG bytes.
    pub bytes: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl RenderedImage {
    /// MIME type of [`RenderedImage::bytes`].
    pub fn content_type(&self) -> &'static str {
        "image/png"
    }
}

/// Immutable, shareable renderer. Every call to [`Renderer::render`] owns its own surface.
#[derive(Clone, Debug)]
pub struct Renderer {
    template: Template,
    fonts: Arc<FontRegistry>,
    resolver: ImageResolver,
    input_policy: InputPolicy,
    profile_failure: ProfileFailure,
}

impl Renderer {
    /// Renderer with strict input checking and skipped profile failures.
    pub fn new(template: Template, fonts: Arc<FontRegistry>, resolver: ImageResolver) -> Self {
        Self {
            template,
            fonts,
            resolver,
            input_policy: InputPolicy::default(),
            profile_failure: ProfileFailure::default(),
        }
    }

    /// Override the input policy.
    pub fn with_input_policy(mut self, policy: InputPolicy) -> Self {
        self.input_policy = policy;
        self
    }

    /// Override the profile failure policy.
    pub fn with_profile_failure(mut self, policy: ProfileFailure) -> Self {
        self.profile_failure = policy;
        self
    }

    /// Deployment template in use.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Normalize `request` and render it.
    pub fn render_request(&self, request: RenderRequest) -> TesseraResult<RenderedImage> {
        self.render(request.into_render_spec())
    }

    /// Composite `spec` (clear → background → text → profile) and encode it as PNG.
    ///
    /// Any failure discards the partially drawn surface.
    #[tracing::instrument(
        skip_all,
        fields(
            text = spec.text.is_some(),
            profile = spec.profile.is_some(),
        )
    )]
    pub fn render(&self, spec: RenderSpec) -> TesseraResult<RenderedImage> {
        if self.input_policy == InputPolicy::Strict {
            spec.validate_strict()?;
        }

        let (mut surface, background) = match self.template.canvas {
            CanvasPolicy::Fixed { width, height } => {
                let surface = Surface::new(width, height)?;
                let background = self.load_background(spec.background.as_ref())?;
                (surface, background)
            }
            CanvasPolicy::Intrinsic => {
                let background = self.load_background(spec.background.as_ref())?;
                let surface = Surface::new(background.width, background.height)?;
                (surface, background)
            }
        };

        if let Some(color) = self.template.clear {
            surface.clear(color);
        }
        let full_bleed = Rect::new(
            0.0,
            0.0,
            f64::from(surface.width()),
            f64::from(surface.height()),
        );
        surface.draw_image(&background, full_bleed)?;
        tracing::debug!(
            width = surface.width(),
            height = surface.height(),
            "background drawn"
        );

        if let Some(text) = &spec.text {
            draw_text(&mut surface, text, self.template.text_layout, &self.fonts)?;
        }

        if let Some(profile) = &spec.profile {
            let region = profile.region(self.template.profile_defaults);
            let drawn = self
                .resolver
                .resolve(&profile.src)
                .map_err(|e| RenderError::load(Layer::Profile, e))
                .and_then(|img| draw_clipped_circular(&mut surface, &img, region));

            match (drawn, self.profile_failure) {
                (Ok(()), _) => tracing::debug!(?region, "profile drawn"),
                (Err(err), ProfileFailure::Abort) => return Err(err.into()),
                (Err(err), ProfileFailure::Skip) => {
                    tracing::warn!(error = %err, "profile layer skipped");
                }
            }
        }

        let frame = surface.finish();
        let (width, height) = (frame.width, frame.height);
        let bytes = frame.encode_png()?;
        tracing::debug!(bytes = bytes.len(), "render encoded");
        Ok(RenderedImage {
            bytes,
            width,
            height,
        })
    }

    /// Render independent specs in parallel.
    ///
    /// Results keep the input order; one failing spec does not affect the others.
    /// `threads` overrides the worker count (`None` uses rayon's default).
    pub fn render_batch(
        &self,
        specs: Vec<RenderSpec>,
        threads: Option<usize>,
    ) -> TesseraResult<Vec<TesseraResult<RenderedImage>>> {
        let pool = build_thread_pool(threads)?;
        Ok(pool.install(|| {
            specs
                .into_par_iter()
                .map(|spec| self.render(spec))
                .collect()
        }))
    }

    fn load_background(&self, source: Option<&ImageRef>) -> Result<RasterImage, RenderError> {
        let source =
            source.ok_or_else(|| RenderError::load(Layer::Background, ImageLoadError::Missing))?;
        self.resolver
            .resolve(source)
            .map_err(|e| RenderError::load(Layer::Background, e))
    }
}

fn build_thread_pool(threads: Option<usize>) -> TesseraResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(TesseraError::validation(
            "batch 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| TesseraError::from(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}
