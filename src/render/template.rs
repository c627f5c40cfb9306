use crate::{
    assets::color::Rgba8,
    foundation::core::{Position, Region},
    text::renderer::TextLayout,
};

/// Profile clip box placement shared by both built-in templates.
pub const DEFAULT_PROFILE_POSITION: Position = Position {
    top: 148,
    left: 86,
};

/// How the surface size is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanvasPolicy {
    /// Surface takes the background's pixel size; decided after the background loads.
    Intrinsic,
    /// Constant surface size; decided before the background loads.
    Fixed {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
}

/// Deployment-level rendering choices. Fixed per renderer, never per request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Template {
    /// Surface sizing.
    pub canvas: CanvasPolicy,
    /// Text placement policy.
    pub text_layout: TextLayout,
    /// Profile region used for unset position/size fields.
    pub profile_defaults: Region,
    /// Color painted before the background; `None` leaves the surface transparent.
    pub clear: Option<Rgba8>,
}

impl Template {
    /// Canvas sized by the background with explicitly placed text and a 100×100 profile.
    pub fn freeform() -> Self {
        Self {
            canvas: CanvasPolicy::Intrinsic,
            text_layout: TextLayout::Explicit { fallback_top: 100 },
            profile_defaults: Region {
                x: DEFAULT_PROFILE_POSITION.left,
                y: DEFAULT_PROFILE_POSITION.top,
                width: 100,
                height: 100,
            },
            clear: None,
        }
    }

    /// Fixed 1200×630 card with text centered at 460 and a 272×272 profile.
    pub fn profile_card() -> Self {
        Self {
            canvas: CanvasPolicy::Fixed {
                width: 1200,
                height: 630,
            },
            text_layout: TextLayout::Centered { top: 460 },
            profile_defaults: Region {
                x: DEFAULT_PROFILE_POSITION.left,
                y: DEFAULT_PROFILE_POSITION.top,
                width: 272,
                height: 272,
            },
            clear: None,
        }
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::freeform()
    }
}
