pub mod clip;
pub mod pipeline;
pub mod surface;
pub mod template;
