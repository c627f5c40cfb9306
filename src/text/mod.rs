pub mod fonts;
pub mod renderer;
