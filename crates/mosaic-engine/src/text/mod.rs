//! Font loading, measurement and line rasterization.
//!
//! GPU upload lives in `render::shapes::text`.

mod font_system;
mod line;

pub use font_system::{FontId, FontLoadError, FontSystem};
pub use line::LineBitmap;
