//! Shape renderers, one per `DrawCmd` variant.

mod common;

pub mod polygon;
pub mod text;
mod tessellate;
