//! Mosaic engine crate.
//!
//! Owns the platform + GPU runtime pieces: window loop, input translation,
//! draw stream, and the renderers that turn it into pixels.

pub mod device;
pub mod window;
pub mod input;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
pub mod text;
