//! Mosaic core: shape catalog, coordinate mapping, shape registry and group
//! highlighting.
//!
//! This crate is intentionally free of window and GPU code. The presentation
//! layer feeds it [`SceneEvent`]s and draws the [`DrawInstruction`]s it gets
//! back.

pub mod catalog;
pub mod error;
pub mod geometry;
pub mod highlight;
pub mod interaction;
pub mod loader;
pub mod mapper;
pub mod registry;
pub mod texture;

pub use catalog::{Catalog, GroupId, ShapeDescriptor, ShapeId, TextureKey};
pub use error::LoadError;
pub use geometry::{Point, Viewport};
pub use highlight::{DrawInstruction, HighlightState, Outline, Rgb, ACCENT};
pub use interaction::{Dispatch, SceneController, SceneEvent};
pub use loader::{load, AssetSource, LoadedScene};
pub use registry::{ShapeRecord, ShapeRegistry};
pub use texture::{TextureImage, TextureRule, TextureSet};
