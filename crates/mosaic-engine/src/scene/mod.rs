//! Scene (draw stream) types.
//!
//! Draw commands are renderer-agnostic and painted in layer order, then in
//! the order they were pushed. Push helpers live next to each payload type
//! under `scene::shapes`.

mod cmd;
mod layer;
mod list;

pub mod shapes;

pub use cmd::DrawCmd;
pub use layer::{Layer, SortKey};
pub use list::{DrawItem, DrawList};
pub use shapes::Border;
