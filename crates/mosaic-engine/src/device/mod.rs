//! GPU device + surface management.
//!
//! `Gpu` creates the wgpu device for the viewer window and owns its
//! swapchain, including the multisampled color target when MSAA is on.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame, SurfaceErrorAction};
pub use init::GpuInit;
