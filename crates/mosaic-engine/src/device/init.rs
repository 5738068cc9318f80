/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format so shaders can output linear color.
    pub prefer_srgb: bool,

    /// Wait for vertical blank (`Fifo`). Otherwise `AutoNoVsync`.
    pub vsync: bool,

    pub power_preference: wgpu::PowerPreference,

    /// Desired maximum frame latency for the surface. Hint only.
    pub frame_latency: u32,

    /// MSAA sample count for the color target. `1` disables antialiasing.
    ///
    /// Lowered to the best count the adapter supports for the surface format.
    pub sample_count: u32,
}

impl GpuInit {
    pub(crate) fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            vsync: true,
            power_preference: wgpu::PowerPreference::HighPerformance,
            frame_latency: 2,
            sample_count: 4,
        }
    }
}
