use std::time::Duration;

/// Minimum number of bind group slots an adapter must expose.
pub const REQUIRED_BIND_GROUPS: u32 = 1;

/// Initialization parameters for the render context.
///
/// Defaults reproduce the fixed configuration the client runs with: BGRA8 unorm,
/// immediate presentation (no vsync) and a single bind group.
#[derive(Debug, Clone)]
pub struct ContextInit {
    /// Backends the instance may pick from.
    pub backends: wgpu::Backends,

    /// Adapter preference. Software fallback adapters are never forced.
    pub power_preference: wgpu::PowerPreference,

    /// Surface format requested at configuration time.
    ///
    /// Falls back to the first supported format (with a warning) if the surface
    /// does not offer it.
    pub surface_format: wgpu::TextureFormat,

    /// Present mode. Falls back to FIFO when unsupported.
    pub present_mode: wgpu::PresentMode,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Upper bound on each blocking adapter/device request.
    pub request_timeout: Duration,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for ContextInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            surface_format: wgpu::TextureFormat::Bgra8Unorm,
            present_mode: wgpu::PresentMode::Immediate,
            required_limits: wgpu::Limits {
                max_bind_groups: REQUIRED_BIND_GROUPS,
                ..wgpu::Limits::downlevel_defaults()
            },
            request_timeout: Duration::from_secs(10),
            desired_maximum_frame_latency: 2,
        }
    }
}
