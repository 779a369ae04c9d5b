use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures raised while bringing up the GPU or rendering a frame.
///
/// Every variant is fatal for the operation that produced it; nothing is retried.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface ({platform}): {reason}")]
    SurfaceCreation { platform: String, reason: String },

    #[error("no compatible GPU adapter: {0}")]
    AdapterUnavailable(String),

    #[error("adapter exposes {available} bind group(s), at least {required} required")]
    InsufficientCapability { available: u32, required: u32 },

    #[error("failed to create device: {0}")]
    DeviceCreation(String),

    #[error("{operation} did not complete within {timeout:?}")]
    RequestTimeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("failed to read shader source {}: {source}", .path.display())]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("shader {} rejected by device: {message}", .path.display())]
    ShaderCompilation { path: PathBuf, message: String },

    #[error("failed to create render pipeline `{label}`: {message}")]
    PipelineCreation { label: String, message: String },

    #[error("failed to create command encoder: {0}")]
    EncoderCreation(String),

    #[error("failed to finish command encoder: {0}")]
    CommandFinish(String),

    #[error("failed to acquire surface texture: {0}")]
    SurfaceAcquire(#[from] wgpu::SurfaceError),
}

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}
