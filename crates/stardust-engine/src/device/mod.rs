//! GPU device + surface management.
//!
//! This module is responsible for:
//! - probing the window system and creating the platform surface
//! - creating the wgpu Instance/Adapter/Device/Queue, with bounded waits
//! - configuring the surface and acquiring frames for rendering

mod context;
mod diagnostics;
mod error;
mod frame;
mod init;
mod platform;
mod request;
mod surface;

pub use context::RenderContext;
pub use diagnostics::{DeviceErrors, ErrorCheckpoint};
pub use error::{RenderError, SurfaceErrorAction};
pub use frame::Frame;
pub use init::{ContextInit, REQUIRED_BIND_GROUPS};
pub use platform::{SurfacePlatform, create_surface};
pub use request::{DeviceSource, acquire_device, check_adapter_limits};
pub use surface::{SurfaceResize, surface_configuration, window_resized};
#[cfg(test)]
pub(crate) use surface::resized_configuration;
