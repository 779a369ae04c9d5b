use winit::dpi::PhysicalSize;

use super::{ContextInit, SurfaceErrorAction};

/// Picks the requested format if the surface supports it, else the first supported one.
pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    requested: wgpu::TextureFormat,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.contains(&requested) {
        return Some(requested);
    }

    let fallback = caps.formats.first().copied()?;
    log::warn!("surface does not support {requested:?}; using {fallback:?}");
    Some(fallback)
}

/// Picks the requested present mode, falling back to FIFO (always supported).
pub(crate) fn choose_present_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    if caps.present_modes.contains(&requested) {
        return requested;
    }

    log::warn!("surface does not support {requested:?} presentation; using Fifo");
    wgpu::PresentMode::Fifo
}

pub(crate) fn choose_alpha_mode(caps: &wgpu::SurfaceCapabilities) -> wgpu::CompositeAlphaMode {
    caps.alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Builds the presentation configuration for a window of `size`.
///
/// The size is captured here; later window resizes do not feed back into the
/// returned value.
pub fn surface_configuration(
    size: PhysicalSize<u32>,
    format: wgpu::TextureFormat,
    present_mode: wgpu::PresentMode,
    alpha_mode: wgpu::CompositeAlphaMode,
    init: &ContextInit,
) -> wgpu::SurfaceConfiguration {
    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: init.desired_maximum_frame_latency,
    }
}

/// The configuration re-applied at `size`, or `None` for a zero-sized request.
///
/// Format, present mode and every other field carry over unchanged.
pub(crate) fn resized_configuration(
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
) -> Option<wgpu::SurfaceConfiguration> {
    if size.width == 0 || size.height == 0 {
        return None;
    }

    Some(wgpu::SurfaceConfiguration {
        width: size.width,
        height: size.height,
        ..config.clone()
    })
}

/// A configured surface whose size changes only when asked.
pub trait SurfaceResize {
    fn configured_size(&self) -> PhysicalSize<u32>;

    /// Re-applies the configuration at `size`. Returns whether it was applied.
    fn reconfigure(&mut self, size: PhysicalSize<u32>) -> bool;
}

/// Window resize notification from the event loop.
///
/// Takes the surface by shared reference: a resize never reconfigures. The
/// surface keeps its size until [`SurfaceResize::reconfigure`] is called.
pub fn window_resized<S: SurfaceResize + ?Sized>(surface: &S, size: PhysicalSize<u32>) {
    let configured = surface.configured_size();
    log::debug!(
        "window resized to {}x{}; surface stays {}x{}",
        size.width,
        size.height,
        configured.width,
        configured.height,
    );
}

/// Maps a failed texture acquisition to what the frame loop should do.
///
/// Lost/outdated surfaces are reconfigured with the existing configuration; the
/// stored dimensions are never changed here.
pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            surface.configure(device, config);
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}
