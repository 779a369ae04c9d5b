use std::fmt;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle};
use winit::window::Window;

use super::RenderError;

/// Platform payload a surface is created from.
///
/// Resolved at runtime from the window's raw handles rather than by `cfg`, so the
/// same Linux binary serves both X11 and Wayland sessions.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfacePlatform {
    Windows { hwnd: isize, hinstance: Option<isize> },
    MacOs { ns_view: usize },
    X11 { display: Option<usize>, window: u64 },
    Wayland { display: usize, surface: usize },
}

impl SurfacePlatform {
    /// Classifies a display/window handle pair.
    ///
    /// Display and window must come from the same windowing system.
    pub fn from_raw(
        display: RawDisplayHandle,
        window: RawWindowHandle,
    ) -> Result<Self, RenderError> {
        match (display, window) {
            (_, RawWindowHandle::Win32(h)) => Ok(Self::Windows {
                hwnd: h.hwnd.get(),
                hinstance: h.hinstance.map(|i| i.get()),
            }),
            (_, RawWindowHandle::AppKit(h)) => Ok(Self::MacOs {
                ns_view: h.ns_view.as_ptr() as usize,
            }),
            (RawDisplayHandle::Xlib(d), RawWindowHandle::Xlib(h)) => Ok(Self::X11 {
                display: d.display.map(|p| p.as_ptr() as usize),
                window: h.window as u64,
            }),
            (RawDisplayHandle::Xcb(d), RawWindowHandle::Xcb(h)) => Ok(Self::X11 {
                display: d.connection.map(|p| p.as_ptr() as usize),
                window: u64::from(h.window.get()),
            }),
            (RawDisplayHandle::Wayland(d), RawWindowHandle::Wayland(h)) => Ok(Self::Wayland {
                display: d.display.as_ptr() as usize,
                surface: h.surface.as_ptr() as usize,
            }),
            (display, window) => Err(RenderError::SurfaceCreation {
                platform: "unknown".to_string(),
                reason: format!("unsupported window system: {display:?} / {window:?}"),
            }),
        }
    }

    /// Probes the live window.
    pub fn probe(window: &Window) -> Result<Self, RenderError> {
        let unavailable = |e: raw_window_handle::HandleError| RenderError::SurfaceCreation {
            platform: "unknown".to_string(),
            reason: format!("window handle unavailable: {e}"),
        };

        let display = window.display_handle().map_err(unavailable)?.as_raw();
        let handle = window.window_handle().map_err(unavailable)?.as_raw();
        Self::from_raw(display, handle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Windows { .. } => "windows",
            Self::MacOs { .. } => "macos",
            Self::X11 { .. } => "x11",
            Self::Wayland { .. } => "wayland",
        }
    }
}

impl fmt::Display for SurfacePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Creates the presentation surface for `window`.
///
/// The platform is probed first so unsupported window systems fail with a clear
/// error before wgpu sees the handles.
pub fn create_surface<'w>(
    instance: &wgpu::Instance,
    window: &'w Window,
) -> Result<(wgpu::Surface<'w>, SurfacePlatform), RenderError> {
    let platform = SurfacePlatform::probe(window)?;
    log::debug!("creating surface for {platform:?}");

    let surface = instance
        .create_surface(window)
        .map_err(|e| RenderError::SurfaceCreation {
            platform: platform.to_string(),
            reason: e.to_string(),
        })?;

    Ok((surface, platform))
}
