use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::window::{Fullscreen, Window};

use crate::device::{RenderContext, RenderError, SurfaceErrorAction};
use crate::render::Renderer;
use crate::time::FrameTime;

use super::app::AppControl;

/// Window handle plus the window properties the application may query or change.
///
/// Size changes made here never touch the configured surface; see
/// [`RenderContext::reconfigure`].
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    pub fn is_fullscreen(&self) -> bool {
        self.window.fullscreen().is_some()
    }

    /// Switches between windowed and borderless-desktop fullscreen.
    pub fn set_fullscreen(&self, fullscreen: bool) {
        if self.is_fullscreen() == fullscreen {
            return;
        }
        self.window
            .set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
    }

    /// Inner size in physical pixels.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.window.inner_size()
    }

    /// Requests a new inner width, keeping the height. No-op if unchanged.
    pub fn set_width(&self, width: u32) {
        if let Some(size) = with_width(self.size(), width) {
            let _ = self.window.request_inner_size(size);
        }
    }

    /// Requests a new inner height, keeping the width. No-op if unchanged.
    pub fn set_height(&self, height: u32) {
        if let Some(size) = with_height(self.size(), height) {
            let _ = self.window.request_inner_size(size);
        }
    }

    /// Outer position, if the platform exposes it (Wayland does not).
    pub fn position(&self) -> Option<PhysicalPosition<i32>> {
        self.window.outer_position().ok()
    }

    pub fn set_position(&self, x: i32, y: i32) {
        if let Some(position) = moved_to(self.position(), x, y) {
            self.window.set_outer_position(position);
        }
    }
}

fn with_width(current: PhysicalSize<u32>, width: u32) -> Option<PhysicalSize<u32>> {
    (current.width != width).then(|| PhysicalSize::new(width, current.height))
}

fn with_height(current: PhysicalSize<u32>, height: u32) -> Option<PhysicalSize<u32>> {
    (current.height != height).then(|| PhysicalSize::new(current.width, height))
}

/// Target position, unless the window already sits there. An unknown current
/// position always moves.
fn moved_to(
    current: Option<PhysicalPosition<i32>>,
    x: i32,
    y: i32,
) -> Option<PhysicalPosition<i32>> {
    let target = PhysicalPosition::new(x, y);
    (current != Some(target)).then_some(target)
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `RenderContext<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut RenderContext<'w>,
    pub time: FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Renders one frame with `renderer` and applies the surface error policy.
    ///
    /// Lost/outdated surfaces are reconfigured and the frame skipped; timeouts
    /// skip the frame; out-of-memory and every other render error end the loop.
    pub fn render(&mut self, renderer: &Renderer<wgpu::RenderPipeline>) -> AppControl {
        self.window.window.pre_present_notify();

        match renderer.render(&mut *self.gpu) {
            Ok(()) => AppControl::Continue,
            Err(RenderError::SurfaceAcquire(err)) => {
                let reason = err.to_string();
                match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface unusable: {reason}");
                        AppControl::Exit
                    }
                    action => {
                        log::debug!("frame {} skipped ({action:?}): {reason}", self.time.frame_index);
                        AppControl::Continue
                    }
                }
            }
            Err(err) => {
                log::error!("frame {} failed: {err}", self.time.frame_index);
                AppControl::Exit
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_change_keeps_height() {
        let current = PhysicalSize::new(1600, 900);
        assert_eq!(with_width(current, 1280), Some(PhysicalSize::new(1280, 900)));
        assert_eq!(with_width(current, 1600), None);
    }

    #[test]
    fn height_change_keeps_width() {
        let current = PhysicalSize::new(1600, 900);
        assert_eq!(with_height(current, 720), Some(PhysicalSize::new(1600, 720)));
        assert_eq!(with_height(current, 900), None);
    }

    #[test]
    fn move_skips_current_position() {
        let here = PhysicalPosition::new(10, 20);
        assert_eq!(moved_to(Some(here), 10, 20), None);
        assert_eq!(moved_to(Some(here), 0, 20), Some(PhysicalPosition::new(0, 20)));
        assert_eq!(moved_to(None, 10, 20), Some(here));
    }
}
