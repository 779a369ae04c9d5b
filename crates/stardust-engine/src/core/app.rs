use winit::event::WindowEvent;

use crate::device::RenderContext;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called once after the render context is up, before the first frame.
    ///
    /// Pipelines are built here. An error aborts the runtime.
    fn on_start(&mut self, gpu: &mut RenderContext<'_>) -> anyhow::Result<()>;

    /// Called for window events, before the runtime handles them.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
