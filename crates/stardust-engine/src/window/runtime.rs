use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{ContextInit, RenderContext, window_resized};
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,

    /// Requested inner width. Logical pixels when `allow_high_dpi`, physical otherwise.
    pub width: u32,
    pub height: u32,

    /// Borderless-desktop fullscreen. Windowed mode is resizable.
    pub fullscreen: bool,

    pub allow_high_dpi: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "Stardust".to_string(),
            width: 1600,
            height: 900,
            fullscreen: false,
            allow_high_dpi: false,
        }
    }
}

impl RuntimeConfig {
    pub(crate) fn window_attributes(&self) -> WindowAttributes {
        let attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_resizable(!self.fullscreen);

        let attrs = if self.allow_high_dpi {
            attrs.with_inner_size(LogicalSize::new(f64::from(self.width), f64::from(self.height)))
        } else {
            attrs.with_inner_size(PhysicalSize::new(self.width, self.height))
        };

        if self.fullscreen {
            attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
        } else {
            attrs
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, brings up its render context and runs `app` until the
    /// window is closed or the app asks to exit.
    ///
    /// Startup failures (window, GPU, `App::on_start`) are returned.
    pub fn run<A>(config: RuntimeConfig, init: ContextInit, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: RenderContext<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    init: ContextInit,
    app: A,

    entry: Option<WindowEntry>,
    failure: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, init: ContextInit, app: A) -> Self {
        Self {
            config,
            init,
            app,
            entry: None,
            failure: None,
            exit_requested: false,
        }
    }

    fn create_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let window = event_loop
            .create_window(self.config.window_attributes())
            .context("failed to create window")?;

        log::info!(
            "window `{}` created at {}x{}",
            self.config.title,
            window.inner_size().width,
            window.inner_size().height,
        );

        let init = self.init.clone();
        let mut entry = WindowEntryTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| RenderContext::new(w, init),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let app = &mut self.app;
        entry
            .with_gpu_mut(|gpu| app.on_start(gpu))
            .context("application failed to start")?;

        Ok(entry)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        self.request_exit(event_loop);
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        // Dropping the entry releases the render context before the window.
        self.entry = None;
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        let app = &mut self.app;
        let control = entry.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    window: fields.window,
                },
                gpu: fields.gpu,
                time: fields.clock.tick(),
            };
            app.on_frame(&mut ctx)
        });

        if control == AppControl::Exit {
            self.request_exit(event_loop);
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        // Poll: drain pending events, then render, continuously.
        event_loop.set_control_flow(ControlFlow::Poll);

        match self.create_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.entry = Some(entry);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let owned = self
            .entry
            .as_ref()
            .is_some_and(|e| e.with_window(|w| w.id()) == window_id);
        if !owned || self.exit_requested {
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                log::info!("quit requested");
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(size) => {
                if let Some(entry) = &self.entry {
                    entry.with_gpu(|gpu| window_resized(gpu, size));
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}
