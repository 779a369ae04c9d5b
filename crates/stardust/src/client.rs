use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use stardust_engine::core::{App, AppControl, FrameCtx};
use stardust_engine::device::{ContextInit, RenderContext};
use stardust_engine::render::Renderer;
use stardust_engine::time::FrameRate;
use stardust_engine::window::{Runtime, RuntimeConfig};

use crate::args::LaunchArgs;

const TRIANGLE_SHADER: &str = "triangle.wgsl";

/// Overrides the shader directory search.
const SHADER_DIR_ENV: &str = "STARDUST_SHADER_DIR";

/// Directories searched for shaders, in order: `$STARDUST_SHADER_DIR`, `shaders/`
/// next to the executable, then `shaders/` under the working directory.
fn shader_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(dir) = std::env::var_os(SHADER_DIR_ENV) {
        dirs.push(PathBuf::from(dir));
    }
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir.join("shaders"));
    }
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.join("shaders"));
    }

    dirs
}

/// First existing `dir/name`. Falls back to the last candidate so a missing
/// shader is reported against a concrete path.
fn resolve_shader(name: &str, dirs: &[PathBuf]) -> PathBuf {
    let candidates: Vec<PathBuf> = dirs.iter().map(|dir| dir.join(name)).collect();

    candidates
        .iter()
        .find(|path| path.is_file())
        .or(candidates.last())
        .cloned()
        .unwrap_or_else(|| PathBuf::from(name))
}

/// Client entry point: opens the window and renders until it is closed.
pub fn run(launch: &LaunchArgs) -> anyhow::Result<()> {
    log::info!("client detected");
    for (key, value) in &launch.args {
        log::info!("key: {key} ; value: {value}");
    }

    let config = RuntimeConfig {
        fullscreen: launch.get("-fullscreen") == Some("true"),
        ..RuntimeConfig::default()
    };

    let shader = resolve_shader(TRIANGLE_SHADER, &shader_dirs());
    log::debug!("triangle shader: {}", shader.display());

    Runtime::run(config, ContextInit::default(), Client::new(shader))
        .context("client runtime failed")
}

struct Client {
    shader: PathBuf,
    renderer: Option<Renderer<wgpu::RenderPipeline>>,
    frame_rate: FrameRate,
}

impl Client {
    fn new(shader: impl Into<PathBuf>) -> Self {
        Self {
            shader: shader.into(),
            renderer: None,
            frame_rate: FrameRate::new(Duration::from_secs(5)),
        }
    }
}

impl App for Client {
    fn on_start(&mut self, gpu: &mut RenderContext<'_>) -> anyhow::Result<()> {
        let pipeline = gpu
            .pipeline_builder()
            .name("triangle")
            .vertex_shader(&self.shader, "vs_main")
            .fragment_shader(&self.shader, "fs_main")
            .multisample_state(1, !0)
            .primitive_state(
                wgpu::PrimitiveTopology::TriangleList,
                None,
                wgpu::FrontFace::Ccw,
                None,
            )
            .build()
            .with_context(|| format!("failed to build pipeline from {}", self.shader.display()))?;

        self.renderer = Some(Renderer::new(pipeline));
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if let Some(fps) = self.frame_rate.record(&ctx.time) {
            log::debug!("{fps:.1} fps (frame {})", ctx.time.frame_index);
        }

        match &self.renderer {
            Some(renderer) => ctx.render(renderer),
            None => AppControl::Exit,
        }
    }
}
