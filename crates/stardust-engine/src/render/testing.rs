//! Recording GPU stand-in for exercising the render protocols without hardware.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use winit::dpi::PhysicalSize;

use crate::device::{
    ContextInit, RenderError, SurfaceResize, resized_configuration, surface_configuration,
};

use super::ShaderCache;
use super::backend::{
    FrameBackend, FramePass, PipelineDescriptor, PipelineDevice, ShaderCompiler,
};

/// Source the mock accepts. Anything containing `@invalid` is rejected.
pub(crate) const VALID_SHADER: &str = "\
@vertex
fn vs_main(@builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> {
    return vec4<f32>(0.0, 0.0, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, 1.0);
}
";

#[derive(Debug)]
pub(crate) struct MockModule {
    pub id: usize,
    pub path: PathBuf,
}

pub(crate) type MockShader = Arc<MockModule>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MockLayout {
    Empty,
    Named(String),
}

#[derive(Debug)]
pub(crate) struct MockPipeline {
    pub id: usize,
    pub layout: MockLayout,
    pub vertex_module: MockShader,
    pub vertex_entry: String,
    pub fragment_entry: Option<String>,
    pub color_format: wgpu::TextureFormat,
    pub primitive: wgpu::PrimitiveState,
    pub multisample: wgpu::MultisampleState,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Call {
    AcquireFrame,
    CreateEncoder,
    EncodePass,
    Finish,
    Submit,
    Present,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedPass {
    pub frame: u64,
    pub color_attachments: Vec<wgpu::Operations<wgpu::Color>>,
    pub pipeline: usize,
    pub vertices: Range<u32>,
}

pub(crate) struct MockFrame {
    index: u64,
}

pub(crate) struct MockEncoder {
    passes: Vec<RecordedPass>,
}

#[derive(Default)]
struct MockState {
    next_id: usize,
    compiles: usize,
    empty_layouts: usize,
    pipelines: usize,
    frames: u64,
    presents: usize,
    calls: Vec<Call>,
    submitted: Vec<Vec<RecordedPass>>,
    reject_pipelines: Option<String>,
    fail_encoder: bool,
    fail_finish: bool,
    fail_acquire: Option<wgpu::SurfaceError>,
}

impl MockState {
    fn next_id(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }
}

/// Mock device + surface. Counters are behind a mutex so the mock is `Sync`.
pub(crate) struct MockGpu {
    config: wgpu::SurfaceConfiguration,
    reconfigures: usize,
    shaders: ShaderCache<MockShader>,
    state: Mutex<MockState>,
}

impl MockGpu {
    /// Mock configured against a window of `width` x `height` with the default
    /// context settings.
    pub fn new(width: u32, height: u32) -> Self {
        let init = ContextInit::default();
        Self {
            config: surface_configuration(
                PhysicalSize::new(width, height),
                init.surface_format,
                init.present_mode,
                wgpu::CompositeAlphaMode::Opaque,
                &init,
            ),
            reconfigures: 0,
            shaders: ShaderCache::new(),
            state: Mutex::default(),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn reconfigure_count(&self) -> usize {
        self.reconfigures
    }

    pub fn reject_pipelines(&self, message: &str) {
        self.state().reject_pipelines = Some(message.to_string());
    }

    pub fn fail_encoder(&self) {
        self.state().fail_encoder = true;
    }

    pub fn fail_finish(&self) {
        self.state().fail_finish = true;
    }

    pub fn fail_acquire(&self, err: wgpu::SurfaceError) {
        self.state().fail_acquire = Some(err);
    }

    pub fn compile_count(&self) -> usize {
        self.state().compiles
    }

    pub fn empty_layout_count(&self) -> usize {
        self.state().empty_layouts
    }

    pub fn pipeline_count(&self) -> usize {
        self.state().pipelines
    }

    pub fn submit_count(&self) -> usize {
        self.state().submitted.len()
    }

    pub fn present_count(&self) -> usize {
        self.state().presents
    }

    pub fn frame_calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// All passes across every submitted command buffer, in submission order.
    pub fn submitted_passes(&self) -> Vec<RecordedPass> {
        self.state().submitted.iter().flatten().cloned().collect()
    }
}

impl SurfaceResize for MockGpu {
    fn configured_size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    fn reconfigure(&mut self, size: PhysicalSize<u32>) -> bool {
        match resized_configuration(&self.config, size) {
            Some(config) => {
                self.config = config;
                self.reconfigures += 1;
                true
            }
            None => false,
        }
    }
}

impl ShaderCompiler for MockGpu {
    type Module = MockShader;

    fn compile_shader(&self, path: &Path, source: &str) -> Result<MockShader, RenderError> {
        if source.contains("@invalid") {
            return Err(RenderError::ShaderCompilation {
                path: path.to_path_buf(),
                message: "unexpected token `@invalid`".to_string(),
            });
        }

        let mut state = self.state();
        state.compiles += 1;
        let id = state.next_id();
        Ok(Arc::new(MockModule {
            id,
            path: path.to_path_buf(),
        }))
    }
}

impl PipelineDevice for MockGpu {
    type Layout = MockLayout;
    type Pipeline = MockPipeline;

    fn shader_cache(&self) -> &ShaderCache<MockShader> {
        &self.shaders
    }

    fn create_empty_layout(&self, _label: &str) -> MockLayout {
        self.state().empty_layouts += 1;
        MockLayout::Empty
    }

    fn create_pipeline(
        &self,
        desc: &PipelineDescriptor<'_, MockShader, MockLayout>,
    ) -> Result<MockPipeline, RenderError> {
        let mut state = self.state();
        if let Some(message) = state.reject_pipelines.clone() {
            return Err(RenderError::PipelineCreation {
                label: desc.label.to_string(),
                message,
            });
        }

        state.pipelines += 1;
        Ok(MockPipeline {
            id: state.next_id(),
            layout: desc.layout.clone(),
            vertex_module: desc.vertex.module.clone(),
            vertex_entry: desc.vertex.entry_point.to_string(),
            fragment_entry: desc.fragment.as_ref().map(|f| f.entry_point.to_string()),
            color_format: desc.color_format,
            primitive: desc.primitive,
            multisample: desc.multisample,
        })
    }
}

impl FrameBackend for MockGpu {
    type Frame = MockFrame;
    type Encoder = MockEncoder;
    type CommandBuffer = Vec<RecordedPass>;
    type Pipeline = MockPipeline;

    fn current_frame_view(&mut self) -> Result<MockFrame, RenderError> {
        let mut state = self.state();
        state.calls.push(Call::AcquireFrame);
        if let Some(err) = state.fail_acquire.take() {
            return Err(err.into());
        }

        state.frames += 1;
        Ok(MockFrame {
            index: state.frames,
        })
    }

    fn create_encoder(&self) -> Result<MockEncoder, RenderError> {
        let mut state = self.state();
        state.calls.push(Call::CreateEncoder);
        if state.fail_encoder {
            return Err(RenderError::EncoderCreation("device lost".to_string()));
        }
        Ok(MockEncoder { passes: Vec::new() })
    }

    fn encode_pass(
        &self,
        encoder: &mut MockEncoder,
        frame: &MockFrame,
        pass: &FramePass,
        pipeline: &MockPipeline,
    ) {
        self.state().calls.push(Call::EncodePass);
        encoder.passes.push(RecordedPass {
            frame: frame.index,
            color_attachments: pass.color_attachments().to_vec(),
            pipeline: pipeline.id,
            vertices: pass.vertices.clone(),
        });
    }

    fn finish(&self, encoder: MockEncoder) -> Result<Vec<RecordedPass>, RenderError> {
        let mut state = self.state();
        state.calls.push(Call::Finish);
        if state.fail_finish {
            return Err(RenderError::CommandFinish("encoder invalid".to_string()));
        }
        Ok(encoder.passes)
    }

    fn submit(&self, buffer: Vec<RecordedPass>) {
        let mut state = self.state();
        state.calls.push(Call::Submit);
        state.submitted.push(buffer);
    }

    fn present(&self, _frame: MockFrame) {
        let mut state = self.state();
        state.calls.push(Call::Present);
        state.presents += 1;
    }
}
