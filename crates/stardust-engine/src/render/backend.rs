//! Seams between the render protocols and the GPU.
//!
//! [`crate::device::RenderContext`] implements every trait here on top of wgpu.
//! The shader cache, pipeline builder and renderer only talk to these traits.

use std::ops::Range;
use std::path::Path;

use crate::device::RenderError;

use super::ShaderCache;

/// Compiles shader source into a device module handle.
pub trait ShaderCompiler {
    /// Cheap-to-clone handle; clones refer to the same compiled module.
    type Module: Clone;

    /// Compiles `source`, read from `path`. The path is used for labels and errors only.
    fn compile_shader(&self, path: &Path, source: &str) -> Result<Self::Module, RenderError>;
}

/// One programmable stage of a pipeline.
#[derive(Debug)]
pub struct StageDescriptor<'a, M> {
    pub module: &'a M,
    pub entry_point: &'a str,
}

/// Fully resolved pipeline description handed to the device.
#[derive(Debug)]
pub struct PipelineDescriptor<'a, M, L> {
    pub label: &'a str,
    pub layout: &'a L,
    pub vertex: StageDescriptor<'a, M>,
    pub fragment: Option<StageDescriptor<'a, M>>,
    pub color_format: wgpu::TextureFormat,
    pub primitive: wgpu::PrimitiveState,
    pub multisample: wgpu::MultisampleState,
}

/// Device operations needed to build render pipelines.
pub trait PipelineDevice: ShaderCompiler {
    type Layout;
    type Pipeline;

    /// Cache shader paths resolve through.
    fn shader_cache(&self) -> &ShaderCache<Self::Module>;

    /// Layout with no bind groups, used when the builder was given none.
    fn create_empty_layout(&self, label: &str) -> Self::Layout;

    fn create_pipeline(
        &self,
        desc: &PipelineDescriptor<'_, Self::Module, Self::Layout>,
    ) -> Result<Self::Pipeline, RenderError>;
}

/// Description of the single render pass recorded each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePass {
    pub label: &'static str,
    color: wgpu::Operations<wgpu::Color>,
    pub vertices: Range<u32>,
}

impl FramePass {
    /// Pass with one color attachment cleared to `clear` and stored.
    pub fn clear_to(label: &'static str, clear: wgpu::Color, vertices: Range<u32>) -> Self {
        Self {
            label,
            color: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
            vertices,
        }
    }

    /// Color attachment operations. Always exactly one entry.
    pub fn color_attachments(&self) -> &[wgpu::Operations<wgpu::Color>] {
        std::slice::from_ref(&self.color)
    }

    pub fn clear_color(&self) -> Option<wgpu::Color> {
        match self.color.load {
            wgpu::LoadOp::Clear(c) => Some(c),
            _ => None,
        }
    }
}

/// Per-frame acquire / record / submit / present operations.
pub trait FrameBackend {
    type Frame;
    type Encoder;
    type CommandBuffer;
    type Pipeline;

    /// Acquires the current presentable frame and its view.
    fn current_frame_view(&mut self) -> Result<Self::Frame, RenderError>;

    fn create_encoder(&self) -> Result<Self::Encoder, RenderError>;

    /// Records `pass` into `encoder` targeting `frame`, with `pipeline` bound.
    fn encode_pass(
        &self,
        encoder: &mut Self::Encoder,
        frame: &Self::Frame,
        pass: &FramePass,
        pipeline: &Self::Pipeline,
    );

    fn finish(&self, encoder: Self::Encoder) -> Result<Self::CommandBuffer, RenderError>;

    fn submit(&self, buffer: Self::CommandBuffer);

    fn present(&self, frame: Self::Frame);
}
