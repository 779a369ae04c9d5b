use std::path::PathBuf;

use crate::device::RenderError;

use super::backend::{PipelineDescriptor, PipelineDevice, StageDescriptor};

#[derive(Debug, Clone)]
struct StageSource {
    path: PathBuf,
    entry_point: String,
}

/// Fluent assembler for one immutable render pipeline.
///
/// Configuration is value-owned; `build` consumes the builder, so a builder can
/// never produce a second pipeline.
///
/// Defaults: triangle list, counter-clockwise front face, no culling, single
/// sample with all mask bits set, empty pipeline layout.
pub struct PipelineBuilder<'d, D: PipelineDevice + ?Sized> {
    device: &'d D,
    label: String,
    layout: Option<D::Layout>,
    vertex: Option<StageSource>,
    fragment: Option<StageSource>,
    color_format: wgpu::TextureFormat,
    primitive: wgpu::PrimitiveState,
    multisample: wgpu::MultisampleState,
}

impl<'d, D: PipelineDevice + ?Sized> PipelineBuilder<'d, D> {
    /// Starts a pipeline rendering into targets of `color_format`.
    pub fn new(device: &'d D, color_format: wgpu::TextureFormat) -> Self {
        Self {
            device,
            label: "stardust pipeline".to_string(),
            layout: None,
            vertex: None,
            fragment: None,
            color_format,
            primitive: wgpu::PrimitiveState::default(),
            multisample: wgpu::MultisampleState::default(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.label = name.into();
        self
    }

    /// Uses `layout` instead of the empty default.
    pub fn pipeline_layout(mut self, layout: D::Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn vertex_shader(mut self, path: impl Into<PathBuf>, entry_point: impl Into<String>) -> Self {
        self.vertex = Some(StageSource {
            path: path.into(),
            entry_point: entry_point.into(),
        });
        self
    }

    pub fn fragment_shader(
        mut self,
        path: impl Into<PathBuf>,
        entry_point: impl Into<String>,
    ) -> Self {
        self.fragment = Some(StageSource {
            path: path.into(),
            entry_point: entry_point.into(),
        });
        self
    }

    pub fn color_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.color_format = format;
        self
    }

    pub fn multisample_state(mut self, count: u32, mask: u64) -> Self {
        self.multisample.count = count;
        self.multisample.mask = mask;
        self
    }

    pub fn primitive_state(
        mut self,
        topology: wgpu::PrimitiveTopology,
        cull_mode: Option<wgpu::Face>,
        front_face: wgpu::FrontFace,
        strip_index_format: Option<wgpu::IndexFormat>,
    ) -> Self {
        self.primitive.topology = topology;
        self.primitive.cull_mode = cull_mode;
        self.primitive.front_face = front_face;
        self.primitive.strip_index_format = strip_index_format;
        self
    }

    /// Resolves shaders through the device's cache and creates the pipeline.
    pub fn build(self) -> Result<D::Pipeline, RenderError> {
        let fail = |message: &str| RenderError::PipelineCreation {
            label: self.label.clone(),
            message: message.to_string(),
        };

        let vertex = self.vertex.as_ref().ok_or_else(|| fail("no vertex shader set"))?;

        if self.primitive.strip_index_format.is_some() && !self.primitive.topology.is_strip() {
            return Err(fail("strip index format requires a strip topology"));
        }
        if !self.multisample.count.is_power_of_two() {
            return Err(fail("multisample count must be a non-zero power of two"));
        }

        let shaders = self.device.shader_cache();
        let vertex_module = shaders.get_or_load(self.device, &vertex.path)?;
        let fragment_module = self
            .fragment
            .as_ref()
            .map(|f| shaders.get_or_load(self.device, &f.path))
            .transpose()?;

        let empty_layout;
        let layout = match &self.layout {
            Some(layout) => layout,
            None => {
                empty_layout = self
                    .device
                    .create_empty_layout(&format!("{} layout", self.label));
                &empty_layout
            }
        };

        let desc = PipelineDescriptor {
            label: &self.label,
            layout,
            vertex: StageDescriptor {
                module: &vertex_module,
                entry_point: &vertex.entry_point,
            },
            fragment: self
                .fragment
                .as_ref()
                .zip(fragment_module.as_ref())
                .map(|(f, module)| StageDescriptor {
                    module,
                    entry_point: &f.entry_point,
                }),
            color_format: self.color_format,
            primitive: self.primitive,
            multisample: self.multisample,
        };

        let pipeline = self.device.create_pipeline(&desc)?;
        log::debug!("created render pipeline `{}`", self.label);
        Ok(pipeline)
    }
}
