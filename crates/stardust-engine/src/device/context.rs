use std::path::Path;

use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::render::backend::{
    FrameBackend, FramePass, PipelineDescriptor, PipelineDevice, ShaderCompiler,
};
use crate::render::{PipelineBuilder, ShaderCache};

use super::diagnostics::DeviceErrors;
use super::platform::{self, SurfacePlatform};
use super::request::{self, WgpuDeviceSource};
use super::{ContextInit, Frame, RenderError, SurfaceErrorAction, SurfaceResize, surface};

/// Owns the wgpu object chain for one window and its surface configuration.
///
/// Fields drop in declaration order, which releases everything in reverse of
/// acquisition: surface first, instance last.
pub struct RenderContext<'w> {
    /// Surface bound to the window. The window must outlive the context (`'w`).
    surface: wgpu::Surface<'w>,

    /// Configuration applied at construction; only [`RenderContext::reconfigure`] changes it.
    config: wgpu::SurfaceConfiguration,

    platform: SurfacePlatform,

    shaders: ShaderCache<wgpu::ShaderModule>,

    errors: DeviceErrors,

    queue: wgpu::Queue,

    device: wgpu::Device,

    adapter: wgpu::Adapter,

    instance: wgpu::Instance,
}

impl<'w> RenderContext<'w> {
    /// Brings up instance, surface, adapter, device and queue for `window`, in that
    /// order, then configures the surface at the window's current size.
    ///
    /// Blocks on the adapter and device requests, each bounded by
    /// `init.request_timeout`. An adapter that fails the bind group check is
    /// rejected before the device is requested.
    pub fn new(window: &'w Window, init: ContextInit) -> Result<Self, RenderError> {
        log::info!("creating render context");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        let (surface, platform) = platform::create_surface(&instance, window)?;

        let (adapter, (device, queue)) = request::acquire_device(
            &WgpuDeviceSource {
                instance: &instance,
                surface: &surface,
            },
            &init,
        )?;

        let info = adapter.get_info();
        log::info!("adapter: {} (backend: {:?})", info.name, info.backend);

        let errors = DeviceErrors::new();
        errors.attach(&device);

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, init.surface_format).ok_or_else(|| {
            RenderError::SurfaceCreation {
                platform: platform.to_string(),
                reason: "surface reports no supported formats".to_string(),
            }
        })?;
        let present_mode = surface::choose_present_mode(&caps, init.present_mode);
        let alpha_mode = surface::choose_alpha_mode(&caps);

        let config = surface::surface_configuration(
            window.inner_size(),
            format,
            present_mode,
            alpha_mode,
            &init,
        );
        surface.configure(&device, &config);

        log::info!(
            "surface configured: {}x{} {:?} {:?} on {platform}",
            config.width,
            config.height,
            config.format,
            config.present_mode,
        );

        Ok(Self {
            surface,
            config,
            platform,
            shaders: ShaderCache::new(),
            errors,
            queue,
            device,
            adapter,
            instance,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface(&self) -> &wgpu::Surface<'w> {
        &self.surface
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn platform(&self) -> SurfacePlatform {
        self.platform
    }

    pub fn surface_config(&self) -> &wgpu::SurfaceConfiguration {
        &self.config
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Configured surface size. Unaffected by window resizes until [`Self::reconfigure`].
    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    pub fn device_errors(&self) -> &DeviceErrors {
        &self.errors
    }

    /// Applies the existing configuration at a new size. Returns whether the
    /// surface was reconfigured.
    ///
    /// Zero-sized requests are ignored; wgpu cannot configure an empty surface.
    pub fn reconfigure(&mut self, size: PhysicalSize<u32>) -> bool {
        let Some(config) = surface::resized_configuration(&self.config, size) else {
            return false;
        };

        self.surface.configure(&self.device, &config);
        self.config = config;
        log::debug!("surface reconfigured to {}x{}", size.width, size.height);
        true
    }

    /// Converts a surface error into a frame-loop action.
    pub fn handle_surface_error(&self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(&self.surface, &self.device, &self.config, err)
    }

    /// Starts a pipeline targeting this surface's format.
    pub fn pipeline_builder(&self) -> PipelineBuilder<'_, Self> {
        PipelineBuilder::new(self, self.config.format)
    }
}

impl SurfaceResize for RenderContext<'_> {
    fn configured_size(&self) -> PhysicalSize<u32> {
        self.size()
    }

    fn reconfigure(&mut self, size: PhysicalSize<u32>) -> bool {
        RenderContext::reconfigure(self, size)
    }
}

impl Drop for RenderContext<'_> {
    fn drop(&mut self) {
        log::debug!("releasing render context ({})", self.platform);
    }
}

impl ShaderCompiler for RenderContext<'_> {
    type Module = wgpu::ShaderModule;

    fn compile_shader(&self, path: &Path, source: &str) -> Result<wgpu::ShaderModule, RenderError> {
        let label = path.display().to_string();
        let checkpoint = self.errors.checkpoint();

        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });

        match self.errors.since(checkpoint) {
            Some(message) => Err(RenderError::ShaderCompilation {
                path: path.to_path_buf(),
                message,
            }),
            None => Ok(module),
        }
    }
}

impl PipelineDevice for RenderContext<'_> {
    type Layout = wgpu::PipelineLayout;
    type Pipeline = wgpu::RenderPipeline;

    fn shader_cache(&self) -> &ShaderCache<wgpu::ShaderModule> {
        &self.shaders
    }

    fn create_empty_layout(&self, label: &str) -> wgpu::PipelineLayout {
        self.device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(label),
                bind_group_layouts: &[],
                immediate_size: 0,
            })
    }

    fn create_pipeline(
        &self,
        desc: &PipelineDescriptor<'_, wgpu::ShaderModule, wgpu::PipelineLayout>,
    ) -> Result<wgpu::RenderPipeline, RenderError> {
        let checkpoint = self.errors.checkpoint();

        let targets = [Some(wgpu::ColorTargetState {
            format: desc.color_format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(desc.label),
                layout: Some(desc.layout),

                vertex: wgpu::VertexState {
                    module: desc.vertex.module,
                    entry_point: Some(desc.vertex.entry_point),
                    compilation_options: Default::default(),
                    buffers: &[],
                },

                fragment: desc.fragment.as_ref().map(|f| wgpu::FragmentState {
                    module: f.module,
                    entry_point: Some(f.entry_point),
                    compilation_options: Default::default(),
                    targets: &targets,
                }),

                primitive: desc.primitive,
                depth_stencil: None,
                multisample: desc.multisample,
                multiview_mask: None,
                cache: None,
            });

        match self.errors.since(checkpoint) {
            Some(message) => Err(RenderError::PipelineCreation {
                label: desc.label.to_string(),
                message,
            }),
            None => Ok(pipeline),
        }
    }
}

impl FrameBackend for RenderContext<'_> {
    type Frame = Frame;
    type Encoder = wgpu::CommandEncoder;
    type CommandBuffer = wgpu::CommandBuffer;
    type Pipeline = wgpu::RenderPipeline;

    fn current_frame_view(&mut self) -> Result<Frame, RenderError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Frame {
            surface_texture,
            view,
        })
    }

    fn create_encoder(&self) -> Result<wgpu::CommandEncoder, RenderError> {
        let checkpoint = self.errors.checkpoint();
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("stardust frame encoder"),
            });

        match self.errors.since(checkpoint) {
            Some(message) => Err(RenderError::EncoderCreation(message)),
            None => Ok(encoder),
        }
    }

    fn encode_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        frame: &Frame,
        pass: &FramePass,
        pipeline: &wgpu::RenderPipeline,
    ) {
        let color_attachments: Vec<_> = pass
            .color_attachments()
            .iter()
            .map(|ops| {
                Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: *ops,
                    depth_slice: None,
                })
            })
            .collect();

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(pass.label),
            color_attachments: &color_attachments,
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        if !pass.vertices.is_empty() {
            rpass.draw(pass.vertices.clone(), 0..1);
        }
    }

    fn finish(&self, encoder: wgpu::CommandEncoder) -> Result<wgpu::CommandBuffer, RenderError> {
        let checkpoint = self.errors.checkpoint();
        let commands = encoder.finish();

        match self.errors.since(checkpoint) {
            Some(message) => Err(RenderError::CommandFinish(message)),
            None => Ok(commands),
        }
    }

    fn submit(&self, buffer: wgpu::CommandBuffer) {
        self.queue.submit(std::iter::once(buffer));
    }

    fn present(&self, frame: Frame) {
        frame.present();
    }
}
