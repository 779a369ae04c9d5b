use crate::device::RenderError;

use super::backend::{FrameBackend, FramePass};

/// Clear color of the frame pass: opaque red.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 1.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Vertices drawn per frame; the pipeline's vertex stage generates the triangle.
pub const TRIANGLE_VERTICES: u32 = 3;

/// Drives one render pass per frame with a single owned pipeline.
///
/// Single-buffered: no frame-in-flight limiting and no fencing beyond what the
/// present call itself does.
pub struct Renderer<P> {
    pipeline: P,
    pass: FramePass,
}

impl<P> Renderer<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            pass: FramePass::clear_to("stardust frame pass", CLEAR_COLOR, 0..TRIANGLE_VERTICES),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn pass(&self) -> &FramePass {
        &self.pass
    }

    /// Acquires, records, submits and presents one frame.
    ///
    /// Any failure aborts the frame; nothing is submitted or presented after it.
    pub fn render<B>(&self, backend: &mut B) -> Result<(), RenderError>
    where
        B: FrameBackend<Pipeline = P>,
    {
        let frame = backend.current_frame_view()?;
        let mut encoder = backend.create_encoder()?;

        backend.encode_pass(&mut encoder, &frame, &self.pass, &self.pipeline);

        let commands = backend.finish(encoder)?;
        backend.submit(commands);
        backend.present(frame);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PipelineBuilder;
    use crate::device::SurfaceResize;
    use crate::render::testing::{Call, MockGpu, VALID_SHADER};

    fn build_renderer(gpu: &MockGpu) -> Renderer<crate::render::testing::MockPipeline> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.wgsl");
        std::fs::write(&path, VALID_SHADER).unwrap();

        let pipeline = PipelineBuilder::new(gpu, gpu.surface_format())
            .vertex_shader(&path, "vs_main")
            .fragment_shader(&path, "fs_main")
            .build()
            .unwrap();
        Renderer::new(pipeline)
    }

    #[test]
    fn one_frame_submits_once_and_presents_once() {
        let mut gpu = MockGpu::new(1600, 900);
        let renderer = build_renderer(&gpu);

        renderer.render(&mut gpu).unwrap();

        assert_eq!(gpu.configured_size(), winit::dpi::PhysicalSize::new(1600, 900));
        assert_eq!(gpu.submit_count(), 1);
        assert_eq!(gpu.present_count(), 1);

        let passes = gpu.submitted_passes();
        assert_eq!(passes.len(), 1);
        let pass = &passes[0];
        assert_eq!(pass.color_attachments.len(), 1);
        assert_eq!(pass.color_attachments[0].load, wgpu::LoadOp::Clear(CLEAR_COLOR));
        assert_eq!(pass.color_attachments[0].store, wgpu::StoreOp::Store);
        assert_eq!(pass.pipeline, renderer.pipeline().id);
        assert_eq!(pass.vertices, 0..TRIANGLE_VERTICES);
    }

    #[test]
    fn frame_steps_run_in_protocol_order() {
        let mut gpu = MockGpu::new(1600, 900);
        let renderer = build_renderer(&gpu);

        renderer.render(&mut gpu).unwrap();

        assert_eq!(
            gpu.frame_calls(),
            vec![
                Call::AcquireFrame,
                Call::CreateEncoder,
                Call::EncodePass,
                Call::Finish,
                Call::Submit,
                Call::Present,
            ]
        );
    }

    #[test]
    fn clear_color_is_opaque_red() {
        let renderer = Renderer::new(());
        assert_eq!(
            renderer.pass().clear_color(),
            Some(wgpu::Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 })
        );
    }

    #[test]
    fn encoder_failure_skips_submit_and_present() {
        let mut gpu = MockGpu::new(1600, 900);
        let renderer = build_renderer(&gpu);
        gpu.fail_encoder();

        let err = renderer.render(&mut gpu).unwrap_err();
        assert!(matches!(err, RenderError::EncoderCreation(_)));
        assert_eq!(gpu.submit_count(), 0);
        assert_eq!(gpu.present_count(), 0);
    }

    #[test]
    fn finish_failure_skips_submit_and_present() {
        let mut gpu = MockGpu::new(1600, 900);
        let renderer = build_renderer(&gpu);
        gpu.fail_finish();

        let err = renderer.render(&mut gpu).unwrap_err();
        assert!(matches!(err, RenderError::CommandFinish(_)));
        assert_eq!(gpu.submit_count(), 0);
        assert_eq!(gpu.present_count(), 0);
    }

    #[test]
    fn acquire_failure_is_reported() {
        let mut gpu = MockGpu::new(1600, 900);
        let renderer = build_renderer(&gpu);
        gpu.fail_acquire(wgpu::SurfaceError::Outdated);

        let err = renderer.render(&mut gpu).unwrap_err();
        assert!(matches!(err, RenderError::SurfaceAcquire(wgpu::SurfaceError::Outdated)));
        assert_eq!(gpu.frame_calls(), vec![Call::AcquireFrame]);
    }

    #[test]
    fn each_frame_submits_a_fresh_buffer() {
        let mut gpu = MockGpu::new(1600, 900);
        let renderer = build_renderer(&gpu);

        for _ in 0..3 {
            renderer.render(&mut gpu).unwrap();
        }

        assert_eq!(gpu.submit_count(), 3);
        assert_eq!(gpu.present_count(), 3);
        assert_eq!(gpu.submitted_passes().len(), 3);
    }
}
