/// The presentable texture for the current frame plus a view of it.
///
/// Short-lived: holding it prevents acquisition of the next frame. Presenting
/// consumes it.
pub struct Frame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

impl Frame {
    pub fn present(self) {
        drop(self.view);
        self.surface_texture.present();
    }
}
