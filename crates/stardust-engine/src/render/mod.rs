//! Render protocols: shader cache, pipeline builder and the per-frame renderer.
//!
//! These talk to the GPU only through the traits in [`backend`], which
//! [`crate::device::RenderContext`] implements over wgpu.

pub mod backend;
mod pipeline;
mod renderer;
mod shader_cache;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{FrameBackend, FramePass, PipelineDevice, ShaderCompiler};
pub use pipeline::PipelineBuilder;
pub use renderer::{CLEAR_COLOR, Renderer, TRIANGLE_VERTICES};
pub use shader_cache::ShaderCache;
