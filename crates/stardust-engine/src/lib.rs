//! Stardust engine crate.
//!
//! Window runtime, GPU bring-up and the per-frame render protocol used by the
//! Stardust client.

pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
