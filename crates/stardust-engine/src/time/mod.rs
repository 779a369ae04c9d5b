//! Frame timing.
//!
//! One `FrameClock` per window; call `tick()` once per rendered frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameRate, FrameTime};
