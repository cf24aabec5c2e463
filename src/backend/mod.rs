//! Driver implementations of [`crate::hal::GlBackend`].

mod glow_backend;
mod recording;

pub use glow_backend::GlowBackend;
pub use recording::{GlCall, RecordingBackend};
