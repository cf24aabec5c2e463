//! Command-queue execution core for a retained-mode OpenGL renderer.
//!
//! A producer records drawing work as two flat, immutable lists: an
//! [`InitStep`] list that constructs GPU resources (textures, buffers,
//! shaders, programs, input layouts, framebuffers) and a [`Step`] list that
//! executes render passes, copies, and readbacks. A [`QueueRunner`] consumes
//! those lists on the thread that owns the GL context, translating them into
//! a correctly ordered sequence of driver calls while filtering redundant
//! state changes through tracked handles.
//!
//! Driver access goes through the [`hal::GlBackend`] seam. Production code
//! uses [`backend::GlowBackend`] over a live `glow` context; the test-suite
//! observes exact call sequences with [`backend::RecordingBackend`].
//!
//! The core targets one API family in three dialects — desktop core ≥ 3.3,
//! EXT-only legacy desktop, and embedded ES2/ES3 — negotiated once through
//! the [`GlCapabilities`] probe. It does not schedule, batch, or reorder
//! steps, and it exposes no error results across the step-runner boundary:
//! per-resource failures go to the log sink, malformed work aborts.

pub mod backend;
mod caps;
mod diag;
pub mod hal;
mod resources;
mod runner;
mod stats;
mod step;

pub use caps::{FboDialect, GlCapabilities};
pub use diag::Diagnostic;
pub use resources::{
    Buffer, Framebuffer, InputLayout, InputLayoutEntry, Program, SemanticBinding, Shader, Texture,
    UniformInitializer, UniformQuery, VERTEX_ATTRIB_SLOTS,
};
pub use runner::{DataFormat, QueueRunner, DEFAULT_FBO};
pub use stats::RunStats;
pub use step::{InitStep, Offset2D, Rect2D, RenderCmd, Step, Viewport};
