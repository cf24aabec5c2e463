//! Structured diagnostics reported to the log sink.
//!
//! Nothing here crosses the step-runner boundary as a `Result`; per-resource
//! failures are logged and execution continues, so callers that care can
//! match on the rendered messages.

use thiserror::Error;

use crate::hal::GlEnum;

#[derive(Debug, Error)]
pub enum Diagnostic {
    #[error("{stage} shader compile error:\n{info_log}")]
    ShaderCompileFailed { stage: &'static str, info_log: String },
    #[error("could not link program with {shader_count} shaders:\n{info_log}")]
    ProgramLinkFailed {
        shader_count: usize,
        info_log: String,
    },
    #[error("GL_FRAMEBUFFER_UNSUPPORTED")]
    FramebufferUnsupported,
    #[error("GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT")]
    FramebufferIncompleteAttachment,
    #[error("framebuffer error: {status:#06x}")]
    FramebufferError { status: GlEnum },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_compile_failures_with_info_log() {
        let diag = Diagnostic::ShaderCompileFailed {
            stage: "fragment",
            info_log: "0:1: error".to_string(),
        };
        assert_eq!(diag.to_string(), "fragment shader compile error:\n0:1: error");
    }

    #[test]
    fn renders_unknown_framebuffer_status_as_hex() {
        let diag = Diagnostic::FramebufferError { status: 0x8CDD };
        assert_eq!(diag.to_string(), "framebuffer error: 0x8cdd");
    }
}
