//! Shared builders and capability presets for the integration tests.

#![allow(dead_code)]

use retained_gl::backend::RecordingBackend;
use retained_gl::{GlCapabilities, QueueRunner};

pub const TARGET_WIDTH: i32 = 1280;
pub const TARGET_HEIGHT: i32 = 720;

/// Desktop core 3.3 with the usual modern extensions.
pub fn desktop_core_caps() -> GlCapabilities {
    GlCapabilities {
        is_gles: false,
        gles3: false,
        version: (3, 3, 0),
        arb_framebuffer_object: true,
        ext_framebuffer_object: false,
        arb_copy_image: true,
        nv_copy_image: false,
        nv_framebuffer_blit: false,
        oes_packed_depth_stencil: false,
        oes_depth24: false,
        supports_dual_source_blend: true,
    }
}

/// Legacy desktop where only the EXT framebuffer entry points exist.
pub fn legacy_ext_caps() -> GlCapabilities {
    GlCapabilities {
        is_gles: false,
        gles3: false,
        version: (2, 1, 0),
        arb_framebuffer_object: false,
        ext_framebuffer_object: true,
        arb_copy_image: false,
        nv_copy_image: true,
        nv_framebuffer_blit: false,
        oes_packed_depth_stencil: false,
        oes_depth24: false,
        supports_dual_source_blend: false,
    }
}

/// ES2 with packed depth/stencil available.
pub fn gles2_packed_caps() -> GlCapabilities {
    GlCapabilities {
        is_gles: true,
        gles3: false,
        version: (2, 0, 0),
        arb_framebuffer_object: false,
        ext_framebuffer_object: false,
        arb_copy_image: false,
        nv_copy_image: false,
        nv_framebuffer_blit: false,
        oes_packed_depth_stencil: true,
        oes_depth24: true,
        supports_dual_source_blend: false,
    }
}

/// ES2 without packed depth/stencil (separate renderbuffers).
pub fn gles2_separate_caps(oes_depth24: bool) -> GlCapabilities {
    GlCapabilities {
        oes_packed_depth_stencil: false,
        oes_depth24,
        ..gles2_packed_caps()
    }
}

/// ES3, which implies packed depth/stencil and framebuffer blit.
pub fn gles3_caps() -> GlCapabilities {
    GlCapabilities {
        gles3: true,
        version: (3, 0, 0),
        supports_dual_source_blend: true,
        ..gles2_packed_caps()
    }
}

pub fn runner(caps: GlCapabilities) -> QueueRunner<RecordingBackend> {
    QueueRunner::new(RecordingBackend::new(caps), TARGET_WIDTH, TARGET_HEIGHT)
}
