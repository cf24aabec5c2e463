//! Driver capability probe.
//!
//! Detected once at device creation and treated as immutable afterwards;
//! every dialect branch in the interpreters consults this record instead of
//! re-querying the driver.

/// Entry-point dialect used for framebuffer objects, fixed per process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FboDialect {
    /// `glBindFramebuffer` and friends (ARB/core on desktop, always on ES).
    ArbCore,
    /// `glBindFramebufferEXT` and friends (legacy desktop without the ARB
    /// framebuffer object support).
    Ext,
}

/// Immutable record of detected extensions and version flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlCapabilities {
    pub is_gles: bool,
    pub gles3: bool,
    /// (major, minor, patch) of the context version.
    pub version: (u32, u32, u32),
    pub arb_framebuffer_object: bool,
    pub ext_framebuffer_object: bool,
    pub arb_copy_image: bool,
    pub nv_copy_image: bool,
    pub nv_framebuffer_blit: bool,
    pub oes_packed_depth_stencil: bool,
    pub oes_depth24: bool,
    pub supports_dual_source_blend: bool,
}

impl GlCapabilities {
    pub fn version_at_least(&self, major: u32, minor: u32, patch: u32) -> bool {
        self.version >= (major, minor, patch)
    }

    /// Whether draw and read framebuffer targets can be bound independently.
    pub fn supports_framebuffer_blit(&self) -> bool {
        if self.is_gles {
            self.gles3 || self.nv_framebuffer_blit
        } else {
            self.arb_framebuffer_object
        }
    }

    pub fn fbo_dialect(&self) -> FboDialect {
        if self.arb_framebuffer_object || self.is_gles {
            FboDialect::ArbCore
        } else {
            FboDialect::Ext
        }
    }
}
