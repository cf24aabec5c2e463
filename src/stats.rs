//! Execution counters, suitable for profiling overlays and tests.

/// Snapshot of counters accumulated while running step lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub init_steps: u64,
    pub steps: u64,
    pub render_passes: u64,
    pub draw_calls: u64,
    pub clears: u64,
    /// Array/element-array binds suppressed by the tracked handles.
    pub buffer_binds_elided: u64,
    /// Framebuffer binds suppressed by the draw/read handle cache.
    pub framebuffer_binds_elided: u64,
    /// Uniform uploads skipped because the resolved location was negative.
    pub uniforms_skipped: u64,
}
