//! Driver-facing surface.
//!
//! The interpreters talk to the GL driver through [`GlBackend`], a trait that
//! mirrors the raw entry points the core uses, over plain `u32` object names
//! (`0` means "no object", exactly as in GL). Keeping the seam at entry-point
//! granularity makes the probe-driven dialect dispatch observable: the
//! ARB/core, EXT, NV and OES variants of an operation are distinct methods,
//! and the interpreter picks one per the capability record, never the
//! backend.
//!
//! Two implementations live in [`crate::backend`]: a live driver over `glow`
//! and a recording double used by the test-suite.

use crate::caps::GlCapabilities;

/// Raw GL object name. `0` is the null object.
pub type GlHandle = u32;
/// Raw GL enumerant.
pub type GlEnum = u32;

// Extension enumerants glow does not export.
pub const DEPTH24_STENCIL8_OES: GlEnum = 0x88F0;
pub const DEPTH_STENCIL_EXT: GlEnum = 0x84F9;
pub const TEXTURE_MAX_ANISOTROPY_EXT: GlEnum = 0x84FE;
pub const MAX_TEXTURE_MAX_ANISOTROPY_EXT: GlEnum = 0x84FF;

/// Raw GL entry points consumed by the execution core.
///
/// Methods take `&mut self` so implementations can track internal state (the
/// recording backend appends to its trace; the live backend is free to keep
/// debug bookkeeping). All calls are issued on the thread that owns the
/// underlying context; the trait makes no synchronization promises.
pub trait GlBackend {
    /// Immutable capability record detected at device creation.
    fn capabilities(&self) -> GlCapabilities;

    /// `glGetFloatv` for single-valued parameters.
    fn get_parameter_f32(&mut self, pname: GlEnum) -> f32;

    // Texture objects.
    fn gen_textures(&mut self, count: usize) -> Vec<GlHandle>;
    fn delete_textures(&mut self, names: &[GlHandle]);
    fn active_texture(&mut self, unit: GlEnum);
    fn bind_texture(&mut self, target: GlEnum, texture: GlHandle);
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &mut self,
        target: GlEnum,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        border: i32,
        format: GlEnum,
        ty: GlEnum,
        pixels: Option<&[u8]>,
    );
    fn tex_parameter_i32(&mut self, target: GlEnum, pname: GlEnum, value: i32);
    fn tex_parameter_f32(&mut self, target: GlEnum, pname: GlEnum, value: f32);
    fn generate_mipmap(&mut self, target: GlEnum);

    // Buffer objects.
    fn gen_buffer(&mut self) -> GlHandle;
    fn bind_buffer(&mut self, target: GlEnum, buffer: GlHandle);
    fn buffer_data_size(&mut self, target: GlEnum, size: usize, usage: GlEnum);
    fn buffer_sub_data(&mut self, target: GlEnum, offset: usize, data: &[u8]);

    // Shaders and programs.
    fn create_shader(&mut self, stage: GlEnum) -> GlHandle;
    fn shader_source(&mut self, shader: GlHandle, source: &str);
    fn compile_shader(&mut self, shader: GlHandle);
    fn get_shader_compile_status(&mut self, shader: GlHandle) -> bool;
    fn get_shader_info_log(&mut self, shader: GlHandle) -> String;
    fn delete_shader(&mut self, shader: GlHandle);
    fn create_program(&mut self) -> GlHandle;
    fn attach_shader(&mut self, program: GlHandle, shader: GlHandle);
    fn bind_attrib_location(&mut self, program: GlHandle, location: u32, name: &str);
    fn bind_frag_data_location(&mut self, program: GlHandle, color: u32, name: &str);
    fn bind_frag_data_location_indexed(
        &mut self,
        program: GlHandle,
        color: u32,
        index: u32,
        name: &str,
    );
    fn bind_frag_data_location_indexed_ext(
        &mut self,
        program: GlHandle,
        color: u32,
        index: u32,
        name: &str,
    );
    fn link_program(&mut self, program: GlHandle);
    fn get_program_link_status(&mut self, program: GlHandle) -> bool;
    fn get_program_info_log(&mut self, program: GlHandle) -> String;
    fn use_program(&mut self, program: GlHandle);
    fn get_uniform_location(&mut self, program: GlHandle, name: &str) -> i32;

    // Uniform uploads. `location` is a resolved, non-negative slot.
    fn uniform_1_f32(&mut self, location: i32, x: f32);
    fn uniform_2_f32(&mut self, location: i32, x: f32, y: f32);
    fn uniform_3_f32(&mut self, location: i32, x: f32, y: f32, z: f32);
    fn uniform_4_f32(&mut self, location: i32, x: f32, y: f32, z: f32, w: f32);
    fn uniform_1_i32(&mut self, location: i32, x: i32);
    fn uniform_2_i32(&mut self, location: i32, x: i32, y: i32);
    fn uniform_3_i32(&mut self, location: i32, x: i32, y: i32, z: i32);
    fn uniform_4_i32(&mut self, location: i32, x: i32, y: i32, z: i32, w: i32);
    fn uniform_matrix_4_f32(&mut self, location: i32, transpose: bool, matrix: &[f32; 16]);

    // Fixed-function state.
    fn enable(&mut self, cap: GlEnum);
    fn disable(&mut self, cap: GlEnum);
    fn depth_mask(&mut self, write: bool);
    fn depth_func(&mut self, func: GlEnum);
    fn depth_range(&mut self, near: f32, far: f32);
    fn blend_equation_separate(&mut self, mode_rgb: GlEnum, mode_alpha: GlEnum);
    fn blend_func_separate(
        &mut self,
        src_rgb: GlEnum,
        dst_rgb: GlEnum,
        src_alpha: GlEnum,
        dst_alpha: GlEnum,
    );
    fn blend_color(&mut self, r: f32, g: f32, b: f32, a: f32);
    fn color_mask(&mut self, r: bool, g: bool, b: bool, a: bool);
    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32);
    /// Desktop double-precision depth clear value.
    fn clear_depth_f64(&mut self, depth: f64);
    /// ES float depth clear value.
    fn clear_depth_f32(&mut self, depth: f32);
    fn clear_stencil(&mut self, stencil: i32);
    fn clear(&mut self, mask: u32);
    fn stencil_func(&mut self, func: GlEnum, reference: i32, mask: u32);
    fn stencil_op(&mut self, stencil_fail: GlEnum, depth_fail: GlEnum, pass: GlEnum);
    fn stencil_mask(&mut self, mask: u32);
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn front_face(&mut self, winding: GlEnum);
    fn cull_face(&mut self, face: GlEnum);

    // Vertex state.
    fn gen_vertex_array(&mut self) -> GlHandle;
    fn delete_vertex_array(&mut self, vao: GlHandle);
    fn bind_vertex_array(&mut self, vao: GlHandle);
    fn enable_vertex_attrib_array(&mut self, index: u32);
    fn disable_vertex_attrib_array(&mut self, index: u32);
    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        ty: GlEnum,
        normalized: bool,
        stride: i32,
        offset: usize,
    );

    // Draws.
    fn draw_arrays(&mut self, mode: GlEnum, first: i32, count: i32);
    fn draw_elements(&mut self, mode: GlEnum, count: i32, index_type: GlEnum, offset: usize);

    // Framebuffer objects, ARB/core dialect.
    fn gen_framebuffer(&mut self) -> GlHandle;
    fn delete_framebuffer(&mut self, framebuffer: GlHandle);
    fn bind_framebuffer(&mut self, target: GlEnum, framebuffer: GlHandle);
    fn framebuffer_texture_2d(
        &mut self,
        target: GlEnum,
        attachment: GlEnum,
        tex_target: GlEnum,
        texture: GlHandle,
        level: i32,
    );
    fn framebuffer_renderbuffer(
        &mut self,
        target: GlEnum,
        attachment: GlEnum,
        rb_target: GlEnum,
        renderbuffer: GlHandle,
    );
    fn check_framebuffer_status(&mut self, target: GlEnum) -> GlEnum;
    fn gen_renderbuffer(&mut self) -> GlHandle;
    fn delete_renderbuffer(&mut self, renderbuffer: GlHandle);
    fn bind_renderbuffer(&mut self, target: GlEnum, renderbuffer: GlHandle);
    fn renderbuffer_storage(
        &mut self,
        target: GlEnum,
        internal_format: GlEnum,
        width: i32,
        height: i32,
    );

    // Framebuffer objects, EXT dialect (legacy desktop).
    fn gen_framebuffer_ext(&mut self) -> GlHandle;
    fn delete_framebuffer_ext(&mut self, framebuffer: GlHandle);
    fn bind_framebuffer_ext(&mut self, target: GlEnum, framebuffer: GlHandle);
    fn framebuffer_texture_2d_ext(
        &mut self,
        target: GlEnum,
        attachment: GlEnum,
        tex_target: GlEnum,
        texture: GlHandle,
        level: i32,
    );
    fn framebuffer_renderbuffer_ext(
        &mut self,
        target: GlEnum,
        attachment: GlEnum,
        rb_target: GlEnum,
        renderbuffer: GlHandle,
    );
    fn check_framebuffer_status_ext(&mut self, target: GlEnum) -> GlEnum;
    fn gen_renderbuffer_ext(&mut self) -> GlHandle;
    fn bind_renderbuffer_ext(&mut self, target: GlEnum, renderbuffer: GlHandle);
    fn renderbuffer_storage_ext(
        &mut self,
        target: GlEnum,
        internal_format: GlEnum,
        width: i32,
        height: i32,
    );

    // Cross-framebuffer transfers.
    #[allow(clippy::too_many_arguments)]
    fn blit_framebuffer(
        &mut self,
        src_x0: i32,
        src_y0: i32,
        src_x1: i32,
        src_y1: i32,
        dst_x0: i32,
        dst_y0: i32,
        dst_x1: i32,
        dst_y1: i32,
        mask: u32,
        filter: GlEnum,
    );
    #[allow(clippy::too_many_arguments)]
    fn blit_framebuffer_nv(
        &mut self,
        src_x0: i32,
        src_y0: i32,
        src_x1: i32,
        src_y1: i32,
        dst_x0: i32,
        dst_y0: i32,
        dst_x1: i32,
        dst_y1: i32,
        mask: u32,
        filter: GlEnum,
    );
    #[allow(clippy::too_many_arguments)]
    fn copy_image_sub_data(
        &mut self,
        src: GlHandle,
        src_target: GlEnum,
        src_level: i32,
        src_x: i32,
        src_y: i32,
        src_z: i32,
        dst: GlHandle,
        dst_target: GlEnum,
        dst_level: i32,
        dst_x: i32,
        dst_y: i32,
        dst_z: i32,
        width: i32,
        height: i32,
        depth: i32,
    );
    #[allow(clippy::too_many_arguments)]
    fn copy_image_sub_data_nv(
        &mut self,
        src: GlHandle,
        src_target: GlEnum,
        src_level: i32,
        src_x: i32,
        src_y: i32,
        src_z: i32,
        dst: GlHandle,
        dst_target: GlEnum,
        dst_level: i32,
        dst_x: i32,
        dst_y: i32,
        dst_z: i32,
        width: i32,
        height: i32,
        depth: i32,
    );
    #[allow(clippy::too_many_arguments)]
    fn copy_image_sub_data_oes(
        &mut self,
        src: GlHandle,
        src_target: GlEnum,
        src_level: i32,
        src_x: i32,
        src_y: i32,
        src_z: i32,
        dst: GlHandle,
        dst_target: GlEnum,
        dst_level: i32,
        dst_x: i32,
        dst_y: i32,
        dst_z: i32,
        width: i32,
        height: i32,
        depth: i32,
    );
}
