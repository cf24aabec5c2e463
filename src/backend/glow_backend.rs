//! Live driver over the `glow` crate.
//!
//! glow covers the core entry points; the dialect-suffixed ones it does not
//! expose (the EXT framebuffer object family, indexed frag-data binding, the
//! copy-image variants, NV blit) are loaded from the host's proc-address
//! loader into an optional function table at construction, the same way GL
//! loaders resolve extensions.

use std::ffi::{c_char, c_void, CString};
use std::num::NonZeroU32;

use glow::HasContext;
use tracing::error;

use crate::caps::GlCapabilities;
use crate::hal::{GlBackend, GlEnum, GlHandle};

type PfnBindFragDataLocation = unsafe extern "system" fn(u32, u32, *const c_char);
type PfnBindFragDataLocationIndexed = unsafe extern "system" fn(u32, u32, u32, *const c_char);
type PfnCopyImageSubData = unsafe extern "system" fn(
    u32,
    u32,
    i32,
    i32,
    i32,
    i32,
    u32,
    u32,
    i32,
    i32,
    i32,
    i32,
    i32,
    i32,
    i32,
);
type PfnBlitFramebuffer =
    unsafe extern "system" fn(i32, i32, i32, i32, i32, i32, i32, i32, u32, u32);
type PfnGenObjects = unsafe extern "system" fn(i32, *mut u32);
type PfnDeleteObjects = unsafe extern "system" fn(i32, *const u32);
type PfnBindObject = unsafe extern "system" fn(u32, u32);
type PfnFramebufferTexture2D = unsafe extern "system" fn(u32, u32, u32, u32, i32);
type PfnFramebufferRenderbuffer = unsafe extern "system" fn(u32, u32, u32, u32);
type PfnCheckFramebufferStatus = unsafe extern "system" fn(u32) -> u32;
type PfnRenderbufferStorage = unsafe extern "system" fn(u32, u32, i32, i32);

/// Extension entry points resolved at construction; `None` when the driver
/// does not export the symbol.
struct ExtFunctions {
    bind_frag_data_location: Option<PfnBindFragDataLocation>,
    bind_frag_data_location_indexed: Option<PfnBindFragDataLocationIndexed>,
    bind_frag_data_location_indexed_ext: Option<PfnBindFragDataLocationIndexed>,
    copy_image_sub_data: Option<PfnCopyImageSubData>,
    copy_image_sub_data_nv: Option<PfnCopyImageSubData>,
    copy_image_sub_data_oes: Option<PfnCopyImageSubData>,
    blit_framebuffer_nv: Option<PfnBlitFramebuffer>,
    gen_framebuffers_ext: Option<PfnGenObjects>,
    delete_framebuffers_ext: Option<PfnDeleteObjects>,
    bind_framebuffer_ext: Option<PfnBindObject>,
    framebuffer_texture_2d_ext: Option<PfnFramebufferTexture2D>,
    framebuffer_renderbuffer_ext: Option<PfnFramebufferRenderbuffer>,
    check_framebuffer_status_ext: Option<PfnCheckFramebufferStatus>,
    gen_renderbuffers_ext: Option<PfnGenObjects>,
    bind_renderbuffer_ext: Option<PfnBindObject>,
    renderbuffer_storage_ext: Option<PfnRenderbufferStorage>,
}

impl ExtFunctions {
    unsafe fn load(get_proc_address: &mut dyn FnMut(&str) -> *const c_void) -> Self {
        unsafe fn sym<T: Copy>(
            get_proc_address: &mut dyn FnMut(&str) -> *const c_void,
            name: &str,
        ) -> Option<T> {
            let ptr = get_proc_address(name);
            if ptr.is_null() {
                None
            } else {
                Some(std::mem::transmute_copy::<*const c_void, T>(&ptr))
            }
        }

        Self {
            bind_frag_data_location: sym(get_proc_address, "glBindFragDataLocation"),
            bind_frag_data_location_indexed: sym(get_proc_address, "glBindFragDataLocationIndexed"),
            bind_frag_data_location_indexed_ext: sym(
                get_proc_address,
                "glBindFragDataLocationIndexedEXT",
            ),
            copy_image_sub_data: sym(get_proc_address, "glCopyImageSubData"),
            copy_image_sub_data_nv: sym(get_proc_address, "glCopyImageSubDataNV"),
            copy_image_sub_data_oes: sym(get_proc_address, "glCopyImageSubDataOES"),
            blit_framebuffer_nv: sym(get_proc_address, "glBlitFramebufferNV"),
            gen_framebuffers_ext: sym(get_proc_address, "glGenFramebuffersEXT"),
            delete_framebuffers_ext: sym(get_proc_address, "glDeleteFramebuffersEXT"),
            bind_framebuffer_ext: sym(get_proc_address, "glBindFramebufferEXT"),
            framebuffer_texture_2d_ext: sym(get_proc_address, "glFramebufferTexture2DEXT"),
            framebuffer_renderbuffer_ext: sym(get_proc_address, "glFramebufferRenderbufferEXT"),
            check_framebuffer_status_ext: sym(get_proc_address, "glCheckFramebufferStatusEXT"),
            gen_renderbuffers_ext: sym(get_proc_address, "glGenRenderbuffersEXT"),
            bind_renderbuffer_ext: sym(get_proc_address, "glBindRenderbufferEXT"),
            renderbuffer_storage_ext: sym(get_proc_address, "glRenderbufferStorageEXT"),
        }
    }
}

fn detect_capabilities(gl: &glow::Context) -> GlCapabilities {
    let version = gl.version();
    let extensions = gl.supported_extensions();
    let has = |name: &str| extensions.contains(name);

    let is_gles = version.is_embedded;
    let gles3 = is_gles && version.major >= 3;
    let at_least =
        |major, minor| version.major > major || (version.major == major && version.minor >= minor);

    GlCapabilities {
        is_gles,
        gles3,
        version: (version.major, version.minor, 0),
        arb_framebuffer_object: !is_gles && (at_least(3, 0) || has("GL_ARB_framebuffer_object")),
        ext_framebuffer_object: !is_gles && has("GL_EXT_framebuffer_object"),
        arb_copy_image: !is_gles && (at_least(4, 3) || has("GL_ARB_copy_image")),
        nv_copy_image: has("GL_NV_copy_image"),
        nv_framebuffer_blit: has("GL_NV_framebuffer_blit"),
        oes_packed_depth_stencil: is_gles && (gles3 || has("GL_OES_packed_depth_stencil")),
        oes_depth24: is_gles && (gles3 || has("GL_OES_depth24")),
        supports_dual_source_blend: if is_gles {
            has("GL_EXT_blend_func_extended")
        } else {
            at_least(3, 3) || has("GL_ARB_blend_func_extended")
        },
    }
}

fn tex(name: GlHandle) -> Option<glow::Texture> {
    NonZeroU32::new(name).map(glow::NativeTexture)
}

fn buf(name: GlHandle) -> Option<glow::Buffer> {
    NonZeroU32::new(name).map(glow::NativeBuffer)
}

fn shader_obj(name: GlHandle) -> Option<glow::Shader> {
    NonZeroU32::new(name).map(glow::NativeShader)
}

fn program_obj(name: GlHandle) -> Option<glow::Program> {
    NonZeroU32::new(name).map(glow::NativeProgram)
}

fn vao_obj(name: GlHandle) -> Option<glow::VertexArray> {
    NonZeroU32::new(name).map(glow::NativeVertexArray)
}

fn fb_obj(name: GlHandle) -> Option<glow::Framebuffer> {
    NonZeroU32::new(name).map(glow::NativeFramebuffer)
}

fn rb_obj(name: GlHandle) -> Option<glow::Renderbuffer> {
    NonZeroU32::new(name).map(glow::NativeRenderbuffer)
}

fn uniform_loc(location: i32) -> Option<glow::UniformLocation> {
    u32::try_from(location).ok().map(glow::NativeUniformLocation)
}

/// [`GlBackend`] implementation over a live `glow` context.
pub struct GlowBackend {
    gl: glow::Context,
    caps: GlCapabilities,
    ext: ExtFunctions,
}

impl GlowBackend {
    /// # Safety
    ///
    /// The context must be current on the calling thread and stay current
    /// for the lifetime of the backend, and `get_proc_address` must resolve
    /// symbols for that same context.
    pub unsafe fn new(
        gl: glow::Context,
        mut get_proc_address: impl FnMut(&str) -> *const c_void,
    ) -> Self {
        let caps = detect_capabilities(&gl);
        let ext = ExtFunctions::load(&mut get_proc_address);
        Self { gl, caps, ext }
    }

    pub fn context(&self) -> &glow::Context {
        &self.gl
    }
}

/// Invokes an optional extension entry point, logging when the driver never
/// exported the symbol.
macro_rules! ext_call {
    ($self:ident, $slot:ident, $name:literal, ($($arg:expr),* $(,)?)) => {
        match $self.ext.$slot {
            Some(f) => unsafe { f($($arg),*) },
            None => error!(concat!($name, " is not available on this driver")),
        }
    };
}

macro_rules! ext_call_ret {
    ($self:ident, $slot:ident, $name:literal, ($($arg:expr),* $(,)?), $fallback:expr) => {
        match $self.ext.$slot {
            Some(f) => unsafe { f($($arg),*) },
            None => {
                error!(concat!($name, " is not available on this driver"));
                $fallback
            }
        }
    };
}

fn ext_gen_one(f: Option<PfnGenObjects>, name: &str) -> GlHandle {
    match f {
        Some(f) => {
            let mut out: u32 = 0;
            unsafe { f(1, &mut out) };
            out
        }
        None => {
            error!("{name} is not available on this driver");
            0
        }
    }
}

fn with_c_name(name: &str, call: impl FnOnce(*const c_char)) {
    match CString::new(name) {
        Ok(cname) => call(cname.as_ptr()),
        Err(_) => error!("GL identifier contains an interior NUL: {name:?}"),
    }
}

impl GlBackend for GlowBackend {
    fn capabilities(&self) -> GlCapabilities {
        self.caps
    }

    fn get_parameter_f32(&mut self, pname: GlEnum) -> f32 {
        unsafe { self.gl.get_parameter_f32(pname) }
    }

    fn gen_textures(&mut self, count: usize) -> Vec<GlHandle> {
        (0..count)
            .map(|_| match unsafe { self.gl.create_texture() } {
                Ok(t) => t.0.get(),
                Err(err) => {
                    error!("glGenTextures failed: {err}");
                    0
                }
            })
            .collect()
    }

    fn delete_textures(&mut self, names: &[GlHandle]) {
        for &name in names {
            if let Some(t) = tex(name) {
                unsafe { self.gl.delete_texture(t) };
            }
        }
    }

    fn active_texture(&mut self, unit: GlEnum) {
        unsafe { self.gl.active_texture(unit) };
    }

    fn bind_texture(&mut self, target: GlEnum, texture: GlHandle) {
        unsafe { self.gl.bind_texture(target, tex(texture)) };
    }

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
    ) {
        unsafe {
            self.gl.tex_image_2d(
                target,
                level,
                internal_format,
                width,
                height,
                border,
                format,
                ty,
                pixels,
            )
        };
    }

    fn tex_parameter_i32(&mut self, target: GlEnum, pname: GlEnum, value: i32) {
        unsafe { self.gl.tex_parameter_i32(target, pname, value) };
    }

    fn tex_parameter_f32(&mut self, target: GlEnum, pname: GlEnum, value: f32) {
        unsafe { self.gl.tex_parameter_f32(target, pname, value) };
    }

    fn generate_mipmap(&mut self, target: GlEnum) {
        unsafe { self.gl.generate_mipmap(target) };
    }

    fn gen_buffer(&mut self) -> GlHandle {
        match unsafe { self.gl.create_buffer() } {
            Ok(b) => b.0.get(),
            Err(err) => {
                error!("glGenBuffers failed: {err}");
                0
            }
        }
    }

    fn bind_buffer(&mut self, target: GlEnum, buffer: GlHandle) {
        unsafe { self.gl.bind_buffer(target, buf(buffer)) };
    }

    fn buffer_data_size(&mut self, target: GlEnum, size: usize, usage: GlEnum) {
        unsafe { self.gl.buffer_data_size(target, size as i32, usage) };
    }

    fn buffer_sub_data(&mut self, target: GlEnum, offset: usize, data: &[u8]) {
        unsafe { self.gl.buffer_sub_data_u8_slice(target, offset as i32, data) };
    }

    fn create_shader(&mut self, stage: GlEnum) -> GlHandle {
        match unsafe { self.gl.create_shader(stage) } {
            Ok(s) => s.0.get(),
            Err(err) => {
                error!("glCreateShader failed: {err}");
                0
            }
        }
    }

    fn shader_source(&mut self, shader: GlHandle, source: &str) {
        if let Some(s) = shader_obj(shader) {
            unsafe { self.gl.shader_source(s, source) };
        }
    }

    fn compile_shader(&mut self, shader: GlHandle) {
        if let Some(s) = shader_obj(shader) {
            unsafe { self.gl.compile_shader(s) };
        }
    }

    fn get_shader_compile_status(&mut self, shader: GlHandle) -> bool {
        shader_obj(shader)
            .map(|s| unsafe { self.gl.get_shader_compile_status(s) })
            .unwrap_or(false)
    }

    fn get_shader_info_log(&mut self, shader: GlHandle) -> String {
        shader_obj(shader)
            .map(|s| unsafe { self.gl.get_shader_info_log(s) })
            .unwrap_or_default()
    }

    fn delete_shader(&mut self, shader: GlHandle) {
        if let Some(s) = shader_obj(shader) {
            unsafe { self.gl.delete_shader(s) };
        }
    }

    fn create_program(&mut self) -> GlHandle {
        match unsafe { self.gl.create_program() } {
            Ok(p) => p.0.get(),
            Err(err) => {
                error!("glCreateProgram failed: {err}");
                0
            }
        }
    }

    fn attach_shader(&mut self, program: GlHandle, shader: GlHandle) {
        if let (Some(p), Some(s)) = (program_obj(program), shader_obj(shader)) {
            unsafe { self.gl.attach_shader(p, s) };
        }
    }

    fn bind_attrib_location(&mut self, program: GlHandle, location: u32, name: &str) {
        if let Some(p) = program_obj(program) {
            unsafe { self.gl.bind_attrib_location(p, location, name) };
        }
    }

    fn bind_frag_data_location(&mut self, program: GlHandle, color: u32, name: &str) {
        with_c_name(name, |cname| {
            ext_call!(
                self,
                bind_frag_data_location,
                "glBindFragDataLocation",
                (program, color, cname)
            );
        });
    }

    fn bind_frag_data_location_indexed(
        &mut self,
        program: GlHandle,
        color: u32,
        index: u32,
        name: &str,
    ) {
        with_c_name(name, |cname| {
            ext_call!(
                self,
                bind_frag_data_location_indexed,
                "glBindFragDataLocationIndexed",
                (program, color, index, cname)
            );
        });
    }

    fn bind_frag_data_location_indexed_ext(
        &mut self,
        program: GlHandle,
        color: u32,
        index: u32,
        name: &str,
    ) {
        with_c_name(name, |cname| {
            ext_call!(
                self,
                bind_frag_data_location_indexed_ext,
                "glBindFragDataLocationIndexedEXT",
                (program, color, index, cname)
            );
        });
    }

    fn link_program(&mut self, program: GlHandle) {
        if let Some(p) = program_obj(program) {
            unsafe { self.gl.link_program(p) };
        }
    }

    fn get_program_link_status(&mut self, program: GlHandle) -> bool {
        program_obj(program)
            .map(|p| unsafe { self.gl.get_program_link_status(p) })
            .unwrap_or(false)
    }

    fn get_program_info_log(&mut self, program: GlHandle) -> String {
        program_obj(program)
            .map(|p| unsafe { self.gl.get_program_info_log(p) })
            .unwrap_or_default()
    }

    fn use_program(&mut self, program: GlHandle) {
        unsafe { self.gl.use_program(program_obj(program)) };
    }

    fn get_uniform_location(&mut self, program: GlHandle, name: &str) -> i32 {
        let Some(p) = program_obj(program) else {
            return -1;
        };
        match unsafe { self.gl.get_uniform_location(p, name) } {
            Some(location) => location.0 as i32,
            None => -1,
        }
    }

    fn uniform_1_f32(&mut self, location: i32, x: f32) {
        unsafe { self.gl.uniform_1_f32(uniform_loc(location).as_ref(), x) };
    }

    fn uniform_2_f32(&mut self, location: i32, x: f32, y: f32) {
        unsafe { self.gl.uniform_2_f32(uniform_loc(location).as_ref(), x, y) };
    }

    fn uniform_3_f32(&mut self, location: i32, x: f32, y: f32, z: f32) {
        unsafe { self.gl.uniform_3_f32(uniform_loc(location).as_ref(), x, y, z) };
    }

    fn uniform_4_f32(&mut self, location: i32, x: f32, y: f32, z: f32, w: f32) {
        unsafe {
            self.gl
                .uniform_4_f32(uniform_loc(location).as_ref(), x, y, z, w)
        };
    }

    fn uniform_1_i32(&mut self, location: i32, x: i32) {
        unsafe { self.gl.uniform_1_i32(uniform_loc(location).as_ref(), x) };
    }

    fn uniform_2_i32(&mut self, location: i32, x: i32, y: i32) {
        unsafe { self.gl.uniform_2_i32(uniform_loc(location).as_ref(), x, y) };
    }

    fn uniform_3_i32(&mut self, location: i32, x: i32, y: i32, z: i32) {
        unsafe { self.gl.uniform_3_i32(uniform_loc(location).as_ref(), x, y, z) };
    }

    fn uniform_4_i32(&mut self, location: i32, x: i32, y: i32, z: i32, w: i32) {
        unsafe {
            self.gl
                .uniform_4_i32(uniform_loc(location).as_ref(), x, y, z, w)
        };
    }

    fn uniform_matrix_4_f32(&mut self, location: i32, transpose: bool, matrix: &[f32; 16]) {
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(uniform_loc(location).as_ref(), transpose, matrix)
        };
    }

    fn enable(&mut self, cap: GlEnum) {
        unsafe { self.gl.enable(cap) };
    }

    fn disable(&mut self, cap: GlEnum) {
        unsafe { self.gl.disable(cap) };
    }

    fn depth_mask(&mut self, write: bool) {
        unsafe { self.gl.depth_mask(write) };
    }

    fn depth_func(&mut self, func: GlEnum) {
        unsafe { self.gl.depth_func(func) };
    }

    fn depth_range(&mut self, near: f32, far: f32) {
        unsafe { self.gl.depth_range_f32(near, far) };
    }

    fn blend_equation_separate(&mut self, mode_rgb: GlEnum, mode_alpha: GlEnum) {
        unsafe { self.gl.blend_equation_separate(mode_rgb, mode_alpha) };
    }

    fn blend_func_separate(
        &mut self,
        src_rgb: GlEnum,
        dst_rgb: GlEnum,
        src_alpha: GlEnum,
        dst_alpha: GlEnum,
    ) {
        unsafe {
            self.gl
                .blend_func_separate(src_rgb, dst_rgb, src_alpha, dst_alpha)
        };
    }

    fn blend_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.blend_color(r, g, b, a) };
    }

    fn color_mask(&mut self, r: bool, g: bool, b: bool, a: bool) {
        unsafe { self.gl.color_mask(r, g, b, a) };
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) };
    }

    fn clear_depth_f64(&mut self, depth: f64) {
        unsafe { self.gl.clear_depth_f64(depth) };
    }

    fn clear_depth_f32(&mut self, depth: f32) {
        unsafe { self.gl.clear_depth_f32(depth) };
    }

    fn clear_stencil(&mut self, stencil: i32) {
        unsafe { self.gl.clear_stencil(stencil) };
    }

    fn clear(&mut self, mask: u32) {
        unsafe { self.gl.clear(mask) };
    }

    fn stencil_func(&mut self, func: GlEnum, reference: i32, mask: u32) {
        unsafe { self.gl.stencil_func(func, reference, mask) };
    }

    fn stencil_op(&mut self, stencil_fail: GlEnum, depth_fail: GlEnum, pass: GlEnum) {
        unsafe { self.gl.stencil_op(stencil_fail, depth_fail, pass) };
    }

    fn stencil_mask(&mut self, mask: u32) {
        unsafe { self.gl.stencil_mask(mask) };
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) };
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.scissor(x, y, width, height) };
    }

    fn front_face(&mut self, winding: GlEnum) {
        unsafe { self.gl.front_face(winding) };
    }

    fn cull_face(&mut self, face: GlEnum) {
        unsafe { self.gl.cull_face(face) };
    }

    fn gen_vertex_array(&mut self) -> GlHandle {
        match unsafe { self.gl.create_vertex_array() } {
            Ok(v) => v.0.get(),
            Err(err) => {
                error!("glGenVertexArrays failed: {err}");
                0
            }
        }
    }

    fn delete_vertex_array(&mut self, vao: GlHandle) {
        if let Some(v) = vao_obj(vao) {
            unsafe { self.gl.delete_vertex_array(v) };
        }
    }

    fn bind_vertex_array(&mut self, vao: GlHandle) {
        unsafe { self.gl.bind_vertex_array(vao_obj(vao)) };
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) };
    }

    fn disable_vertex_attrib_array(&mut self, index: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(index) };
    }

    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        ty: GlEnum,
        normalized: bool,
        stride: i32,
        offset: usize,
    ) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, size, ty, normalized, stride, offset as i32)
        };
    }

    fn draw_arrays(&mut self, mode: GlEnum, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(mode, first, count) };
    }

    fn draw_elements(&mut self, mode: GlEnum, count: i32, index_type: GlEnum, offset: usize) {
        unsafe { self.gl.draw_elements(mode, count, index_type, offset as i32) };
    }

    fn gen_framebuffer(&mut self) -> GlHandle {
        match unsafe { self.gl.create_framebuffer() } {
            Ok(f) => f.0.get(),
            Err(err) => {
                error!("glGenFramebuffers failed: {err}");
                0
            }
        }
    }

    fn delete_framebuffer(&mut self, framebuffer: GlHandle) {
        if let Some(f) = fb_obj(framebuffer) {
            unsafe { self.gl.delete_framebuffer(f) };
        }
    }

    fn bind_framebuffer(&mut self, target: GlEnum, framebuffer: GlHandle) {
        unsafe { self.gl.bind_framebuffer(target, fb_obj(framebuffer)) };
    }

    fn framebuffer_texture_2d(
        &mut self,
        target: GlEnum,
        attachment: GlEnum,
        tex_target: GlEnum,
        texture: GlHandle,
        level: i32,
    ) {
        unsafe {
            self.gl
                .framebuffer_texture_2d(target, attachment, tex_target, tex(texture), level)
        };
    }

    fn framebuffer_renderbuffer(
        &mut self,
        target: GlEnum,
        attachment: GlEnum,
        rb_target: GlEnum,
        renderbuffer: GlHandle,
    ) {
        unsafe {
            self.gl
                .framebuffer_renderbuffer(target, attachment, rb_target, rb_obj(renderbuffer))
        };
    }

    fn check_framebuffer_status(&mut self, target: GlEnum) -> GlEnum {
        unsafe { self.gl.check_framebuffer_status(target) }
    }

    fn gen_renderbuffer(&mut self) -> GlHandle {
        match unsafe { self.gl.create_renderbuffer() } {
            Ok(r) => r.0.get(),
            Err(err) => {
                error!("glGenRenderbuffers failed: {err}");
                0
            }
        }
    }

    fn delete_renderbuffer(&mut self, renderbuffer: GlHandle) {
        if let Some(r) = rb_obj(renderbuffer) {
            unsafe { self.gl.delete_renderbuffer(r) };
        }
    }

    fn bind_renderbuffer(&mut self, target: GlEnum, renderbuffer: GlHandle) {
        unsafe { self.gl.bind_renderbuffer(target, rb_obj(renderbuffer)) };
    }

    fn renderbuffer_storage(
        &mut self,
        target: GlEnum,
        internal_format: GlEnum,
        width: i32,
        height: i32,
    ) {
        unsafe {
            self.gl
                .renderbuffer_storage(target, internal_format, width, height)
        };
    }

    fn gen_framebuffer_ext(&mut self) -> GlHandle {
        ext_gen_one(self.ext.gen_framebuffers_ext, "glGenFramebuffersEXT")
    }

    fn delete_framebuffer_ext(&mut self, framebuffer: GlHandle) {
        let names = [framebuffer];
        ext_call!(
            self,
            delete_framebuffers_ext,
            "glDeleteFramebuffersEXT",
            (1, names.as_ptr())
        );
    }

    fn bind_framebuffer_ext(&mut self, target: GlEnum, framebuffer: GlHandle) {
        ext_call!(
            self,
            bind_framebuffer_ext,
            "glBindFramebufferEXT",
            (target, framebuffer)
        );
    }

    fn framebuffer_texture_2d_ext(
        &mut self,
        target: GlEnum,
        attachment: GlEnum,
        tex_target: GlEnum,
        texture: GlHandle,
        level: i32,
    ) {
        ext_call!(
            self,
            framebuffer_texture_2d_ext,
            "glFramebufferTexture2DEXT",
            (target, attachment, tex_target, texture, level)
        );
    }

    fn framebuffer_renderbuffer_ext(
        &mut self,
        target: GlEnum,
        attachment: GlEnum,
        rb_target: GlEnum,
        renderbuffer: GlHandle,
    ) {
        ext_call!(
            self,
            framebuffer_renderbuffer_ext,
            "glFramebufferRenderbufferEXT",
            (target, attachment, rb_target, renderbuffer)
        );
    }

    fn check_framebuffer_status_ext(&mut self, target: GlEnum) -> GlEnum {
        ext_call_ret!(
            self,
            check_framebuffer_status_ext,
            "glCheckFramebufferStatusEXT",
            (target),
            0
        )
    }

    fn gen_renderbuffer_ext(&mut self) -> GlHandle {
        ext_gen_one(self.ext.gen_renderbuffers_ext, "glGenRenderbuffersEXT")
    }

    fn bind_renderbuffer_ext(&mut self, target: GlEnum, renderbuffer: GlHandle) {
        ext_call!(
            self,
            bind_renderbuffer_ext,
            "glBindRenderbufferEXT",
            (target, renderbuffer)
        );
    }

    fn renderbuffer_storage_ext(
        &mut self,
        target: GlEnum,
        internal_format: GlEnum,
        width: i32,
        height: i32,
    ) {
        ext_call!(
            self,
            renderbuffer_storage_ext,
            "glRenderbufferStorageEXT",
            (target, internal_format, width, height)
        );
    }

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
    ) {
        unsafe {
            self.gl.blit_framebuffer(
                src_x0, src_y0, src_x1, src_y1, dst_x0, dst_y0, dst_x1, dst_y1, mask, filter,
            )
        };
    }

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
    ) {
        ext_call!(
            self,
            blit_framebuffer_nv,
            "glBlitFramebufferNV",
            (src_x0, src_y0, src_x1, src_y1, dst_x0, dst_y0, dst_x1, dst_y1, mask, filter)
        );
    }

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
    ) {
        ext_call!(
            self,
            copy_image_sub_data,
            "glCopyImageSubData",
            (
                src, src_target, src_level, src_x, src_y, src_z, dst, dst_target, dst_level,
                dst_x, dst_y, dst_z, width, height, depth,
            )
        );
    }

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
    ) {
        ext_call!(
            self,
            copy_image_sub_data_nv,
            "glCopyImageSubDataNV",
            (
                src, src_target, src_level, src_x, src_y, src_z, dst, dst_target, dst_level,
                dst_x, dst_y, dst_z, width, height, depth,
            )
        );
    }

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
    ) {
        ext_call!(
            self,
            copy_image_sub_data_oes,
            "glCopyImageSubDataOES",
            (
                src, src_target, src_level, src_x, src_y, src_z, dst, dst_target, dst_level,
                dst_x, dst_y, dst_z, width, height, depth,
            )
        );
    }
}
