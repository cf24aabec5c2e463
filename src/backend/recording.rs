//! Recording driver double.
//!
//! Captures every driver call as a [`GlCall`] value so tests (and trace
//! tooling) can assert on the exact call sequence the interpreters issue.
//! Name allocation, shader compile/link outcomes, uniform locations, and
//! framebuffer status are simulated and configurable per test.

use std::collections::HashMap;

use crate::caps::GlCapabilities;
use crate::hal::{GlBackend, GlEnum, GlHandle};

/// One recorded driver call.
#[derive(Clone, Debug, PartialEq)]
pub enum GlCall {
    GetParameterF32 { pname: GlEnum },
    GenTextures { names: Vec<GlHandle> },
    DeleteTextures { names: Vec<GlHandle> },
    ActiveTexture { unit: GlEnum },
    BindTexture { target: GlEnum, texture: GlHandle },
    TexImage2D {
        target: GlEnum,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        border: i32,
        format: GlEnum,
        ty: GlEnum,
        pixels_len: Option<usize>,
    },
    TexParameterI32 { target: GlEnum, pname: GlEnum, value: i32 },
    TexParameterF32 { target: GlEnum, pname: GlEnum, value: f32 },
    GenerateMipmap { target: GlEnum },
    GenBuffer { name: GlHandle },
    BindBuffer { target: GlEnum, buffer: GlHandle },
    BufferDataSize { target: GlEnum, size: usize, usage: GlEnum },
    BufferSubData { target: GlEnum, offset: usize, len: usize },
    CreateShader { stage: GlEnum, shader: GlHandle },
    ShaderSource { shader: GlHandle, source: String },
    CompileShader { shader: GlHandle },
    GetShaderCompileStatus { shader: GlHandle },
    GetShaderInfoLog { shader: GlHandle },
    DeleteShader { shader: GlHandle },
    CreateProgram { program: GlHandle },
    AttachShader { program: GlHandle, shader: GlHandle },
    BindAttribLocation { program: GlHandle, location: u32, name: String },
    BindFragDataLocation { program: GlHandle, color: u32, name: String },
    BindFragDataLocationIndexed {
        program: GlHandle,
        color: u32,
        index: u32,
        name: String,
    },
    BindFragDataLocationIndexedExt {
        program: GlHandle,
        color: u32,
        index: u32,
        name: String,
    },
    LinkProgram { program: GlHandle },
    GetProgramLinkStatus { program: GlHandle },
    GetProgramInfoLog { program: GlHandle },
    UseProgram { program: GlHandle },
    GetUniformLocation { program: GlHandle, name: String },
    Uniform1F { location: i32, x: f32 },
    Uniform2F { location: i32, x: f32, y: f32 },
    Uniform3F { location: i32, x: f32, y: f32, z: f32 },
    Uniform4F { location: i32, x: f32, y: f32, z: f32, w: f32 },
    Uniform1I { location: i32, x: i32 },
    Uniform2I { location: i32, x: i32, y: i32 },
    Uniform3I { location: i32, x: i32, y: i32, z: i32 },
    Uniform4I { location: i32, x: i32, y: i32, z: i32, w: i32 },
    UniformMatrix4F {
        location: i32,
        transpose: bool,
        matrix: [f32; 16],
    },
    Enable { cap: GlEnum },
    Disable { cap: GlEnum },
    DepthMask { write: bool },
    DepthFunc { func: GlEnum },
    DepthRange { near: f32, far: f32 },
    BlendEquationSeparate { mode_rgb: GlEnum, mode_alpha: GlEnum },
    BlendFuncSeparate {
        src_rgb: GlEnum,
        dst_rgb: GlEnum,
        src_alpha: GlEnum,
        dst_alpha: GlEnum,
    },
    BlendColor { r: f32, g: f32, b: f32, a: f32 },
    ColorMask { r: bool, g: bool, b: bool, a: bool },
    ClearColor { r: f32, g: f32, b: f32, a: f32 },
    ClearDepthF64 { depth: f64 },
    ClearDepthF32 { depth: f32 },
    ClearStencil { stencil: i32 },
    Clear { mask: u32 },
    StencilFunc { func: GlEnum, reference: i32, mask: u32 },
    StencilOp {
        stencil_fail: GlEnum,
        depth_fail: GlEnum,
        pass: GlEnum,
    },
    StencilMask { mask: u32 },
    Viewport { x: i32, y: i32, width: i32, height: i32 },
    Scissor { x: i32, y: i32, width: i32, height: i32 },
    FrontFace { winding: GlEnum },
    CullFace { face: GlEnum },
    GenVertexArray { name: GlHandle },
    DeleteVertexArray { vao: GlHandle },
    BindVertexArray { vao: GlHandle },
    EnableVertexAttribArray { index: u32 },
    DisableVertexAttribArray { index: u32 },
    VertexAttribPointer {
        index: u32,
        size: i32,
        ty: GlEnum,
        normalized: bool,
        stride: i32,
        offset: usize,
    },
    DrawArrays { mode: GlEnum, first: i32, count: i32 },
    DrawElements {
        mode: GlEnum,
        count: i32,
        index_type: GlEnum,
        offset: usize,
    },
    GenFramebuffer { name: GlHandle },
    DeleteFramebuffer { framebuffer: GlHandle },
    BindFramebuffer { target: GlEnum, framebuffer: GlHandle },
    FramebufferTexture2D {
        target: GlEnum,
        attachment: GlEnum,
        tex_target: GlEnum,
        texture: GlHandle,
        level: i32,
    },
    FramebufferRenderbuffer {
        target: GlEnum,
        attachment: GlEnum,
        rb_target: GlEnum,
        renderbuffer: GlHandle,
    },
    CheckFramebufferStatus { target: GlEnum },
    GenRenderbuffer { name: GlHandle },
    DeleteRenderbuffer { renderbuffer: GlHandle },
    BindRenderbuffer { target: GlEnum, renderbuffer: GlHandle },
    RenderbufferStorage {
        target: GlEnum,
        internal_format: GlEnum,
        width: i32,
        height: i32,
    },
    GenFramebufferExt { name: GlHandle },
    DeleteFramebufferExt { framebuffer: GlHandle },
    BindFramebufferExt { target: GlEnum, framebuffer: GlHandle },
    FramebufferTexture2DExt {
        target: GlEnum,
        attachment: GlEnum,
        tex_target: GlEnum,
        texture: GlHandle,
        level: i32,
    },
    FramebufferRenderbufferExt {
        target: GlEnum,
        attachment: GlEnum,
        rb_target: GlEnum,
        renderbuffer: GlHandle,
    },
    CheckFramebufferStatusExt { target: GlEnum },
    GenRenderbufferExt { name: GlHandle },
    BindRenderbufferExt { target: GlEnum, renderbuffer: GlHandle },
    RenderbufferStorageExt {
        target: GlEnum,
        internal_format: GlEnum,
        width: i32,
        height: i32,
    },
    BlitFramebuffer {
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
    },
    BlitFramebufferNv {
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
    },
    CopyImageSubData {
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
    },
    CopyImageSubDataNv {
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
    },
    CopyImageSubDataOes {
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
    },
}

/// [`GlBackend`] double that records calls instead of touching a driver.
pub struct RecordingBackend {
    caps: GlCapabilities,
    calls: Vec<GlCall>,
    next_name: GlHandle,
    compile_status: bool,
    link_status: bool,
    shader_info_log: String,
    program_info_log: String,
    uniform_locations: HashMap<String, i32>,
    next_uniform_location: i32,
    framebuffer_status: GlEnum,
    float_parameters: HashMap<GlEnum, f32>,
}

impl RecordingBackend {
    pub fn new(caps: GlCapabilities) -> Self {
        let mut float_parameters = HashMap::new();
        float_parameters.insert(crate::hal::MAX_TEXTURE_MAX_ANISOTROPY_EXT, 16.0);
        Self {
            caps,
            calls: Vec::new(),
            next_name: 1,
            compile_status: true,
            link_status: true,
            shader_info_log: String::new(),
            program_info_log: String::new(),
            uniform_locations: HashMap::new(),
            next_uniform_location: 0,
            framebuffer_status: glow::FRAMEBUFFER_COMPLETE,
            float_parameters,
        }
    }

    pub fn calls(&self) -> &[GlCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<GlCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Outcome reported for subsequent shader compiles.
    pub fn set_compile_result(&mut self, ok: bool, info_log: impl Into<String>) {
        self.compile_status = ok;
        self.shader_info_log = info_log.into();
    }

    /// Outcome reported for subsequent program links.
    pub fn set_link_result(&mut self, ok: bool, info_log: impl Into<String>) {
        self.link_status = ok;
        self.program_info_log = info_log.into();
    }

    /// Pins the location returned for a uniform name; unpinned names get
    /// sequential non-negative locations.
    pub fn set_uniform_location(&mut self, name: &str, location: i32) {
        self.uniform_locations.insert(name.to_string(), location);
    }

    pub fn set_framebuffer_status(&mut self, status: GlEnum) {
        self.framebuffer_status = status;
    }

    pub fn set_float_parameter(&mut self, pname: GlEnum, value: f32) {
        self.float_parameters.insert(pname, value);
    }

    fn alloc_name(&mut self) -> GlHandle {
        let name = self.next_name;
        self.next_name += 1;
        name
    }

    fn record(&mut self, call: GlCall) {
        self.calls.push(call);
    }
}

impl GlBackend for RecordingBackend {
    fn capabilities(&self) -> GlCapabilities {
        self.caps
    }

    fn get_parameter_f32(&mut self, pname: GlEnum) -> f32 {
        self.record(GlCall::GetParameterF32 { pname });
        self.float_parameters.get(&pname).copied().unwrap_or(0.0)
    }

    fn gen_textures(&mut self, count: usize) -> Vec<GlHandle> {
        let names: Vec<GlHandle> = (0..count).map(|_| self.alloc_name()).collect();
        self.record(GlCall::GenTextures {
            names: names.clone(),
        });
        names
    }

    fn delete_textures(&mut self, names: &[GlHandle]) {
        self.record(GlCall::DeleteTextures {
            names: names.to_vec(),
        });
    }

    fn active_texture(&mut self, unit: GlEnum) {
        self.record(GlCall::ActiveTexture { unit });
    }

    fn bind_texture(&mut self, target: GlEnum, texture: GlHandle) {
        self.record(GlCall::BindTexture { target, texture });
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
        self.record(GlCall::TexImage2D {
            target,
            level,
            internal_format,
            width,
            height,
            border,
            format,
            ty,
            pixels_len: pixels.map(<[u8]>::len),
        });
    }

    fn tex_parameter_i32(&mut self, target: GlEnum, pname: GlEnum, value: i32) {
        self.record(GlCall::TexParameterI32 {
            target,
            pname,
            value,
        });
    }

    fn tex_parameter_f32(&mut self, target: GlEnum, pname: GlEnum, value: f32) {
        self.record(GlCall::TexParameterF32 {
            target,
            pname,
            value,
        });
    }

    fn generate_mipmap(&mut self, target: GlEnum) {
        self.record(GlCall::GenerateMipmap { target });
    }

    fn gen_buffer(&mut self) -> GlHandle {
        let name = self.alloc_name();
        self.record(GlCall::GenBuffer { name });
        name
    }

    fn bind_buffer(&mut self, target: GlEnum, buffer: GlHandle) {
        self.record(GlCall::BindBuffer { target, buffer });
    }

    fn buffer_data_size(&mut self, target: GlEnum, size: usize, usage: GlEnum) {
        self.record(GlCall::BufferDataSize {
            target,
            size,
            usage,
        });
    }

    fn buffer_sub_data(&mut self, target: GlEnum, offset: usize, data: &[u8]) {
        self.record(GlCall::BufferSubData {
            target,
            offset,
            len: data.len(),
        });
    }

    fn create_shader(&mut self, stage: GlEnum) -> GlHandle {
        let shader = self.alloc_name();
        self.record(GlCall::CreateShader { stage, shader });
        shader
    }

    fn shader_source(&mut self, shader: GlHandle, source: &str) {
        self.record(GlCall::ShaderSource {
            shader,
            source: source.to_string(),
        });
    }

    fn compile_shader(&mut self, shader: GlHandle) {
        self.record(GlCall::CompileShader { shader });
    }

    fn get_shader_compile_status(&mut self, shader: GlHandle) -> bool {
        self.record(GlCall::GetShaderCompileStatus { shader });
        self.compile_status
    }

    fn get_shader_info_log(&mut self, shader: GlHandle) -> String {
        self.record(GlCall::GetShaderInfoLog { shader });
        self.shader_info_log.clone()
    }

    fn delete_shader(&mut self, shader: GlHandle) {
        self.record(GlCall::DeleteShader { shader });
    }

    fn create_program(&mut self) -> GlHandle {
        let program = self.alloc_name();
        self.record(GlCall::CreateProgram { program });
        program
    }

    fn attach_shader(&mut self, program: GlHandle, shader: GlHandle) {
        self.record(GlCall::AttachShader { program, shader });
    }

    fn bind_attrib_location(&mut self, program: GlHandle, location: u32, name: &str) {
        self.record(GlCall::BindAttribLocation {
            program,
            location,
            name: name.to_string(),
        });
    }

    fn bind_frag_data_location(&mut self, program: GlHandle, color: u32, name: &str) {
        self.record(GlCall::BindFragDataLocation {
            program,
            color,
            name: name.to_string(),
        });
    }

    fn bind_frag_data_location_indexed(
        &mut self,
        program: GlHandle,
        color: u32,
        index: u32,
        name: &str,
    ) {
        self.record(GlCall::BindFragDataLocationIndexed {
            program,
            color,
            index,
            name: name.to_string(),
        });
    }

    fn bind_frag_data_location_indexed_ext(
        &mut self,
        program: GlHandle,
        color: u32,
        index: u32,
        name: &str,
    ) {
        self.record(GlCall::BindFragDataLocationIndexedExt {
            program,
            color,
            index,
            name: name.to_string(),
        });
    }

    fn link_program(&mut self, program: GlHandle) {
        self.record(GlCall::LinkProgram { program });
    }

    fn get_program_link_status(&mut self, program: GlHandle) -> bool {
        self.record(GlCall::GetProgramLinkStatus { program });
        self.link_status
    }

    fn get_program_info_log(&mut self, program: GlHandle) -> String {
        self.record(GlCall::GetProgramInfoLog { program });
        self.program_info_log.clone()
    }

    fn use_program(&mut self, program: GlHandle) {
        self.record(GlCall::UseProgram { program });
    }

    fn get_uniform_location(&mut self, program: GlHandle, name: &str) -> i32 {
        self.record(GlCall::GetUniformLocation {
            program,
            name: name.to_string(),
        });
        if let Some(&location) = self.uniform_locations.get(name) {
            return location;
        }
        let location = self.next_uniform_location;
        self.next_uniform_location += 1;
        self.uniform_locations.insert(name.to_string(), location);
        location
    }

    fn uniform_1_f32(&mut self, location: i32, x: f32) {
        self.record(GlCall::Uniform1F { location, x });
    }

    fn uniform_2_f32(&mut self, location: i32, x: f32, y: f32) {
        self.record(GlCall::Uniform2F { location, x, y });
    }

    fn uniform_3_f32(&mut self, location: i32, x: f32, y: f32, z: f32) {
        self.record(GlCall::Uniform3F { location, x, y, z });
    }

    fn uniform_4_f32(&mut self, location: i32, x: f32, y: f32, z: f32, w: f32) {
        self.record(GlCall::Uniform4F {
            location,
            x,
            y,
            z,
            w,
        });
    }

    fn uniform_1_i32(&mut self, location: i32, x: i32) {
        self.record(GlCall::Uniform1I { location, x });
    }

    fn uniform_2_i32(&mut self, location: i32, x: i32, y: i32) {
        self.record(GlCall::Uniform2I { location, x, y });
    }

    fn uniform_3_i32(&mut self, location: i32, x: i32, y: i32, z: i32) {
        self.record(GlCall::Uniform3I { location, x, y, z });
    }

    fn uniform_4_i32(&mut self, location: i32, x: i32, y: i32, z: i32, w: i32) {
        self.record(GlCall::Uniform4I {
            location,
            x,
            y,
            z,
            w,
        });
    }

    fn uniform_matrix_4_f32(&mut self, location: i32, transpose: bool, matrix: &[f32; 16]) {
        self.record(GlCall::UniformMatrix4F {
            location,
            transpose,
            matrix: *matrix,
        });
    }

    fn enable(&mut self, cap: GlEnum) {
        self.record(GlCall::Enable { cap });
    }

    fn disable(&mut self, cap: GlEnum) {
        self.record(GlCall::Disable { cap });
    }

    fn depth_mask(&mut self, write: bool) {
        self.record(GlCall::DepthMask { write });
    }

    fn depth_func(&mut self, func: GlEnum) {
        self.record(GlCall::DepthFunc { func });
    }

    fn depth_range(&mut self, near: f32, far: f32) {
        self.record(GlCall::DepthRange { near, far });
    }

    fn blend_equation_separate(&mut self, mode_rgb: GlEnum, mode_alpha: GlEnum) {
        self.record(GlCall::BlendEquationSeparate {
            mode_rgb,
            mode_alpha,
        });
    }

    fn blend_func_separate(
        &mut self,
        src_rgb: GlEnum,
        dst_rgb: GlEnum,
        src_alpha: GlEnum,
        dst_alpha: GlEnum,
    ) {
        self.record(GlCall::BlendFuncSeparate {
            src_rgb,
            dst_rgb,
            src_alpha,
            dst_alpha,
        });
    }

    fn blend_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.record(GlCall::BlendColor { r, g, b, a });
    }

    fn color_mask(&mut self, r: bool, g: bool, b: bool, a: bool) {
        self.record(GlCall::ColorMask { r, g, b, a });
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.record(GlCall::ClearColor { r, g, b, a });
    }

    fn clear_depth_f64(&mut self, depth: f64) {
        self.record(GlCall::ClearDepthF64 { depth });
    }

    fn clear_depth_f32(&mut self, depth: f32) {
        self.record(GlCall::ClearDepthF32 { depth });
    }

    fn clear_stencil(&mut self, stencil: i32) {
        self.record(GlCall::ClearStencil { stencil });
    }

    fn clear(&mut self, mask: u32) {
        self.record(GlCall::Clear { mask });
    }

    fn stencil_func(&mut self, func: GlEnum, reference: i32, mask: u32) {
        self.record(GlCall::StencilFunc {
            func,
            reference,
            mask,
        });
    }

    fn stencil_op(&mut self, stencil_fail: GlEnum, depth_fail: GlEnum, pass: GlEnum) {
        self.record(GlCall::StencilOp {
            stencil_fail,
            depth_fail,
            pass,
        });
    }

    fn stencil_mask(&mut self, mask: u32) {
        self.record(GlCall::StencilMask { mask });
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Viewport {
            x,
            y,
            width,
            height,
        });
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Scissor {
            x,
            y,
            width,
            height,
        });
    }

    fn front_face(&mut self, winding: GlEnum) {
        self.record(GlCall::FrontFace { winding });
    }

    fn cull_face(&mut self, face: GlEnum) {
        self.record(GlCall::CullFace { face });
    }

    fn gen_vertex_array(&mut self) -> GlHandle {
        let name = self.alloc_name();
        self.record(GlCall::GenVertexArray { name });
        name
    }

    fn delete_vertex_array(&mut self, vao: GlHandle) {
        self.record(GlCall::DeleteVertexArray { vao });
    }

    fn bind_vertex_array(&mut self, vao: GlHandle) {
        self.record(GlCall::BindVertexArray { vao });
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.record(GlCall::EnableVertexAttribArray { index });
    }

    fn disable_vertex_attrib_array(&mut self, index: u32) {
        self.record(GlCall::DisableVertexAttribArray { index });
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
        self.record(GlCall::VertexAttribPointer {
            index,
            size,
            ty,
            normalized,
            stride,
            offset,
        });
    }

    fn draw_arrays(&mut self, mode: GlEnum, first: i32, count: i32) {
        self.record(GlCall::DrawArrays { mode, first, count });
    }

    fn draw_elements(&mut self, mode: GlEnum, count: i32, index_type: GlEnum, offset: usize) {
        self.record(GlCall::DrawElements {
            mode,
            count,
            index_type,
            offset,
        });
    }

    fn gen_framebuffer(&mut self) -> GlHandle {
        let name = self.alloc_name();
        self.record(GlCall::GenFramebuffer { name });
        name
    }

    fn delete_framebuffer(&mut self, framebuffer: GlHandle) {
        self.record(GlCall::DeleteFramebuffer { framebuffer });
    }

    fn bind_framebuffer(&mut self, target: GlEnum, framebuffer: GlHandle) {
        self.record(GlCall::BindFramebuffer {
            target,
            framebuffer,
        });
    }

    fn framebuffer_texture_2d(
        &mut self,
        target: GlEnum,
        attachment: GlEnum,
        tex_target: GlEnum,
        texture: GlHandle,
        level: i32,
    ) {
        self.record(GlCall::FramebufferTexture2D {
            target,
            attachment,
            tex_target,
            texture,
            level,
        });
    }

    fn framebuffer_renderbuffer(
        &mut self,
        target: GlEnum,
        attachment: GlEnum,
        rb_target: GlEnum,
        renderbuffer: GlHandle,
    ) {
        self.record(GlCall::FramebufferRenderbuffer {
            target,
            attachment,
            rb_target,
            renderbuffer,
        });
    }

    fn check_framebuffer_status(&mut self, target: GlEnum) -> GlEnum {
        self.record(GlCall::CheckFramebufferStatus { target });
        self.framebuffer_status
    }

    fn gen_renderbuffer(&mut self) -> GlHandle {
        let name = self.alloc_name();
        self.record(GlCall::GenRenderbuffer { name });
        name
    }

    fn delete_renderbuffer(&mut self, renderbuffer: GlHandle) {
        self.record(GlCall::DeleteRenderbuffer { renderbuffer });
    }

    fn bind_renderbuffer(&mut self, target: GlEnum, renderbuffer: GlHandle) {
        self.record(GlCall::BindRenderbuffer {
            target,
            renderbuffer,
        });
    }

    fn renderbuffer_storage(
        &mut self,
        target: GlEnum,
        internal_format: GlEnum,
        width: i32,
        height: i32,
    ) {
        self.record(GlCall::RenderbufferStorage {
            target,
            internal_format,
            width,
            height,
        });
    }

    fn gen_framebuffer_ext(&mut self) -> GlHandle {
        let name = self.alloc_name();
        self.record(GlCall::GenFramebufferExt { name });
        name
    }

    fn delete_framebuffer_ext(&mut self, framebuffer: GlHandle) {
        self.record(GlCall::DeleteFramebufferExt { framebuffer });
    }

    fn bind_framebuffer_ext(&mut self, target: GlEnum, framebuffer: GlHandle) {
        self.record(GlCall::BindFramebufferExt {
            target,
            framebuffer,
        });
    }

    fn framebuffer_texture_2d_ext(
        &mut self,
        target: GlEnum,
        attachment: GlEnum,
        tex_target: GlEnum,
        texture: GlHandle,
        level: i32,
    ) {
        self.record(GlCall::FramebufferTexture2DExt {
            target,
            attachment,
            tex_target,
            texture,
            level,
        });
    }

    fn framebuffer_renderbuffer_ext(
        &mut self,
        target: GlEnum,
        attachment: GlEnum,
        rb_target: GlEnum,
        renderbuffer: GlHandle,
    ) {
        self.record(GlCall::FramebufferRenderbufferExt {
            target,
            attachment,
            rb_target,
            renderbuffer,
        });
    }

    fn check_framebuffer_status_ext(&mut self, target: GlEnum) -> GlEnum {
        self.record(GlCall::CheckFramebufferStatusExt { target });
        self.framebuffer_status
    }

    fn gen_renderbuffer_ext(&mut self) -> GlHandle {
        let name = self.alloc_name();
        self.record(GlCall::GenRenderbufferExt { name });
        name
    }

    fn bind_renderbuffer_ext(&mut self, target: GlEnum, renderbuffer: GlHandle) {
        self.record(GlCall::BindRenderbufferExt {
            target,
            renderbuffer,
        });
    }

    fn renderbuffer_storage_ext(
        &mut self,
        target: GlEnum,
        internal_format: GlEnum,
        width: i32,
        height: i32,
    ) {
        self.record(GlCall::RenderbufferStorageExt {
            target,
            internal_format,
            width,
            height,
        });
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
        self.record(GlCall::BlitFramebuffer {
            src_x0,
            src_y0,
            src_x1,
            src_y1,
            dst_x0,
            dst_y0,
            dst_x1,
            dst_y1,
            mask,
            filter,
        });
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
        self.record(GlCall::BlitFramebufferNv {
            src_x0,
            src_y0,
            src_x1,
            src_y1,
            dst_x0,
            dst_y0,
            dst_x1,
            dst_y1,
            mask,
            filter,
        });
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
        self.record(GlCall::CopyImageSubData {
            src,
            src_target,
            src_level,
            src_x,
            src_y,
            src_z,
            dst,
            dst_target,
            dst_level,
            dst_x,
            dst_y,
            dst_z,
            width,
            height,
            depth,
        });
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
        self.record(GlCall::CopyImageSubDataNv {
            src,
            src_target,
            src_level,
            src_x,
            src_y,
            src_z,
            dst,
            dst_target,
            dst_level,
            dst_x,
            dst_y,
            dst_z,
            width,
            height,
            depth,
        });
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
        self.record(GlCall::CopyImageSubDataOes {
            src,
            src_target,
            src_level,
            src_x,
            src_y,
            src_z,
            dst,
            dst_target,
            dst_level,
            dst_x,
            dst_y,
            dst_z,
            width,
            height,
            depth,
        });
    }
}
