//! Step execution against the driver.
//!
//! [`QueueRunner`] owns the GL-facing side of the renderer: it consumes init
//! and frame step lists on the context-owning thread, translates them into
//! driver calls in list order, and filters redundant state changes through
//! tracked handles. No step is reordered or batched, and no error crosses
//! this boundary as a `Result` — recoverable failures go to the log sink,
//! malformed work aborts the process.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::{debug, error, info, trace};

use crate::caps::{FboDialect, GlCapabilities};
use crate::diag::Diagnostic;
use crate::hal::{self, GlBackend, GlEnum, GlHandle};
use crate::resources::{Framebuffer, Program, Shader, Texture, VERTEX_ATTRIB_SLOTS};
use crate::stats::RunStats;
use crate::step::{InitStep, Offset2D, Rect2D, RenderCmd, Step};

/// Number of texture names generated per pool refill.
const TEXTURE_NAME_POOL_BATCH: usize = 16;

/// Framebuffer handle targeted when a pass unbinds to the backbuffer.
///
/// Hosts that composite the renderer behind their own FBO (emulator
/// frontends, capture tools) write this before submitting steps; the
/// executor only ever reads it, at unbind time.
pub static DEFAULT_FBO: AtomicU32 = AtomicU32::new(0);

/// Pixel formats understood by [`QueueRunner::copy_readback_buffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataFormat {
    Rgba8888,
    Bgra8888,
    Rgba4444,
    Rgba5551,
    Rgb565,
}

/// Executes submitted step lists against a [`GlBackend`].
pub struct QueueRunner<B: GlBackend> {
    gl: B,
    caps: GlCapabilities,
    name_pool: Vec<GlHandle>,
    global_vao: GlHandle,
    max_anisotropy: f32,
    current_draw_handle: GlHandle,
    current_read_handle: GlHandle,
    target_width: i32,
    target_height: i32,
    cur_fb_width: i32,
    cur_fb_height: i32,
    stats: RunStats,
}

impl<B: GlBackend> QueueRunner<B> {
    /// `target_width`/`target_height` are the backbuffer dimensions, used to
    /// Y-flip viewport and scissor rectangles when no framebuffer is bound.
    pub fn new(gl: B, target_width: i32, target_height: i32) -> Self {
        let caps = gl.capabilities();
        Self {
            gl,
            caps,
            name_pool: Vec::new(),
            global_vao: 0,
            max_anisotropy: 0.0,
            current_draw_handle: 0,
            current_read_handle: 0,
            target_width,
            target_height,
            cur_fb_width: target_width,
            cur_fb_height: target_height,
            stats: RunStats::default(),
        }
    }

    pub fn capabilities(&self) -> GlCapabilities {
        self.caps
    }

    /// Anisotropy ceiling queried at device creation; producers clamp
    /// sampler anisotropy against it.
    pub fn max_anisotropy(&self) -> f32 {
        self.max_anisotropy
    }

    pub fn set_target_size(&mut self, width: i32, height: i32) {
        self.target_width = width;
        self.target_height = height;
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = RunStats::default();
    }

    pub fn backend(&self) -> &B {
        &self.gl
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.gl
    }

    pub fn create_device_objects(&mut self) {
        self.max_anisotropy = self
            .gl
            .get_parameter_f32(hal::MAX_TEXTURE_MAX_ANISOTROPY_EXT);
        if self.global_vao == 0 {
            self.global_vao = self.gl.gen_vertex_array();
        }
    }

    pub fn destroy_device_objects(&mut self) {
        if !self.name_pool.is_empty() {
            self.gl.delete_textures(&self.name_pool);
            self.name_pool.clear();
        }
        if self.global_vao != 0 {
            self.gl.delete_vertex_array(self.global_vao);
            self.global_vao = 0;
        }
    }

    /// Hands out a pre-generated texture name, refilling the pool in batches
    /// of [`TEXTURE_NAME_POOL_BATCH`].
    pub fn alloc_texture_name(&mut self) -> GlHandle {
        if self.name_pool.is_empty() {
            self.name_pool = self.gl.gen_textures(TEXTURE_NAME_POOL_BATCH);
        }
        self.name_pool
            .pop()
            .expect("texture name pool refill returned no names")
    }

    /// Executes one resource-creation burst, taking ownership of the
    /// embedded heap payloads.
    pub fn run_init_steps(&mut self, steps: Vec<InitStep>) {
        self.gl.active_texture(glow::TEXTURE0);
        let mut bound_texture: Option<GlHandle> = None;

        for step in steps {
            self.stats.init_steps += 1;
            match step {
                InitStep::CreateTexture { texture } => {
                    let mut tex = texture.borrow_mut();
                    tex.handle = self.gl.gen_textures(1)[0];
                    self.gl.bind_texture(tex.target, tex.handle);
                    bound_texture = Some(tex.handle);
                }
                InitStep::CreateBuffer { buffer, size, usage } => {
                    let mut buf = buffer.borrow_mut();
                    buf.handle = self.gl.gen_buffer();
                    buf.size = size;
                    buf.usage = usage;
                    self.gl.bind_buffer(buf.target, buf.handle);
                    self.gl.buffer_data_size(buf.target, size, usage);
                }
                InitStep::BufferSubdata {
                    buffer,
                    offset,
                    data,
                } => {
                    // Always the array-buffer target, regardless of the
                    // buffer's declared target.
                    let handle = buffer.borrow().handle;
                    self.gl.bind_buffer(glow::ARRAY_BUFFER, handle);
                    self.gl.buffer_sub_data(glow::ARRAY_BUFFER, offset, &data);
                }
                InitStep::CreateShader {
                    shader,
                    stage,
                    source,
                } => {
                    let handle = self.gl.create_shader(stage);
                    let mut sh = shader.borrow_mut();
                    sh.handle = handle;
                    sh.stage = stage;
                    self.gl.shader_source(handle, &source);
                    self.gl.compile_shader(handle);
                    if !self.gl.get_shader_compile_status(handle) {
                        let info_log = self.gl.get_shader_info_log(handle);
                        self.gl.delete_shader(handle);
                        sh.handle = 0;
                        sh.valid = false;
                        let stage_name = if stage == glow::FRAGMENT_SHADER {
                            "fragment"
                        } else {
                            "vertex"
                        };
                        error!(
                            "{}",
                            Diagnostic::ShaderCompileFailed {
                                stage: stage_name,
                                info_log,
                            }
                        );
                    }
                    // Set even after a failed compile; callers key off the
                    // zero handle instead.
                    sh.valid = true;
                }
                InitStep::CreateProgram { program, shaders } => {
                    self.init_create_program(&program, &shaders);
                }
                InitStep::CreateInputLayout { layout } => {
                    // All binding work happens per draw.
                    let _ = layout;
                }
                InitStep::CreateFramebuffer { framebuffer } => {
                    bound_texture = None;
                    self.init_create_framebuffer(&framebuffer);
                }
                InitStep::TextureImage {
                    texture,
                    level,
                    internal_format,
                    format,
                    ty,
                    width,
                    height,
                    linear_filter,
                    data,
                } => {
                    let mut tex = texture.borrow_mut();
                    if bound_texture != Some(tex.handle) {
                        self.gl.bind_texture(tex.target, tex.handle);
                        bound_texture = Some(tex.handle);
                    }
                    self.gl.tex_image_2d(
                        tex.target,
                        level,
                        internal_format,
                        width,
                        height,
                        0,
                        format,
                        ty,
                        Some(&data),
                    );
                    tex.level = level;
                    tex.internal_format = internal_format;
                    tex.format = format;
                    tex.ty = ty;
                    tex.width = width;
                    tex.height = height;

                    let filter = if linear_filter { glow::LINEAR } else { glow::NEAREST };
                    self.gl.tex_parameter_i32(
                        glow::TEXTURE_2D,
                        glow::TEXTURE_WRAP_S,
                        glow::CLAMP_TO_EDGE as i32,
                    );
                    self.gl.tex_parameter_i32(
                        glow::TEXTURE_2D,
                        glow::TEXTURE_WRAP_T,
                        glow::CLAMP_TO_EDGE as i32,
                    );
                    self.gl
                        .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, filter as i32);
                    self.gl
                        .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, filter as i32);
                    tex.wrap_s = glow::CLAMP_TO_EDGE;
                    tex.wrap_t = glow::CLAMP_TO_EDGE;
                    tex.mag_filter = filter;
                    tex.min_filter = filter;
                }
                InitStep::TextureSubdata { .. } => {
                    // Reserved; no sub-rectangle upload path yet.
                }
            }
        }
    }

    fn init_create_program(
        &mut self,
        program: &Rc<RefCell<Program>>,
        shaders: &[Rc<RefCell<Shader>>],
    ) {
        assert!(!shaders.is_empty(), "can't create a program with zero shaders");

        let handle = self.gl.create_program();
        program.borrow_mut().handle = handle;

        for shader in shaders {
            let sh = shader.borrow();
            debug_assert!(sh.handle != 0, "can't create a program with a null shader");
            self.gl.attach_shader(handle, sh.handle);
        }

        let support_dual_source = {
            let prog = program.borrow();
            for semantic in &prog.semantics {
                self.gl
                    .bind_attrib_location(handle, semantic.location, semantic.name);
            }
            prog.support_dual_source
        };

        if !self.caps.is_gles {
            if support_dual_source {
                // Dual source alpha.
                self.gl
                    .bind_frag_data_location_indexed(handle, 0, 0, "fragColor0");
                self.gl
                    .bind_frag_data_location_indexed(handle, 0, 1, "fragColor1");
            } else if self.caps.version_at_least(3, 3, 0) {
                self.gl.bind_frag_data_location(handle, 0, "fragColor0");
            }
        } else if self.caps.gles3 && self.caps.supports_dual_source_blend {
            self.gl
                .bind_frag_data_location_indexed_ext(handle, 0, 0, "fragColor0");
            self.gl
                .bind_frag_data_location_indexed_ext(handle, 0, 1, "fragColor1");
        }

        self.gl.link_program(handle);
        if !self.gl.get_program_link_status(handle) {
            let info_log = self.gl.get_program_info_log(handle);
            error!(
                "{}",
                Diagnostic::ProgramLinkFailed {
                    shader_count: shaders.len(),
                    info_log,
                }
            );
            return;
        }

        self.gl.use_program(handle);

        let prog = program.borrow();
        for query in &prog.queries {
            query
                .dest
                .set(self.gl.get_uniform_location(handle, query.name));
        }
        for init in &prog.initializers {
            let location = init.slot.get();
            if location != -1 {
                self.gl.uniform_1_i32(location, init.value);
            }
        }
    }

    fn init_create_framebuffer(&mut self, framebuffer: &Rc<RefCell<Framebuffer>>) {
        let mut fb = framebuffer.borrow_mut();

        if !self.caps.is_gles {
            if !self.caps.arb_framebuffer_object && self.caps.ext_framebuffer_object {
                self.fbo_ext_create(&mut fb);
                return;
            } else if !self.caps.arb_framebuffer_object {
                return;
            }
        }

        fb.dialect = FboDialect::ArbCore;
        fb.handle = self.gl.gen_framebuffer();
        fb.color_texture = self.gl.gen_textures(1)[0];

        self.gl.bind_texture(glow::TEXTURE_2D, fb.color_texture);
        self.gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA as i32,
            fb.width,
            fb.height,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            None,
        );
        self.color_texture_params();

        if self.caps.is_gles {
            if self.caps.oes_packed_depth_stencil {
                info!(
                    "creating {}x{} framebuffer with packed depth/stencil",
                    fb.width, fb.height
                );
                fb.z_buffer = 0;
                fb.stencil_buffer = 0;
                // 24-bit depth, 8-bit stencil combined.
                fb.z_stencil_buffer = self.gl.gen_renderbuffer();
                self.gl.bind_renderbuffer(glow::RENDERBUFFER, fb.z_stencil_buffer);
                self.gl.renderbuffer_storage(
                    glow::RENDERBUFFER,
                    hal::DEPTH24_STENCIL8_OES,
                    fb.width,
                    fb.height,
                );

                self.gl.bind_framebuffer(glow::FRAMEBUFFER, fb.handle);
                self.gl.framebuffer_texture_2d(
                    glow::FRAMEBUFFER,
                    glow::COLOR_ATTACHMENT0,
                    glow::TEXTURE_2D,
                    fb.color_texture,
                    0,
                );
                self.gl.framebuffer_renderbuffer(
                    glow::FRAMEBUFFER,
                    glow::DEPTH_ATTACHMENT,
                    glow::RENDERBUFFER,
                    fb.z_stencil_buffer,
                );
                self.gl.framebuffer_renderbuffer(
                    glow::FRAMEBUFFER,
                    glow::STENCIL_ATTACHMENT,
                    glow::RENDERBUFFER,
                    fb.z_stencil_buffer,
                );
            } else {
                info!(
                    "creating {}x{} framebuffer with separate depth and stencil",
                    fb.width, fb.height
                );
                fb.z_stencil_buffer = 0;
                // 16/24-bit depth plus a separate 8-bit stencil.
                fb.z_buffer = self.gl.gen_renderbuffer();
                self.gl.bind_renderbuffer(glow::RENDERBUFFER, fb.z_buffer);
                let depth_format = if self.caps.oes_depth24 {
                    glow::DEPTH_COMPONENT24
                } else {
                    glow::DEPTH_COMPONENT16
                };
                self.gl
                    .renderbuffer_storage(glow::RENDERBUFFER, depth_format, fb.width, fb.height);

                fb.stencil_buffer = self.gl.gen_renderbuffer();
                self.gl.bind_renderbuffer(glow::RENDERBUFFER, fb.stencil_buffer);
                self.gl.renderbuffer_storage(
                    glow::RENDERBUFFER,
                    glow::STENCIL_INDEX8,
                    fb.width,
                    fb.height,
                );

                self.gl.bind_framebuffer(glow::FRAMEBUFFER, fb.handle);
                self.gl.framebuffer_texture_2d(
                    glow::FRAMEBUFFER,
                    glow::COLOR_ATTACHMENT0,
                    glow::TEXTURE_2D,
                    fb.color_texture,
                    0,
                );
                self.gl.framebuffer_renderbuffer(
                    glow::FRAMEBUFFER,
                    glow::DEPTH_ATTACHMENT,
                    glow::RENDERBUFFER,
                    fb.z_buffer,
                );
                self.gl.framebuffer_renderbuffer(
                    glow::FRAMEBUFFER,
                    glow::STENCIL_ATTACHMENT,
                    glow::RENDERBUFFER,
                    fb.stencil_buffer,
                );
            }
        } else {
            fb.z_buffer = 0;
            fb.stencil_buffer = 0;
            // Desktop always has packed depth/stencil.
            fb.z_stencil_buffer = self.gl.gen_renderbuffer();
            self.gl.bind_renderbuffer(glow::RENDERBUFFER, fb.z_stencil_buffer);
            self.gl.renderbuffer_storage(
                glow::RENDERBUFFER,
                glow::DEPTH24_STENCIL8,
                fb.width,
                fb.height,
            );

            self.gl.bind_framebuffer(glow::FRAMEBUFFER, fb.handle);
            self.gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                fb.color_texture,
                0,
            );
            self.gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::RENDERBUFFER,
                fb.z_stencil_buffer,
            );
            self.gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::STENCIL_ATTACHMENT,
                glow::RENDERBUFFER,
                fb.z_stencil_buffer,
            );
        }

        let status = self.gl.check_framebuffer_status(glow::FRAMEBUFFER);
        self.report_framebuffer_status(status);

        // Unbind scratch state.
        self.gl.bind_renderbuffer(glow::RENDERBUFFER, 0);
        self.gl.bind_texture(glow::TEXTURE_2D, 0);

        self.current_draw_handle = fb.handle;
        self.current_read_handle = fb.handle;
    }

    /// Legacy desktop path through the EXT entry points. Always uses the
    /// packed depth/stencil layout.
    fn fbo_ext_create(&mut self, fb: &mut Framebuffer) {
        fb.dialect = FboDialect::Ext;
        fb.handle = self.gl.gen_framebuffer_ext();
        fb.color_texture = self.gl.gen_textures(1)[0];

        self.gl.bind_texture(glow::TEXTURE_2D, fb.color_texture);
        self.gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA as i32,
            fb.width,
            fb.height,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            None,
        );
        self.color_texture_params();

        fb.z_buffer = 0;
        fb.stencil_buffer = 0;
        fb.z_stencil_buffer = self.gl.gen_renderbuffer_ext();
        self.gl
            .bind_renderbuffer_ext(glow::RENDERBUFFER, fb.z_stencil_buffer);
        self.gl.renderbuffer_storage_ext(
            glow::RENDERBUFFER,
            hal::DEPTH_STENCIL_EXT,
            fb.width,
            fb.height,
        );

        self.gl.bind_framebuffer_ext(glow::FRAMEBUFFER, fb.handle);
        self.gl.framebuffer_texture_2d_ext(
            glow::FRAMEBUFFER,
            glow::COLOR_ATTACHMENT0,
            glow::TEXTURE_2D,
            fb.color_texture,
            0,
        );
        self.gl.framebuffer_renderbuffer_ext(
            glow::FRAMEBUFFER,
            glow::DEPTH_ATTACHMENT,
            glow::RENDERBUFFER,
            fb.z_stencil_buffer,
        );
        self.gl.framebuffer_renderbuffer_ext(
            glow::FRAMEBUFFER,
            glow::STENCIL_ATTACHMENT,
            glow::RENDERBUFFER,
            fb.z_stencil_buffer,
        );

        let status = self.gl.check_framebuffer_status_ext(glow::FRAMEBUFFER);
        self.report_framebuffer_status(status);

        self.gl.bind_renderbuffer_ext(glow::RENDERBUFFER, 0);
        self.gl.bind_texture(glow::TEXTURE_2D, 0);

        self.current_draw_handle = fb.handle;
        self.current_read_handle = fb.handle;
    }

    fn color_texture_params(&mut self) {
        self.gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        self.gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );
        self.gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            glow::LINEAR as i32,
        );
        self.gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            glow::LINEAR as i32,
        );
    }

    fn report_framebuffer_status(&self, status: GlEnum) {
        match status {
            glow::FRAMEBUFFER_COMPLETE => {}
            glow::FRAMEBUFFER_UNSUPPORTED => {
                error!("{}", Diagnostic::FramebufferUnsupported);
            }
            glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => {
                error!("{}", Diagnostic::FramebufferIncompleteAttachment);
            }
            status => {
                error!("{}", Diagnostic::FramebufferError { status });
            }
        }
    }

    /// Executes one frame's work, taking ownership of each step and
    /// releasing it after execution.
    pub fn run_steps(&mut self, steps: Vec<Step>) {
        for step in steps {
            self.stats.steps += 1;
            match step {
                Step::Render {
                    framebuffer,
                    commands,
                } => self.perform_render_pass(framebuffer, commands),
                Step::Copy {
                    src,
                    dst,
                    src_rect,
                    dst_pos,
                    aspect_mask,
                } => self.perform_copy(&src, &dst, src_rect, dst_pos, aspect_mask),
                Step::Blit { .. } => self.perform_blit(),
                Step::Readback { .. } => self.perform_readback(),
                Step::ReadbackImage { .. } => self.perform_readback_image(),
            }
        }
    }

    /// Diagnostic placeholder.
    pub fn log_steps(&self, steps: &[Step]) {
        for (i, step) in steps.iter().enumerate() {
            trace!("step {i}: {}", step.kind_name());
        }
    }

    /// CPU-side format conversion of a previously captured readback.
    /// Interface awaiting specification.
    pub fn copy_readback_buffer(
        &mut self,
        _width: i32,
        _height: i32,
        _src_format: DataFormat,
        _dest_format: DataFormat,
        _pixel_stride: i32,
        _pixels: &mut [u8],
    ) {
        debug!("readback buffer conversion requested; not implemented yet");
    }

    fn perform_render_pass(
        &mut self,
        framebuffer: Option<Rc<RefCell<Framebuffer>>>,
        commands: Vec<RenderCmd>,
    ) {
        // Don't execute empty renderpasses.
        if commands.is_empty() {
            return;
        }

        self.bind_framebuffer_as_render_target(framebuffer.as_ref());
        self.stats.render_passes += 1;

        self.gl.enable(glow::SCISSOR_TEST);
        self.gl.bind_vertex_array(self.global_vao);

        let is_backbuffer = framebuffer.is_none();
        let mut cur_program: Option<Rc<RefCell<Program>>> = None;
        let mut bound_texture: Option<Rc<RefCell<Texture>>> = None;
        let mut active_texture: u32 = 0;
        self.gl.active_texture(glow::TEXTURE0);

        let mut attr_mask: u32 = 0;

        // State filtering tracking.
        let mut cur_array_buffer: Option<GlHandle> = None;
        let mut cur_elem_array_buffer: Option<GlHandle> = None;

        for cmd in commands {
            match cmd {
                RenderCmd::Depth {
                    enabled,
                    write,
                    func,
                } => {
                    if enabled {
                        self.gl.enable(glow::DEPTH_TEST);
                        self.gl.depth_mask(write);
                        self.gl.depth_func(func);
                    } else {
                        self.gl.disable(glow::DEPTH_TEST);
                    }
                }
                RenderCmd::Blend {
                    enabled,
                    func_color,
                    func_alpha,
                    src_color,
                    dst_color,
                    src_alpha,
                    dst_alpha,
                    mask,
                } => {
                    if enabled {
                        self.gl.enable(glow::BLEND);
                        self.gl.blend_equation_separate(func_color, func_alpha);
                        self.gl
                            .blend_func_separate(src_color, dst_color, src_alpha, dst_alpha);
                    } else {
                        self.gl.disable(glow::BLEND);
                    }
                    self.gl.color_mask(
                        mask & 1 != 0,
                        mask & 2 != 0,
                        mask & 4 != 0,
                        mask & 8 != 0,
                    );
                }
                RenderCmd::Clear {
                    clear_mask,
                    clear_color,
                    clear_z,
                    clear_stencil,
                } => {
                    self.gl.disable(glow::SCISSOR_TEST);
                    self.gl.color_mask(true, true, true, true);
                    if clear_mask & glow::COLOR_BUFFER_BIT != 0 {
                        let [r, g, b, a] = unpack_rgba8(clear_color);
                        self.gl.clear_color(r, g, b, a);
                    }
                    if clear_mask & glow::DEPTH_BUFFER_BIT != 0 {
                        if self.caps.is_gles {
                            self.gl.clear_depth_f32(clear_z);
                        } else {
                            self.gl.clear_depth_f64(clear_z as f64);
                        }
                    }
                    if clear_mask & glow::STENCIL_BUFFER_BIT != 0 {
                        self.gl.clear_stencil(clear_stencil as i32);
                    }
                    self.gl.clear(clear_mask);
                    self.gl.enable(glow::SCISSOR_TEST);
                    self.stats.clears += 1;
                }
                RenderCmd::BlendColor { color } => {
                    self.gl.blend_color(color[0], color[1], color[2], color[3]);
                }
                RenderCmd::Viewport { viewport } => {
                    let mut y = viewport.y;
                    if is_backbuffer {
                        y = self.cur_fb_height as f32 - y - viewport.h;
                    }
                    self.gl.viewport(
                        viewport.x as i32,
                        y as i32,
                        viewport.w as i32,
                        viewport.h as i32,
                    );
                    self.gl.depth_range(viewport.min_z, viewport.max_z);
                }
                RenderCmd::Scissor { rect } => {
                    let mut y = rect.y;
                    if is_backbuffer {
                        y = self.cur_fb_height - y - rect.h;
                    }
                    self.gl.scissor(rect.x, y, rect.w, rect.h);
                }
                RenderCmd::UniformF {
                    name,
                    loc,
                    count,
                    values,
                } => {
                    let location = self.resolve_uniform(cur_program.as_ref(), name, loc.as_ref());
                    if location >= 0 {
                        match count {
                            1 => self.gl.uniform_1_f32(location, values[0]),
                            2 => self.gl.uniform_2_f32(location, values[0], values[1]),
                            3 => self
                                .gl
                                .uniform_3_f32(location, values[0], values[1], values[2]),
                            4 => self.gl.uniform_4_f32(
                                location, values[0], values[1], values[2], values[3],
                            ),
                            _ => unreachable!("uniform component count out of range"),
                        }
                    } else {
                        self.stats.uniforms_skipped += 1;
                    }
                }
                RenderCmd::UniformI {
                    name,
                    loc,
                    count,
                    values,
                } => {
                    let location = self.resolve_uniform(cur_program.as_ref(), name, loc.as_ref());
                    if location >= 0 {
                        match count {
                            1 => self.gl.uniform_1_i32(location, values[0]),
                            2 => self.gl.uniform_2_i32(location, values[0], values[1]),
                            3 => self
                                .gl
                                .uniform_3_i32(location, values[0], values[1], values[2]),
                            4 => self.gl.uniform_4_i32(
                                location, values[0], values[1], values[2], values[3],
                            ),
                            _ => unreachable!("uniform component count out of range"),
                        }
                    } else {
                        self.stats.uniforms_skipped += 1;
                    }
                }
                RenderCmd::UniformMatrix { name, loc, values } => {
                    let location = self.resolve_uniform(cur_program.as_ref(), name, loc.as_ref());
                    if location >= 0 {
                        self.gl.uniform_matrix_4_f32(location, false, &values);
                    } else {
                        self.stats.uniforms_skipped += 1;
                    }
                }
                RenderCmd::StencilFunc {
                    enabled,
                    func,
                    reference,
                    compare_mask,
                } => {
                    if enabled {
                        self.gl.enable(glow::STENCIL_TEST);
                        self.gl
                            .stencil_func(func, reference as i32, compare_mask as u32);
                    } else {
                        self.gl.disable(glow::STENCIL_TEST);
                    }
                }
                RenderCmd::StencilOp {
                    stencil_fail,
                    depth_fail,
                    pass,
                    write_mask,
                } => {
                    self.gl.stencil_op(stencil_fail, depth_fail, pass);
                    self.gl.stencil_mask(write_mask as u32);
                }
                RenderCmd::BindTexture { slot, texture } => {
                    if slot != active_texture {
                        self.gl.active_texture(glow::TEXTURE0 + slot);
                        active_texture = slot;
                    }
                    match texture {
                        Some(texture) => {
                            let (target, handle) = {
                                let tex = texture.borrow();
                                (tex.target, tex.handle)
                            };
                            self.gl.bind_texture(target, handle);
                            bound_texture = Some(texture);
                        }
                        None => {
                            // The 2D target is the only one the unbind path
                            // cares about.
                            self.gl.bind_texture(glow::TEXTURE_2D, 0);
                            bound_texture = None;
                        }
                    }
                }
                RenderCmd::BindFramebufferTexture {
                    slot,
                    framebuffer,
                    aspect,
                } => {
                    if slot != active_texture {
                        self.gl.active_texture(glow::TEXTURE0 + slot);
                        active_texture = slot;
                    }
                    if aspect == glow::COLOR_BUFFER_BIT {
                        let color_texture = framebuffer.borrow().color_texture;
                        self.gl.bind_texture(glow::TEXTURE_2D, color_texture);
                    }
                    // Depth texturing is reserved.
                    bound_texture = None;
                }
                RenderCmd::BindProgram { program } => {
                    let handle = program.borrow().handle;
                    self.gl.use_program(handle);
                    cur_program = Some(program);
                }
                RenderCmd::BindInputLayout { layout, offset } => {
                    let enable = layout.semantics_mask & !attr_mask;
                    let disable = !layout.semantics_mask & attr_mask;
                    for i in 0..VERTEX_ATTRIB_SLOTS {
                        if enable & (1 << i) != 0 {
                            self.gl.enable_vertex_attrib_array(i);
                        }
                        if disable & (1 << i) != 0 {
                            self.gl.disable_vertex_attrib_array(i);
                        }
                    }
                    attr_mask = layout.semantics_mask;
                    for entry in &layout.entries {
                        self.gl.vertex_attrib_pointer(
                            entry.location,
                            entry.count,
                            entry.ty,
                            entry.normalized,
                            entry.stride,
                            offset + entry.offset,
                        );
                    }
                }
                RenderCmd::BindBuffer { target, buffer } => {
                    let handle = buffer.map_or(0, |b| b.borrow().handle);
                    if target == glow::ARRAY_BUFFER {
                        if cur_array_buffer != Some(handle) {
                            self.gl.bind_buffer(target, handle);
                            cur_array_buffer = Some(handle);
                        } else {
                            self.stats.buffer_binds_elided += 1;
                        }
                    } else if target == glow::ELEMENT_ARRAY_BUFFER {
                        if cur_elem_array_buffer != Some(handle) {
                            self.gl.bind_buffer(target, handle);
                            cur_elem_array_buffer = Some(handle);
                        } else {
                            self.stats.buffer_binds_elided += 1;
                        }
                    } else {
                        self.gl.bind_buffer(target, handle);
                    }
                }
                RenderCmd::GenerateMipmaps => {
                    // Operates on whatever is bound to the active unit.
                    self.gl.generate_mipmap(glow::TEXTURE_2D);
                }
                RenderCmd::Draw { mode, first, count } => {
                    self.gl.draw_arrays(mode, first, count);
                    self.stats.draw_calls += 1;
                }
                RenderCmd::DrawIndexed {
                    mode,
                    count,
                    index_type,
                    offset,
                    instances,
                } => {
                    // Instanced indexed draws are reserved.
                    if instances == 1 {
                        self.gl.draw_elements(mode, count, index_type, offset);
                        self.stats.draw_calls += 1;
                    }
                }
                RenderCmd::TextureSampler {
                    wrap_s,
                    wrap_t,
                    mag_filter,
                    min_filter,
                    anisotropy,
                } => {
                    self.gl
                        .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap_s as i32);
                    self.gl
                        .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap_t as i32);
                    self.gl.tex_parameter_i32(
                        glow::TEXTURE_2D,
                        glow::TEXTURE_MAG_FILTER,
                        mag_filter as i32,
                    );
                    self.gl.tex_parameter_i32(
                        glow::TEXTURE_2D,
                        glow::TEXTURE_MIN_FILTER,
                        min_filter as i32,
                    );
                    if anisotropy != 0.0 {
                        self.gl.tex_parameter_f32(
                            glow::TEXTURE_2D,
                            hal::TEXTURE_MAX_ANISOTROPY_EXT,
                            anisotropy,
                        );
                    }
                    if let Some(texture) = &bound_texture {
                        let mut tex = texture.borrow_mut();
                        tex.wrap_s = wrap_s;
                        tex.wrap_t = wrap_t;
                        tex.mag_filter = mag_filter;
                        tex.min_filter = min_filter;
                        if anisotropy != 0.0 {
                            tex.anisotropy = anisotropy;
                        }
                    }
                }
                RenderCmd::TextureLod {
                    min_lod,
                    max_lod,
                    lod_bias,
                } => {
                    self.gl
                        .tex_parameter_f32(glow::TEXTURE_2D, glow::TEXTURE_MIN_LOD, min_lod);
                    self.gl
                        .tex_parameter_f32(glow::TEXTURE_2D, glow::TEXTURE_MAX_LOD, max_lod);
                    if !self.caps.is_gles {
                        self.gl
                            .tex_parameter_f32(glow::TEXTURE_2D, glow::TEXTURE_LOD_BIAS, lod_bias);
                    }
                    if let Some(texture) = &bound_texture {
                        let mut tex = texture.borrow_mut();
                        tex.min_lod = min_lod;
                        tex.max_lod = max_lod;
                        if !self.caps.is_gles {
                            tex.lod_bias = lod_bias;
                        }
                    }
                }
                RenderCmd::Raster {
                    cull_enable,
                    front_face,
                    cull_face,
                    dither_enable,
                } => {
                    if cull_enable {
                        self.gl.enable(glow::CULL_FACE);
                        self.gl.front_face(front_face);
                        self.gl.cull_face(cull_face);
                    } else {
                        self.gl.disable(glow::CULL_FACE);
                    }
                    if dither_enable {
                        self.gl.enable(glow::DITHER);
                    } else {
                        self.gl.disable(glow::DITHER);
                    }
                }
            }
        }

        // Tear down pass-local state.
        for i in 0..VERTEX_ATTRIB_SLOTS {
            if attr_mask & (1 << i) != 0 {
                self.gl.disable_vertex_attrib_array(i);
            }
        }
        if active_texture != 0 {
            self.gl.active_texture(glow::TEXTURE0);
        }
        self.gl.bind_buffer(glow::ARRAY_BUFFER, 0);
        self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, 0);
        self.gl.bind_vertex_array(0);
        self.gl.disable(glow::SCISSOR_TEST);
    }

    fn resolve_uniform(
        &mut self,
        program: Option<&Rc<RefCell<Program>>>,
        name: Option<&'static str>,
        slot: Option<&Rc<std::cell::Cell<i32>>>,
    ) -> i32 {
        if let Some(slot) = slot {
            return slot.get();
        }
        if let Some(name) = name {
            let program = program.expect("uniform upload by name requires a bound program");
            return self.program_uniform_loc(program, name);
        }
        -1
    }

    fn program_uniform_loc(&mut self, program: &Rc<RefCell<Program>>, name: &'static str) -> i32 {
        let mut prog = program.borrow_mut();
        if let Some(&location) = prog.uniform_cache.get(name) {
            return location;
        }
        let handle = prog.handle;
        let location = self.gl.get_uniform_location(handle, name);
        prog.uniform_cache.insert(name, location);
        location
    }

    fn perform_copy(
        &mut self,
        src: &Rc<RefCell<Framebuffer>>,
        dst: &Rc<RefCell<Framebuffer>>,
        src_rect: Rect2D,
        dst_pos: Offset2D,
        aspect_mask: u32,
    ) {
        let (src_name, dst_name, target) = match aspect_mask {
            glow::COLOR_BUFFER_BIT => (
                src.borrow().color_texture,
                dst.borrow().color_texture,
                glow::TEXTURE_2D,
            ),
            glow::DEPTH_BUFFER_BIT => panic!("depth copies not yet supported"),
            mask => panic!("unsupported copy aspect {mask:#x}"),
        };

        let (src_level, dst_level) = (0, 0);
        let (src_z, dst_z, depth) = (0, 0, 1);

        if self.caps.is_gles {
            self.gl.copy_image_sub_data_oes(
                src_name, target, src_level, src_rect.x, src_rect.y, src_z, dst_name, target,
                dst_level, dst_pos.x, dst_pos.y, dst_z, src_rect.w, src_rect.h, depth,
            );
        } else if self.caps.arb_copy_image {
            self.gl.copy_image_sub_data(
                src_name, target, src_level, src_rect.x, src_rect.y, src_z, dst_name, target,
                dst_level, dst_pos.x, dst_pos.y, dst_z, src_rect.w, src_rect.h, depth,
            );
        } else if self.caps.nv_copy_image {
            // Older, pre GL 4.x NVIDIA cards.
            self.gl.copy_image_sub_data_nv(
                src_name, target, src_level, src_rect.x, src_rect.y, src_z, dst_name, target,
                dst_level, dst_pos.x, dst_pos.y, dst_z, src_rect.w, src_rect.h, depth,
            );
        } else {
            debug!("no copy-image entry point available; copy skipped");
        }
    }

    /// Interface awaiting specification.
    fn perform_blit(&mut self) {
        debug!("framebuffer blit requested; not implemented yet");
    }

    /// Interface awaiting specification.
    fn perform_readback(&mut self) {
        debug!("readback requested; not implemented yet");
    }

    /// Interface awaiting specification.
    fn perform_readback_image(&mut self) {
        debug!("image readback requested; not implemented yet");
    }

    fn bind_framebuffer_as_render_target(&mut self, framebuffer: Option<&Rc<RefCell<Framebuffer>>>) {
        match framebuffer {
            Some(framebuffer) => {
                let (width, height, handle) = {
                    let fb = framebuffer.borrow();
                    (fb.width, fb.height, fb.handle)
                };
                self.cur_fb_width = width;
                self.cur_fb_height = height;
                // Without separate draw/read targets this collides with
                // bind-for-read, but ES 2.0 has nothing to separate anyway.
                self.bind_fb_target(false, handle);
            }
            None => {
                self.cur_fb_width = self.target_width;
                self.cur_fb_height = self.target_height;
                self.fbo_unbind();
                // Backbuffer is now bound.
            }
        }
    }

    fn bind_fb_target(&mut self, read: bool, handle: GlHandle) {
        let supports_blit = self.caps.supports_framebuffer_blit();
        let (target, cached) = if supports_blit && read {
            (glow::READ_FRAMEBUFFER, self.current_read_handle)
        } else if supports_blit {
            (glow::DRAW_FRAMEBUFFER, self.current_draw_handle)
        } else {
            (glow::FRAMEBUFFER, self.current_draw_handle)
        };

        if cached == handle {
            self.stats.framebuffer_binds_elided += 1;
            return;
        }

        match self.caps.fbo_dialect() {
            FboDialect::ArbCore => self.gl.bind_framebuffer(target, handle),
            FboDialect::Ext => self.gl.bind_framebuffer_ext(target, handle),
        }

        if supports_blit && read {
            self.current_read_handle = handle;
        } else {
            self.current_draw_handle = handle;
        }
    }

    fn fbo_unbind(&mut self) {
        let default_fbo = DEFAULT_FBO.load(Ordering::Relaxed);
        if self.caps.arb_framebuffer_object || self.caps.is_gles {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, default_fbo);
        } else if self.caps.ext_framebuffer_object {
            self.gl.bind_framebuffer_ext(glow::FRAMEBUFFER, default_fbo);
        }
        self.current_draw_handle = 0;
        self.current_read_handle = 0;
    }
}

/// Expands a packed RGBA byte quad (R in the low byte) to normalized floats.
fn unpack_rgba8(color: u32) -> [f32; 4] {
    [
        (color & 0xFF) as f32 / 255.0,
        ((color >> 8) & 0xFF) as f32 / 255.0,
        ((color >> 16) & 0xFF) as f32 / 255.0,
        ((color >> 24) & 0xFF) as f32 / 255.0,
    ]
}
