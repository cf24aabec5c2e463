//! Resource records shared between the producer and the executor.
//!
//! Records hold driver names by value and carry no release-on-drop behavior;
//! lifecycle is driven entirely by step submission. The one exception is
//! [`Framebuffer::destroy`], which issues the cleanup calls matching the
//! entry-point dialect recorded at creation.
//!
//! Everything here is single-threaded: steps share records with the producer
//! through `Rc<RefCell<_>>`, and uniform location slots through
//! `Rc<Cell<i32>>`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::Ordering;

use crate::caps::FboDialect;
use crate::hal::{GlBackend, GlEnum, GlHandle};
use crate::runner::DEFAULT_FBO;

/// Vertex attribute indices live in `[0, VERTEX_ATTRIB_SLOTS)`.
pub const VERTEX_ATTRIB_SLOTS: u32 = 7;

/// GPU texture object. The handle is populated by `CreateTexture` (or
/// handed out of the runner's name pool); upload and sampler fields track
/// the last state applied while the record was bound.
#[derive(Debug)]
pub struct Texture {
    pub handle: GlHandle,
    pub target: GlEnum,
    pub level: i32,
    pub internal_format: i32,
    pub format: GlEnum,
    pub ty: GlEnum,
    pub width: i32,
    pub height: i32,
    pub wrap_s: GlEnum,
    pub wrap_t: GlEnum,
    pub mag_filter: GlEnum,
    pub min_filter: GlEnum,
    pub min_lod: f32,
    pub max_lod: f32,
    pub lod_bias: f32,
    pub anisotropy: f32,
}

impl Texture {
    pub fn new(target: GlEnum) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            handle: 0,
            target,
            level: 0,
            internal_format: 0,
            format: 0,
            ty: 0,
            width: 0,
            height: 0,
            // GL defaults until a step overrides them.
            wrap_s: glow::REPEAT,
            wrap_t: glow::REPEAT,
            mag_filter: glow::LINEAR,
            min_filter: glow::NEAREST_MIPMAP_LINEAR,
            min_lod: -1000.0,
            max_lod: 1000.0,
            lod_bias: 0.0,
            anisotropy: 1.0,
        }))
    }
}

/// GPU buffer object.
#[derive(Debug)]
pub struct Buffer {
    pub handle: GlHandle,
    /// Default binding target declared by the producer.
    pub target: GlEnum,
    pub size: usize,
    pub usage: GlEnum,
}

impl Buffer {
    pub fn new(target: GlEnum) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            handle: 0,
            target,
            size: 0,
            usage: 0,
        }))
    }
}

/// Compiled shader stage.
#[derive(Debug)]
pub struct Shader {
    pub handle: GlHandle,
    pub stage: GlEnum,
    pub valid: bool,
}

impl Shader {
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            handle: 0,
            stage: 0,
            valid: false,
        }))
    }
}

/// Fixed attribute location for a named vertex input.
#[derive(Clone, Copy, Debug)]
pub struct SemanticBinding {
    pub location: u32,
    pub name: &'static str,
}

/// Uniform location query resolved after a successful link. The destination
/// slot is shared with the producer, which reads it when recording uniform
/// commands.
#[derive(Clone, Debug)]
pub struct UniformQuery {
    pub name: &'static str,
    pub dest: Rc<Cell<i32>>,
}

/// Integer uniform written right after link (sampler bindings). Slots that
/// resolved to `-1` are skipped.
#[derive(Clone, Debug)]
pub struct UniformInitializer {
    pub slot: Rc<Cell<i32>>,
    pub value: i32,
}

/// Linked program plus its uniform bookkeeping.
#[derive(Debug)]
pub struct Program {
    pub handle: GlHandle,
    pub semantics: Vec<SemanticBinding>,
    pub queries: Vec<UniformQuery>,
    pub initializers: Vec<UniformInitializer>,
    pub support_dual_source: bool,
    pub(crate) uniform_cache: HashMap<&'static str, i32>,
}

impl Program {
    pub fn new(
        semantics: Vec<SemanticBinding>,
        queries: Vec<UniformQuery>,
        initializers: Vec<UniformInitializer>,
        support_dual_source: bool,
    ) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            handle: 0,
            semantics,
            queries,
            initializers,
            support_dual_source,
            uniform_cache: HashMap::new(),
        }))
    }
}

/// One vertex attribute of an [`InputLayout`].
#[derive(Clone, Copy, Debug)]
pub struct InputLayoutEntry {
    pub location: u32,
    pub count: i32,
    pub ty: GlEnum,
    pub normalized: bool,
    pub stride: i32,
    pub offset: usize,
}

/// Vertex attribute layout. No GPU object backs it; all binding work happens
/// per draw through attribute pointer calls against the global VAO.
#[derive(Clone, Debug)]
pub struct InputLayout {
    pub entries: Vec<InputLayoutEntry>,
    pub semantics_mask: u32,
}

impl InputLayout {
    /// The enabled-attribute mask is derived from the entries, so it always
    /// equals the set of entry locations.
    pub fn new(entries: Vec<InputLayoutEntry>) -> Rc<Self> {
        let mut semantics_mask = 0u32;
        for entry in &entries {
            debug_assert!(entry.location < VERTEX_ATTRIB_SLOTS);
            semantics_mask |= 1 << entry.location;
        }
        Rc::new(Self {
            entries,
            semantics_mask,
        })
    }
}

/// Color plus depth/stencil render target.
///
/// Exactly one depth/stencil configuration is populated: either the packed
/// `z_stencil_buffer`, or the separate `z_buffer`/`stencil_buffer` pair.
#[derive(Debug)]
pub struct Framebuffer {
    pub handle: GlHandle,
    pub color_texture: GlHandle,
    pub z_stencil_buffer: GlHandle,
    pub z_buffer: GlHandle,
    pub stencil_buffer: GlHandle,
    pub width: i32,
    pub height: i32,
    pub(crate) dialect: FboDialect,
}

impl Framebuffer {
    pub fn new(width: i32, height: i32) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            handle: 0,
            color_texture: 0,
            z_stencil_buffer: 0,
            z_buffer: 0,
            stencil_buffer: 0,
            width,
            height,
            dialect: FboDialect::ArbCore,
        }))
    }

    /// Release the GPU objects using the entry-point dialect used at
    /// creation. Detaches color and depth, rebinds the host default
    /// framebuffer, then deletes the FBO, the renderbuffers, and the color
    /// texture. Safe to call more than once.
    pub fn destroy(&mut self, gl: &mut impl GlBackend) {
        let default_fbo = DEFAULT_FBO.load(Ordering::Relaxed);
        match self.dialect {
            FboDialect::ArbCore => {
                if self.handle != 0 {
                    gl.bind_framebuffer(glow::FRAMEBUFFER, self.handle);
                    gl.framebuffer_texture_2d(
                        glow::FRAMEBUFFER,
                        glow::COLOR_ATTACHMENT0,
                        glow::TEXTURE_2D,
                        0,
                        0,
                    );
                    gl.framebuffer_renderbuffer(
                        glow::FRAMEBUFFER,
                        glow::DEPTH_ATTACHMENT,
                        glow::RENDERBUFFER,
                        0,
                    );
                    gl.bind_framebuffer(glow::FRAMEBUFFER, default_fbo);
                    gl.delete_framebuffer(self.handle);
                }
            }
            FboDialect::Ext => {
                if self.handle != 0 {
                    gl.bind_framebuffer_ext(glow::FRAMEBUFFER, self.handle);
                    gl.framebuffer_texture_2d_ext(
                        glow::FRAMEBUFFER,
                        glow::COLOR_ATTACHMENT0,
                        glow::TEXTURE_2D,
                        0,
                        0,
                    );
                    gl.framebuffer_renderbuffer_ext(
                        glow::FRAMEBUFFER,
                        glow::DEPTH_ATTACHMENT,
                        glow::RENDERBUFFER,
                        0,
                    );
                    gl.bind_framebuffer_ext(glow::FRAMEBUFFER, default_fbo);
                    gl.delete_framebuffer_ext(self.handle);
                }
            }
        }
        if self.z_stencil_buffer != 0 {
            gl.delete_renderbuffer(self.z_stencil_buffer);
        }
        if self.z_buffer != 0 {
            gl.delete_renderbuffer(self.z_buffer);
        }
        if self.stencil_buffer != 0 {
            gl.delete_renderbuffer(self.stencil_buffer);
        }
        if self.color_texture != 0 {
            gl.delete_textures(&[self.color_texture]);
        }
        self.handle = 0;
        self.z_stencil_buffer = 0;
        self.z_buffer = 0;
        self.stencil_buffer = 0;
        self.color_texture = 0;
    }
}
