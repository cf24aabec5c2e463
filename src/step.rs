//! Step and command sum types submitted by the producer.
//!
//! Both lists are flat and immutable once submitted: an init list constructs
//! GPU resources, a frame list executes render passes and pixel transfers.
//! Each variant carries only the fields it uses; embedded heap payloads
//! (shader source, texture pixels, buffer subdata) are owned by the step and
//! released when it is consumed, on every exit path.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::hal::GlEnum;
use crate::resources::{Buffer, Framebuffer, InputLayout, Program, Shader, Texture};

/// Rectangle in framebuffer texel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Offset2D {
    pub x: i32,
    pub y: i32,
}

/// Viewport rectangle plus depth range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub min_z: f32,
    pub max_z: f32,
}

/// Resource-construction work, executed strictly in list order because later
/// steps may reference objects created by earlier ones.
#[derive(Debug)]
pub enum InitStep {
    CreateTexture {
        texture: Rc<RefCell<Texture>>,
    },
    CreateBuffer {
        buffer: Rc<RefCell<Buffer>>,
        size: usize,
        usage: GlEnum,
    },
    BufferSubdata {
        buffer: Rc<RefCell<Buffer>>,
        offset: usize,
        data: Vec<u8>,
    },
    CreateShader {
        shader: Rc<RefCell<Shader>>,
        stage: GlEnum,
        source: String,
    },
    CreateProgram {
        program: Rc<RefCell<Program>>,
        shaders: Vec<Rc<RefCell<Shader>>>,
    },
    CreateInputLayout {
        layout: Rc<InputLayout>,
    },
    CreateFramebuffer {
        framebuffer: Rc<RefCell<Framebuffer>>,
    },
    TextureImage {
        texture: Rc<RefCell<Texture>>,
        level: i32,
        internal_format: i32,
        format: GlEnum,
        ty: GlEnum,
        width: i32,
        height: i32,
        linear_filter: bool,
        data: Vec<u8>,
    },
    /// Reserved; executes as a no-op.
    TextureSubdata {
        texture: Rc<RefCell<Texture>>,
        level: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: GlEnum,
        ty: GlEnum,
        data: Vec<u8>,
    },
}

/// One frame-list step.
#[derive(Debug)]
pub enum Step {
    Render {
        /// `None` targets the host default framebuffer.
        framebuffer: Option<Rc<RefCell<Framebuffer>>>,
        commands: Vec<RenderCmd>,
    },
    Copy {
        src: Rc<RefCell<Framebuffer>>,
        dst: Rc<RefCell<Framebuffer>>,
        src_rect: Rect2D,
        dst_pos: Offset2D,
        aspect_mask: u32,
    },
    /// Interface awaiting specification.
    Blit {
        src: Rc<RefCell<Framebuffer>>,
        dst: Rc<RefCell<Framebuffer>>,
        src_rect: Rect2D,
        dst_rect: Rect2D,
        aspect_mask: u32,
        linear_filter: bool,
    },
    /// Interface awaiting specification.
    Readback {
        src: Option<Rc<RefCell<Framebuffer>>>,
        src_rect: Rect2D,
        aspect_mask: u32,
    },
    /// Interface awaiting specification.
    ReadbackImage {
        texture: Rc<RefCell<Texture>>,
        mip_level: i32,
        src_rect: Rect2D,
    },
}

impl Step {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Step::Render { .. } => "render",
            Step::Copy { .. } => "copy",
            Step::Blit { .. } => "blit",
            Step::Readback { .. } => "readback",
            Step::ReadbackImage { .. } => "readback_image",
        }
    }
}

/// One command inside a `Render` step.
///
/// Uniform commands resolve their location in two ways: a shared slot
/// populated at program link time wins when supplied; otherwise the name is
/// looked up through the current program's cached uniform table.
#[derive(Debug)]
pub enum RenderCmd {
    Depth {
        enabled: bool,
        write: bool,
        func: GlEnum,
    },
    Blend {
        enabled: bool,
        func_color: GlEnum,
        func_alpha: GlEnum,
        src_color: GlEnum,
        dst_color: GlEnum,
        src_alpha: GlEnum,
        dst_alpha: GlEnum,
        /// Low four bits select the RGBA write channels.
        mask: u8,
    },
    BlendColor {
        color: [f32; 4],
    },
    Clear {
        clear_mask: u32,
        /// Packed RGBA byte quad, R in the low byte.
        clear_color: u32,
        clear_z: f32,
        clear_stencil: u8,
    },
    Viewport {
        viewport: Viewport,
    },
    Scissor {
        rect: Rect2D,
    },
    UniformF {
        name: Option<&'static str>,
        loc: Option<Rc<Cell<i32>>>,
        /// Component count, 1..=4.
        count: u8,
        values: [f32; 4],
    },
    UniformI {
        name: Option<&'static str>,
        loc: Option<Rc<Cell<i32>>>,
        count: u8,
        values: [i32; 4],
    },
    UniformMatrix {
        name: Option<&'static str>,
        loc: Option<Rc<Cell<i32>>>,
        values: [f32; 16],
    },
    StencilFunc {
        enabled: bool,
        func: GlEnum,
        reference: u8,
        compare_mask: u8,
    },
    StencilOp {
        stencil_fail: GlEnum,
        depth_fail: GlEnum,
        pass: GlEnum,
        write_mask: u8,
    },
    BindTexture {
        slot: u32,
        texture: Option<Rc<RefCell<Texture>>>,
    },
    BindFramebufferTexture {
        slot: u32,
        framebuffer: Rc<RefCell<Framebuffer>>,
        aspect: u32,
    },
    BindProgram {
        program: Rc<RefCell<Program>>,
    },
    BindInputLayout {
        layout: Rc<InputLayout>,
        /// Base byte offset added to each entry's own offset.
        offset: usize,
    },
    BindBuffer {
        target: GlEnum,
        buffer: Option<Rc<RefCell<Buffer>>>,
    },
    /// Builds the mipmap chain of the 2D texture bound to the active unit.
    GenerateMipmaps,
    Draw {
        mode: GlEnum,
        first: i32,
        count: i32,
    },
    DrawIndexed {
        mode: GlEnum,
        count: i32,
        index_type: GlEnum,
        /// Byte offset into the bound element-array buffer.
        offset: usize,
        /// Draws with `instances != 1` are reserved and skipped.
        instances: i32,
    },
    TextureSampler {
        wrap_s: GlEnum,
        wrap_t: GlEnum,
        mag_filter: GlEnum,
        min_filter: GlEnum,
        /// `0.0` leaves anisotropy untouched.
        anisotropy: f32,
    },
    TextureLod {
        min_lod: f32,
        max_lod: f32,
        /// Ignored on ES, which has no LOD bias parameter.
        lod_bias: f32,
    },
    Raster {
        cull_enable: bool,
        front_face: GlEnum,
        cull_face: GlEnum,
        dither_enable: bool,
    },
}
