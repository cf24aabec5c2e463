//! Init-step interpreter: resource construction, shader/program failure
//! policy, and the texture-name pool.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use retained_gl::backend::GlCall;
use retained_gl::{
    Buffer, InitStep, Program, SemanticBinding, Shader, Texture, UniformInitializer, UniformQuery,
};

use common::{desktop_core_caps, gles3_caps, runner};

#[test]
fn create_texture_generates_and_binds() {
    let mut runner = runner(desktop_core_caps());
    let texture = Texture::new(glow::TEXTURE_2D);

    runner.run_init_steps(vec![InitStep::CreateTexture {
        texture: texture.clone(),
    }]);

    let handle = texture.borrow().handle;
    assert_ne!(handle, 0);
    let calls = runner.backend_mut().take_calls();
    assert!(calls.contains(&GlCall::BindTexture {
        target: glow::TEXTURE_2D,
        texture: handle,
    }));
}

#[test]
fn create_buffer_allocates_uninitialized_storage() {
    let mut runner = runner(desktop_core_caps());
    let buffer = Buffer::new(glow::ARRAY_BUFFER);

    runner.run_init_steps(vec![InitStep::CreateBuffer {
        buffer: buffer.clone(),
        size: 4096,
        usage: glow::DYNAMIC_DRAW,
    }]);

    let buf = buffer.borrow();
    assert_ne!(buf.handle, 0);
    assert_eq!(buf.size, 4096);
    assert_eq!(buf.usage, glow::DYNAMIC_DRAW);

    let calls = runner.backend_mut().take_calls();
    assert!(calls.contains(&GlCall::BindBuffer {
        target: glow::ARRAY_BUFFER,
        buffer: buf.handle,
    }));
    assert!(calls.contains(&GlCall::BufferDataSize {
        target: glow::ARRAY_BUFFER,
        size: 4096,
        usage: glow::DYNAMIC_DRAW,
    }));
}

#[test]
fn buffer_subdata_always_targets_the_array_buffer() {
    let mut runner = runner(desktop_core_caps());
    let buffer = Buffer::new(glow::ELEMENT_ARRAY_BUFFER);

    runner.run_init_steps(vec![
        InitStep::CreateBuffer {
            buffer: buffer.clone(),
            size: 64,
            usage: glow::STATIC_DRAW,
        },
        InitStep::BufferSubdata {
            buffer: buffer.clone(),
            offset: 16,
            data: vec![0xAB; 32],
        },
    ]);

    let handle = buffer.borrow().handle;
    let calls = runner.backend_mut().take_calls();
    assert!(calls.contains(&GlCall::BindBuffer {
        target: glow::ARRAY_BUFFER,
        buffer: handle,
    }));
    assert!(calls.contains(&GlCall::BufferSubData {
        target: glow::ARRAY_BUFFER,
        offset: 16,
        len: 32,
    }));
}

#[test]
fn texture_image_uploads_and_suppresses_redundant_binds() {
    let mut runner = runner(desktop_core_caps());
    let texture = Texture::new(glow::TEXTURE_2D);

    runner.run_init_steps(vec![
        InitStep::CreateTexture {
            texture: texture.clone(),
        },
        InitStep::TextureImage {
            texture: texture.clone(),
            level: 0,
            internal_format: glow::RGBA as i32,
            format: glow::RGBA,
            ty: glow::UNSIGNED_BYTE,
            width: 4,
            height: 4,
            linear_filter: true,
            data: vec![0xFF; 64],
        },
        InitStep::TextureImage {
            texture: texture.clone(),
            level: 1,
            internal_format: glow::RGBA as i32,
            format: glow::RGBA,
            ty: glow::UNSIGNED_BYTE,
            width: 2,
            height: 2,
            linear_filter: true,
            data: vec![0xFF; 16],
        },
    ]);

    let calls = runner.backend_mut().take_calls();
    // One bind from CreateTexture; both uploads reuse it.
    let binds = calls
        .iter()
        .filter(|c| matches!(c, GlCall::BindTexture { .. }))
        .count();
    assert_eq!(binds, 1);
    let uploads = calls
        .iter()
        .filter(|c| matches!(c, GlCall::TexImage2D { .. }))
        .count();
    assert_eq!(uploads, 2);

    let tex = texture.borrow();
    assert_eq!((tex.width, tex.height, tex.level), (2, 2, 1));
    assert_eq!(tex.wrap_s, glow::CLAMP_TO_EDGE);
    assert_eq!(tex.mag_filter, glow::LINEAR);
}

#[test]
fn failed_compile_clears_the_handle_but_not_the_flag() {
    let mut runner = runner(desktop_core_caps());
    runner
        .backend_mut()
        .set_compile_result(false, "0:1: syntax error");
    let shader = Shader::new();

    runner.run_init_steps(vec![InitStep::CreateShader {
        shader: shader.clone(),
        stage: glow::FRAGMENT_SHADER,
        source: "void main() {".to_string(),
    }]);

    let sh = shader.borrow();
    assert_eq!(sh.handle, 0);
    // Matches the long-standing behavior: the flag is set even on failure,
    // callers key off the zero handle.
    assert!(sh.valid);

    let calls = runner.backend_mut().take_calls();
    assert!(calls
        .iter()
        .any(|c| matches!(c, GlCall::DeleteShader { .. })));
}

#[test]
fn successful_compile_passes_the_source_through() {
    let mut runner = runner(desktop_core_caps());
    let shader = Shader::new();

    runner.run_init_steps(vec![InitStep::CreateShader {
        shader: shader.clone(),
        stage: glow::VERTEX_SHADER,
        source: "void main() {}".to_string(),
    }]);

    let sh = shader.borrow();
    assert_ne!(sh.handle, 0);
    assert_eq!(sh.stage, glow::VERTEX_SHADER);
    assert!(sh.valid);

    let calls = runner.backend_mut().take_calls();
    assert!(calls.contains(&GlCall::ShaderSource {
        shader: sh.handle,
        source: "void main() {}".to_string(),
    }));
}

fn compiled_shader(
    runner: &mut retained_gl::QueueRunner<retained_gl::backend::RecordingBackend>,
    stage: u32,
) -> Rc<std::cell::RefCell<Shader>> {
    let shader = Shader::new();
    runner.run_init_steps(vec![InitStep::CreateShader {
        shader: shader.clone(),
        stage,
        source: "void main() {}".to_string(),
    }]);
    shader
}

#[test]
fn program_link_binds_semantics_then_resolves_uniforms() {
    let mut runner = runner(desktop_core_caps());
    let vs = compiled_shader(&mut runner, glow::VERTEX_SHADER);
    let fs = compiled_shader(&mut runner, glow::FRAGMENT_SHADER);
    runner.backend_mut().clear_calls();

    let tex_loc = Rc::new(Cell::new(-1));
    let program = Program::new(
        vec![
            SemanticBinding {
                location: 0,
                name: "a_position",
            },
            SemanticBinding {
                location: 1,
                name: "a_texcoord",
            },
        ],
        vec![UniformQuery {
            name: "u_tex",
            dest: tex_loc.clone(),
        }],
        vec![UniformInitializer {
            slot: tex_loc.clone(),
            value: 0,
        }],
        false,
    );

    runner.run_init_steps(vec![InitStep::CreateProgram {
        program: program.clone(),
        shaders: vec![vs, fs],
    }]);

    let handle = program.borrow().handle;
    assert_ne!(handle, 0);
    assert_eq!(tex_loc.get(), 0);

    let calls = runner.backend_mut().take_calls();
    assert!(calls.contains(&GlCall::BindAttribLocation {
        program: handle,
        location: 0,
        name: "a_position".to_string(),
    }));
    assert!(calls.contains(&GlCall::BindAttribLocation {
        program: handle,
        location: 1,
        name: "a_texcoord".to_string(),
    }));
    assert!(calls.contains(&GlCall::UseProgram { program: handle }));
    // The sampler initializer ran against the resolved slot.
    assert!(calls.contains(&GlCall::Uniform1I { location: 0, x: 0 }));
}

#[test]
fn dual_source_binds_both_indexed_outputs_on_desktop() {
    let mut runner = runner(desktop_core_caps());
    let vs = compiled_shader(&mut runner, glow::VERTEX_SHADER);
    let fs = compiled_shader(&mut runner, glow::FRAGMENT_SHADER);
    runner.backend_mut().clear_calls();

    let program = Program::new(vec![], vec![], vec![], true);
    runner.run_init_steps(vec![InitStep::CreateProgram {
        program: program.clone(),
        shaders: vec![vs, fs],
    }]);

    let handle = program.borrow().handle;
    let calls = runner.backend_mut().take_calls();
    assert!(calls.contains(&GlCall::BindFragDataLocationIndexed {
        program: handle,
        color: 0,
        index: 0,
        name: "fragColor0".to_string(),
    }));
    assert!(calls.contains(&GlCall::BindFragDataLocationIndexed {
        program: handle,
        color: 0,
        index: 1,
        name: "fragColor1".to_string(),
    }));
}

#[test]
fn single_source_binds_only_the_first_output_on_desktop() {
    let mut runner = runner(desktop_core_caps());
    let vs = compiled_shader(&mut runner, glow::VERTEX_SHADER);
    let fs = compiled_shader(&mut runner, glow::FRAGMENT_SHADER);
    runner.backend_mut().clear_calls();

    let program = Program::new(vec![], vec![], vec![], false);
    runner.run_init_steps(vec![InitStep::CreateProgram {
        program: program.clone(),
        shaders: vec![vs, fs],
    }]);

    let handle = program.borrow().handle;
    let calls = runner.backend_mut().take_calls();
    assert!(calls.contains(&GlCall::BindFragDataLocation {
        program: handle,
        color: 0,
        name: "fragColor0".to_string(),
    }));
    assert!(!calls
        .iter()
        .any(|c| matches!(c, GlCall::BindFragDataLocationIndexed { .. })));
}

#[test]
fn es3_dual_source_uses_the_ext_entry_points() {
    let mut runner = runner(gles3_caps());
    let vs = compiled_shader(&mut runner, glow::VERTEX_SHADER);
    let fs = compiled_shader(&mut runner, glow::FRAGMENT_SHADER);
    runner.backend_mut().clear_calls();

    let program = Program::new(vec![], vec![], vec![], true);
    runner.run_init_steps(vec![InitStep::CreateProgram {
        program,
        shaders: vec![vs, fs],
    }]);

    let calls = runner.backend_mut().take_calls();
    let ext_binds = calls
        .iter()
        .filter(|c| matches!(c, GlCall::BindFragDataLocationIndexedExt { .. }))
        .count();
    assert_eq!(ext_binds, 2);
    assert!(!calls
        .iter()
        .any(|c| matches!(c, GlCall::BindFragDataLocationIndexed { .. })));
}

#[test]
fn link_failure_leaves_the_program_unused() {
    let mut runner = runner(desktop_core_caps());
    let vs = compiled_shader(&mut runner, glow::VERTEX_SHADER);
    let fs = compiled_shader(&mut runner, glow::FRAGMENT_SHADER);
    runner.backend_mut().set_link_result(false, "link failed");
    runner.backend_mut().clear_calls();

    let dest = Rc::new(Cell::new(-1));
    let program = Program::new(
        vec![],
        vec![UniformQuery {
            name: "u_tex",
            dest: dest.clone(),
        }],
        vec![],
        false,
    );
    runner.run_init_steps(vec![InitStep::CreateProgram {
        program,
        shaders: vec![vs, fs],
    }]);

    assert_eq!(dest.get(), -1);
    let calls = runner.backend_mut().take_calls();
    assert!(!calls.iter().any(|c| matches!(c, GlCall::UseProgram { .. })));
    assert!(!calls
        .iter()
        .any(|c| matches!(c, GlCall::GetUniformLocation { .. })));
}

#[test]
fn initializer_skips_slots_that_did_not_resolve() {
    let mut runner = runner(desktop_core_caps());
    let vs = compiled_shader(&mut runner, glow::VERTEX_SHADER);
    let fs = compiled_shader(&mut runner, glow::FRAGMENT_SHADER);
    runner.backend_mut().set_uniform_location("u_gone", -1);
    runner.backend_mut().clear_calls();

    let dest = Rc::new(Cell::new(-1));
    let program = Program::new(
        vec![],
        vec![UniformQuery {
            name: "u_gone",
            dest: dest.clone(),
        }],
        vec![UniformInitializer {
            slot: dest.clone(),
            value: 3,
        }],
        false,
    );
    runner.run_init_steps(vec![InitStep::CreateProgram {
        program,
        shaders: vec![vs, fs],
    }]);

    assert_eq!(dest.get(), -1);
    let calls = runner.backend_mut().take_calls();
    assert!(!calls.iter().any(|c| matches!(c, GlCall::Uniform1I { .. })));
}

#[test]
fn texture_name_pool_refills_in_batches_of_sixteen() {
    let mut runner = runner(desktop_core_caps());

    let mut names = Vec::new();
    for _ in 0..17 {
        names.push(runner.alloc_texture_name());
    }
    assert_eq!(names.len(), 17);
    assert!(names.iter().all(|&n| n != 0));

    let calls = runner.backend_mut().take_calls();
    let batches: Vec<usize> = calls
        .iter()
        .filter_map(|c| match c {
            GlCall::GenTextures { names } => Some(names.len()),
            _ => None,
        })
        .collect();
    // The first alloc fills the pool, the 17th refills it.
    assert_eq!(batches, vec![16, 16]);
}

#[test]
fn device_lifecycle_drains_the_pool_and_releases_the_vao() {
    let mut runner = runner(desktop_core_caps());
    runner.create_device_objects();
    assert_eq!(runner.max_anisotropy(), 16.0);
    let _ = runner.alloc_texture_name();

    runner.backend_mut().clear_calls();
    runner.destroy_device_objects();
    let calls = runner.backend_mut().take_calls();
    assert!(calls
        .iter()
        .any(|c| matches!(c, GlCall::DeleteTextures { names } if names.len() == 15)));
    assert!(calls
        .iter()
        .any(|c| matches!(c, GlCall::DeleteVertexArray { .. })));

    // Destroy is idempotent.
    runner.destroy_device_objects();
    assert!(runner.backend_mut().take_calls().is_empty());

    // And the device can be brought back up.
    runner.create_device_objects();
    let calls = runner.backend_mut().take_calls();
    assert!(calls
        .iter()
        .any(|c| matches!(c, GlCall::GenVertexArray { .. })));
}
