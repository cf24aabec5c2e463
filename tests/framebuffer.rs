//! Framebuffer lifecycle: feature-branched construction, the draw/read
//! binding cache, unbind to the host default FBO, and copy dispatch.

mod common;

use std::sync::atomic::Ordering;

use retained_gl::backend::GlCall;
use retained_gl::{hal, Framebuffer, InitStep, Offset2D, Rect2D, RenderCmd, Step, DEFAULT_FBO};

use common::{
    desktop_core_caps, gles2_packed_caps, gles2_separate_caps, gles3_caps, legacy_ext_caps, runner,
};

#[test]
fn desktop_framebuffer_uses_packed_depth_stencil() {
    let mut runner = runner(desktop_core_caps());
    let framebuffer = Framebuffer::new(512, 272);

    runner.run_init_steps(vec![InitStep::CreateFramebuffer {
        framebuffer: framebuffer.clone(),
    }]);

    let fb = framebuffer.borrow();
    assert_ne!(fb.handle, 0);
    assert_ne!(fb.z_stencil_buffer, 0);
    assert_eq!(fb.z_buffer, 0);
    assert_eq!(fb.stencil_buffer, 0);

    let calls = runner.backend_mut().take_calls();
    assert!(calls.contains(&GlCall::RenderbufferStorage {
        target: glow::RENDERBUFFER,
        internal_format: glow::DEPTH24_STENCIL8,
        width: 512,
        height: 272,
    }));
    // The packed renderbuffer backs both attachments.
    for attachment in [glow::DEPTH_ATTACHMENT, glow::STENCIL_ATTACHMENT] {
        assert!(calls.contains(&GlCall::FramebufferRenderbuffer {
            target: glow::FRAMEBUFFER,
            attachment,
            rb_target: glow::RENDERBUFFER,
            renderbuffer: fb.z_stencil_buffer,
        }));
    }
    // Scratch bindings are cleared afterwards.
    assert!(calls.contains(&GlCall::BindRenderbuffer {
        target: glow::RENDERBUFFER,
        renderbuffer: 0,
    }));
    assert!(calls.contains(&GlCall::BindTexture {
        target: glow::TEXTURE_2D,
        texture: 0,
    }));
}

#[test]
fn gles_framebuffer_prefers_the_packed_extension() {
    let mut runner = runner(gles2_packed_caps());
    let framebuffer = Framebuffer::new(480, 272);

    runner.run_init_steps(vec![InitStep::CreateFramebuffer {
        framebuffer: framebuffer.clone(),
    }]);

    let fb = framebuffer.borrow();
    assert_ne!(fb.z_stencil_buffer, 0);
    assert_eq!(fb.z_buffer, 0);
    assert_eq!(fb.stencil_buffer, 0);

    let calls = runner.backend_mut().take_calls();
    assert!(calls.contains(&GlCall::RenderbufferStorage {
        target: glow::RENDERBUFFER,
        internal_format: hal::DEPTH24_STENCIL8_OES,
        width: 480,
        height: 272,
    }));
}

#[test]
fn gles_without_packed_depth_stencil_splits_the_attachments() {
    for (oes_depth24, depth_format) in
        [(true, glow::DEPTH_COMPONENT24), (false, glow::DEPTH_COMPONENT16)]
    {
        let mut runner = runner(gles2_separate_caps(oes_depth24));
        let framebuffer = Framebuffer::new(480, 272);

        runner.run_init_steps(vec![InitStep::CreateFramebuffer {
            framebuffer: framebuffer.clone(),
        }]);

        let fb = framebuffer.borrow();
        assert_eq!(fb.z_stencil_buffer, 0);
        assert_ne!(fb.z_buffer, 0);
        assert_ne!(fb.stencil_buffer, 0);

        let calls = runner.backend_mut().take_calls();
        assert!(calls.contains(&GlCall::RenderbufferStorage {
            target: glow::RENDERBUFFER,
            internal_format: depth_format,
            width: 480,
            height: 272,
        }));
        assert!(calls.contains(&GlCall::RenderbufferStorage {
            target: glow::RENDERBUFFER,
            internal_format: glow::STENCIL_INDEX8,
            width: 480,
            height: 272,
        }));
        assert!(calls.contains(&GlCall::FramebufferRenderbuffer {
            target: glow::FRAMEBUFFER,
            attachment: glow::DEPTH_ATTACHMENT,
            rb_target: glow::RENDERBUFFER,
            renderbuffer: fb.z_buffer,
        }));
        assert!(calls.contains(&GlCall::FramebufferRenderbuffer {
            target: glow::FRAMEBUFFER,
            attachment: glow::STENCIL_ATTACHMENT,
            rb_target: glow::RENDERBUFFER,
            renderbuffer: fb.stencil_buffer,
        }));
    }
}

#[test]
fn legacy_desktop_builds_through_the_ext_entry_points() {
    let mut runner = runner(legacy_ext_caps());
    let framebuffer = Framebuffer::new(512, 272);

    runner.run_init_steps(vec![InitStep::CreateFramebuffer {
        framebuffer: framebuffer.clone(),
    }]);

    let fb = framebuffer.borrow();
    assert_ne!(fb.handle, 0);
    assert_ne!(fb.z_stencil_buffer, 0);

    let calls = runner.backend_mut().take_calls();
    assert!(calls
        .iter()
        .any(|c| matches!(c, GlCall::GenFramebufferExt { .. })));
    assert!(calls.contains(&GlCall::RenderbufferStorageExt {
        target: glow::RENDERBUFFER,
        internal_format: hal::DEPTH_STENCIL_EXT,
        width: 512,
        height: 272,
    }));
    assert!(calls.contains(&GlCall::CheckFramebufferStatusExt {
        target: glow::FRAMEBUFFER,
    }));
    assert!(!calls
        .iter()
        .any(|c| matches!(c, GlCall::GenFramebuffer { .. } | GlCall::BindFramebuffer { .. })));
}

#[test]
fn incomplete_framebuffers_are_retained() {
    let mut runner = runner(desktop_core_caps());
    runner
        .backend_mut()
        .set_framebuffer_status(glow::FRAMEBUFFER_UNSUPPORTED);
    let framebuffer = Framebuffer::new(512, 272);

    runner.run_init_steps(vec![InitStep::CreateFramebuffer {
        framebuffer: framebuffer.clone(),
    }]);

    // Logged, not fatal; the framebuffer keeps its objects.
    assert_ne!(framebuffer.borrow().handle, 0);
}

#[test]
fn repeated_render_targets_bind_once() {
    let mut runner = runner(desktop_core_caps());
    let framebuffer = Framebuffer::new(512, 272);
    framebuffer.borrow_mut().handle = 40;

    let pass = |fb: &std::rc::Rc<std::cell::RefCell<Framebuffer>>| Step::Render {
        framebuffer: Some(fb.clone()),
        commands: vec![RenderCmd::Draw {
            mode: glow::TRIANGLES,
            first: 0,
            count: 3,
        }],
    };

    runner.run_steps(vec![pass(&framebuffer), pass(&framebuffer)]);

    let calls = runner.backend_mut().take_calls();
    let binds = calls
        .iter()
        .filter(|c| {
            matches!(
                c,
                GlCall::BindFramebuffer {
                    target: glow::DRAW_FRAMEBUFFER,
                    framebuffer: 40,
                }
            )
        })
        .count();
    assert_eq!(binds, 1);
    assert_eq!(runner.stats().framebuffer_binds_elided, 1);
}

#[test]
fn without_blit_support_the_combined_target_is_used() {
    let mut runner = runner(gles2_packed_caps());
    let framebuffer = Framebuffer::new(512, 272);
    framebuffer.borrow_mut().handle = 41;

    runner.run_steps(vec![Step::Render {
        framebuffer: Some(framebuffer),
        commands: vec![RenderCmd::Draw {
            mode: glow::TRIANGLES,
            first: 0,
            count: 3,
        }],
    }]);

    let calls = runner.backend_mut().take_calls();
    assert!(calls.contains(&GlCall::BindFramebuffer {
        target: glow::FRAMEBUFFER,
        framebuffer: 41,
    }));
    assert!(!calls.iter().any(|c| matches!(
        c,
        GlCall::BindFramebuffer {
            target: glow::DRAW_FRAMEBUFFER,
            ..
        }
    )));
}

#[test]
fn unbinding_targets_the_host_default_framebuffer() {
    let mut runner = runner(desktop_core_caps());
    let framebuffer = Framebuffer::new(512, 272);
    framebuffer.borrow_mut().handle = 42;

    DEFAULT_FBO.store(5, Ordering::Relaxed);
    runner.run_steps(vec![
        Step::Render {
            framebuffer: Some(framebuffer),
            commands: vec![RenderCmd::Draw {
                mode: glow::TRIANGLES,
                first: 0,
                count: 3,
            }],
        },
        Step::Render {
            framebuffer: None,
            commands: vec![RenderCmd::Draw {
                mode: glow::TRIANGLES,
                first: 0,
                count: 3,
            }],
        },
    ]);
    DEFAULT_FBO.store(0, Ordering::Relaxed);

    let calls = runner.backend_mut().take_calls();
    assert!(calls.contains(&GlCall::BindFramebuffer {
        target: glow::FRAMEBUFFER,
        framebuffer: 5,
    }));
}

#[test]
fn copy_dispatch_follows_the_capability_priority() {
    let src = Framebuffer::new(512, 272);
    src.borrow_mut().color_texture = 50;
    let dst = Framebuffer::new(512, 272);
    dst.borrow_mut().color_texture = 51;

    let copy = || Step::Copy {
        src: src.clone(),
        dst: dst.clone(),
        src_rect: Rect2D {
            x: 8,
            y: 16,
            w: 32,
            h: 64,
        },
        dst_pos: Offset2D { x: 1, y: 2 },
        aspect_mask: glow::COLOR_BUFFER_BIT,
    };

    let mut arb = runner(desktop_core_caps());
    arb.run_steps(vec![copy()]);
    assert!(arb
        .backend_mut()
        .take_calls()
        .iter()
        .any(|c| matches!(
            c,
            GlCall::CopyImageSubData {
                src: 50,
                dst: 51,
                src_x: 8,
                src_y: 16,
                dst_x: 1,
                dst_y: 2,
                width: 32,
                height: 64,
                depth: 1,
                ..
            }
        )));

    let mut nv = runner(legacy_ext_caps());
    nv.run_steps(vec![copy()]);
    assert!(nv
        .backend_mut()
        .take_calls()
        .iter()
        .any(|c| matches!(c, GlCall::CopyImageSubDataNv { .. })));

    let mut es = runner(gles3_caps());
    es.run_steps(vec![copy()]);
    assert!(es
        .backend_mut()
        .take_calls()
        .iter()
        .any(|c| matches!(c, GlCall::CopyImageSubDataOes { .. })));
}

#[test]
fn destroy_reuses_the_creation_dialect() {
    let mut arb_runner = runner(desktop_core_caps());
    let framebuffer = Framebuffer::new(512, 272);
    arb_runner.run_init_steps(vec![InitStep::CreateFramebuffer {
        framebuffer: framebuffer.clone(),
    }]);
    arb_runner.backend_mut().clear_calls();

    framebuffer.borrow_mut().destroy(arb_runner.backend_mut());
    let calls = arb_runner.backend_mut().take_calls();
    assert!(calls
        .iter()
        .any(|c| matches!(c, GlCall::DeleteFramebuffer { .. })));
    assert!(calls
        .iter()
        .any(|c| matches!(c, GlCall::DeleteRenderbuffer { .. })));
    assert!(calls
        .iter()
        .any(|c| matches!(c, GlCall::DeleteTextures { .. })));
    assert_eq!(framebuffer.borrow().handle, 0);

    let mut ext_runner = runner(legacy_ext_caps());
    let framebuffer = Framebuffer::new(512, 272);
    ext_runner.run_init_steps(vec![InitStep::CreateFramebuffer {
        framebuffer: framebuffer.clone(),
    }]);
    ext_runner.backend_mut().clear_calls();

    framebuffer.borrow_mut().destroy(ext_runner.backend_mut());
    let calls = ext_runner.backend_mut().take_calls();
    assert!(calls
        .iter()
        .any(|c| matches!(c, GlCall::DeleteFramebufferExt { .. })));
    assert!(!calls
        .iter()
        .any(|c| matches!(c, GlCall::DeleteFramebuffer { .. })));
}
