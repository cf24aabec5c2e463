use criterion::{black_box, criterion_group, criterion_main, Criterion};

use retained_gl::backend::RecordingBackend;
use retained_gl::{Buffer, GlCapabilities, QueueRunner, RenderCmd, Step};

fn desktop_caps() -> GlCapabilities {
    GlCapabilities {
        version: (3, 3, 0),
        arb_framebuffer_object: true,
        arb_copy_image: true,
        supports_dual_source_blend: true,
        ..GlCapabilities::default()
    }
}

fn bench_redundant_binds(c: &mut Criterion) {
    c.bench_function("render_pass_1k_redundant_binds", |b| {
        b.iter(|| {
            let mut runner =
                QueueRunner::new(RecordingBackend::new(desktop_caps()), 1280, 720);
            let buffer = Buffer::new(glow::ARRAY_BUFFER);
            buffer.borrow_mut().handle = 1;

            let mut commands = Vec::with_capacity(2048);
            for i in 0..1024 {
                commands.push(RenderCmd::BindBuffer {
                    target: glow::ARRAY_BUFFER,
                    buffer: Some(buffer.clone()),
                });
                commands.push(RenderCmd::Draw {
                    mode: glow::TRIANGLES,
                    first: i * 3,
                    count: 3,
                });
            }

            runner.run_steps(vec![Step::Render {
                framebuffer: None,
                commands,
            }]);
            black_box(runner.stats());
        })
    });
}

criterion_group!(benches, bench_redundant_binds);
criterion_main!(benches);
