use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use prism_demo::driver::FramePacer;
use prism_demo::geometry::{create_torus, TorusParams};
use prism_demo::gradient::radial_gradient;
use prism_demo::overlay::{fill_vertices, OverlayRect};
use prism_demo::render::{RecordingBackend, Viewport};
use prism_demo::{DriverConfig, Scene, SceneDriver};

/// Deterministic point cloud on a lumpy sphere
fn point_cloud(count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let t = i as f32 * 0.618_034;
            let theta = t * std::f32::consts::TAU;
            let z = 1.0 - 2.0 * (i as f32 + 0.5) / count as f32;
            let r = (1.0 - z * z).sqrt() * (1.0 + 0.1 * (t * 7.0).sin());
            Vec3::new(r * theta.cos(), r * theta.sin(), z)
        })
        .collect()
}

fn bench_torus_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("torus_generation");

    for divisions in [30usize, 120, 480].iter() {
        group.bench_with_input(BenchmarkId::new("divisions", divisions), divisions, |b, &n| {
            b.iter(|| {
                create_torus(black_box(TorusParams {
                    segments: n,
                    rings: n,
                    ..TorusParams::default()
                }))
            });
        });
    }

    group.finish();
}

fn bench_radial_gradient(c: &mut Criterion) {
    let mut group = c.benchmark_group("radial_gradient");

    for count in [3_000usize, 30_000, 300_000].iter() {
        let points = point_cloud(*count);
        group.bench_with_input(BenchmarkId::new("vertices", count), count, |b, _| {
            b.iter(|| radial_gradient(black_box(&points)));
        });
    }

    group.finish();
}

fn bench_overlay_fill(c: &mut Criterion) {
    let rect = OverlayRect::band(1920.0, 0.0, 0.9, 50.0, 0.25);
    c.bench_function("overlay_fill_1080p", |b| {
        b.iter(|| fill_vertices(black_box(&rect)));
    });
}

fn bench_headless_frames(c: &mut Criterion) {
    c.bench_function("torus_100_frames", |b| {
        b.iter(|| {
            let scene = Scene::wireframe("torus", create_torus(TorusParams::default()));
            let mut driver = SceneDriver::new(scene, DriverConfig::default());
            let mut backend = RecordingBackend::new(Viewport::new(800, 600)).close_after(100);
            driver
                .run(&mut backend, &mut FramePacer::unpaced())
                .unwrap();
            black_box(driver.animation())
        });
    });
}

criterion_group!(
    benches,
    bench_torus_generation,
    bench_radial_gradient,
    bench_overlay_fill,
    bench_headless_frames
);
criterion_main!(benches);
