//! Benchmarks for the particle field frame.
//!
//! Performance budget: one full-tier frame (50 particles, O(n²) connector
//! pass) well under 1ms so it never competes with page work.
//!
//! Run with: cargo bench -p curtain-particles --bench field_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use curtain_core::capability::CapabilityProfileBuilder;
use curtain_core::{DeviceCapabilityProfile, Scheduler, Viewport};
use curtain_particles::{Palette, ParticleField, RecordingSurface};

const VIEWPORTS: &[(f32, f32, &str)] = &[
    (1280.0, 720.0, "1280x720"),
    (1920.0, 1080.0, "1920x1080"),
    (390.0, 844.0, "390x844"),
];

fn profiles() -> Vec<(&'static str, DeviceCapabilityProfile)> {
    vec![
        ("full", DeviceCapabilityProfile::desktop()),
        ("compact", DeviceCapabilityProfile::mobile()),
        ("reduced", CapabilityProfileBuilder::new().low_end(true).build()),
    ]
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("particles/frame");

    for (tier, profile) in profiles() {
        for &(w, h, name) in VIEWPORTS {
            let count = profile.particle_tier().particle_count();
            group.throughput(Throughput::Elements(count as u64));
            group.bench_with_input(BenchmarkId::new(tier, name), &(w, h), |b, &(w, h)| {
                let mut sched = Scheduler::new();
                let mut field =
                    ParticleField::new(Some(RecordingSurface::new()), Palette::default());
                field.mount(&profile, Viewport::new(w, h), &mut sched);
                let mut now = Duration::ZERO;

                b.iter(|| {
                    now += Duration::from_millis(16);
                    for wakeup in sched.advance_to(now) {
                        field.on_frame(&wakeup, &mut sched);
                    }
                    if let Some(surface) = field.surface_mut() {
                        black_box(surface.take_ops());
                    }
                });
            });
        }
    }

    group.finish();
}

fn bench_reseed(c: &mut Criterion) {
    let mut group = c.benchmark_group("particles/reseed");
    group.bench_function("full_1920x1080", |b| {
        let mut sched = Scheduler::new();
        let mut field = ParticleField::new(Some(RecordingSurface::new()), Palette::default());
        field.mount(&DeviceCapabilityProfile::desktop(), Viewport::new(1920.0, 1080.0), &mut sched);
        let mut wide = false;
        b.iter(|| {
            wide = !wide;
            let w = if wide { 1921.0 } else { 1920.0 };
            field.resize(black_box(Viewport::new(w, 1080.0)));
        });
    });
    group.finish();
}

criterion_group!(benches, bench_frame, bench_reseed);
criterion_main!(benches);
