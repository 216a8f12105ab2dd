//! Property checks for particle motion and connector rendering.

use std::time::Duration;

use curtain_core::{DeviceCapabilityProfile, Point, Scheduler, Velocity, Viewport};
use curtain_particles::{
    DrawOp, MAX_LINK_OPACITY, PROXIMITY_RADIUS, Palette, Particle, ParticleField,
    RecordingSurface, connection_opacity,
};
use proptest::prelude::*;

fn viewport() -> impl Strategy<Value = Viewport> {
    (1.0f32..2560.0, 1.0f32..1600.0).prop_map(|(w, h)| Viewport::new(w, h))
}

proptest! {
    #[test]
    fn wrapped_positions_stay_inside(
        vp in viewport(),
        x in -5000.0f32..5000.0,
        y in -5000.0f32..5000.0,
        dx in -0.25f32..0.25,
        dy in -0.25f32..0.25,
    ) {
        let mut p = Particle {
            position: Point::new(x, y),
            velocity: Velocity::new(dx, dy),
            radius: 1.0,
        };
        for _ in 0..8 {
            p.advance(vp);
            prop_assert!(vp.contains(p.position), "{:?} outside {:?}", p.position, vp);
        }
    }

    #[test]
    fn connector_opacity_is_bounded_and_decreasing(a in 0.0f32..300.0, b in 0.0f32..300.0) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        match (connection_opacity(near), connection_opacity(far)) {
            (Some(on), Some(of)) => {
                prop_assert!(on >= of);
                prop_assert!(of > 0.0 && on <= MAX_LINK_OPACITY);
            }
            (Some(_), None) => prop_assert!(far >= PROXIMITY_RADIUS),
            (None, None) => prop_assert!(near >= PROXIMITY_RADIUS),
            (None, Some(_)) => prop_assert!(false, "farther pair connected"),
        }
    }

    #[test]
    fn running_field_never_exceeds_tier_cap(seed in any::<u64>(), vp in viewport(), frames in 1usize..20) {
        let mut sched = Scheduler::new();
        let mut field = ParticleField::new(Some(RecordingSurface::new()), Palette::default())
            .with_seed(seed);
        field.mount(&DeviceCapabilityProfile::desktop(), vp, &mut sched);
        for i in 1..=frames {
            for w in sched.advance_to(Duration::from_millis(16 * i as u64)) {
                field.on_frame(&w, &mut sched);
            }
        }
        prop_assert!(field.particles().len() <= 50);
        let surface = field.surface().expect("surface");
        let circles = surface
            .last_frame()
            .iter()
            .filter(|op| matches!(op, DrawOp::Circle { .. }))
            .count();
        prop_assert_eq!(circles, field.particles().len());
        prop_assert_eq!(surface.frames(), frames);
    }
}

#[test]
fn two_particles_in_range_get_exactly_one_line() {
    let profile = curtain_core::capability::CapabilityProfileBuilder::new()
        .low_end(true)
        .build();
    let mut sched = Scheduler::new();
    let mut field = ParticleField::new(Some(RecordingSurface::new()), Palette::default());
    field.mount(&profile, Viewport::new(100.0, 100.0), &mut sched);
    for w in sched.advance_to(Duration::from_millis(16)) {
        field.on_frame(&w, &mut sched);
    }
    // Every pair in a 100x100 box is closer than the proximity radius.
    let n = field.particles().len();
    let lines = field
        .surface()
        .map(|s| {
            s.last_frame()
                .iter()
                .filter(|op| matches!(op, DrawOp::Line { .. }))
                .count()
        })
        .unwrap_or_default();
    assert_eq!(n, 20);
    assert_eq!(lines, n * (n - 1) / 2);
}
