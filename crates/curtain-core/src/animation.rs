#![forbid(unsafe_code)]

//! Opacity transitions driven by host frame deltas.
//!
//! Everything here is presentation-only: a [`Fade`] never decides when the
//! boot sequence advances, it only tells the host how opaque an overlay,
//! phrase or content layer should be right now.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Constant velocity.
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// CSS-style `cubic-bezier(x1, y1, x2, y2)` timing curve.
///
/// Endpoints are fixed at (0, 0) and (1, 1). `x1`/`x2` are clamped to [0, 1]
/// so the curve stays a function of time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezier {
    /// Create a timing curve from its two control points.
    #[must_use]
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    fn component(p1: f32, p2: f32, s: f32) -> f32 {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    }

    fn slope(p1: f32, p2: f32, s: f32) -> f32 {
        let inv = 1.0 - s;
        3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
    }

    /// Evaluate the curve at time `t` in [0, 1].
    #[must_use]
    pub fn eval(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }

        // Newton iterations on x(s) = t, bisection fallback for flat slopes.
        let mut s = t;
        for _ in 0..8 {
            let err = Self::component(self.x1, self.x2, s) - t;
            if err.abs() < 1e-5 {
                return Self::component(self.y1, self.y2, s);
            }
            let d = Self::slope(self.x1, self.x2, s);
            if d.abs() < 1e-6 {
                break;
            }
            s = (s - err / d).clamp(0.0, 1.0);
        }

        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        s = t;
        for _ in 0..32 {
            let x = Self::component(self.x1, self.x2, s);
            if (x - t).abs() < 1e-5 {
                break;
            }
            if x < t {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        Self::component(self.y1, self.y2, s)
    }
}

/// Overlay exit curve: `cubic-bezier(0.43, 0.13, 0.23, 0.96)`.
pub fn overlay_exit(t: f32) -> f32 {
    const CURVE: CubicBezier = CubicBezier {
        x1: 0.43,
        y1: 0.13,
        x2: 0.23,
        y2: 0.96,
    };
    CURVE.eval(t)
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based transition producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the transition has reached its end.
    fn is_complete(&self) -> bool;

    /// Current eased progress, clamped to [0.0, 1.0].
    fn value(&self) -> f32;

    /// Restart from the beginning.
    fn reset(&mut self);
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Opacity ramp between two levels over a fixed duration.
///
/// Elapsed time is accumulated as [`Duration`] so many small frame deltas do
/// not drift. A zero duration completes on the first tick.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    from: f32,
    to: f32,
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Ramp from `from` to `to` opacity over `duration` (linear easing).
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from: from.clamp(0.0, 1.0),
            to: to.clamp(0.0, 1.0),
            elapsed: Duration::ZERO,
            duration,
            easing: linear,
        }
    }

    /// Transparent to opaque.
    pub fn fade_in(duration: Duration) -> Self {
        Self::new(0.0, 1.0, duration)
    }

    /// Opaque to transparent.
    pub fn fade_out(duration: Duration) -> Self {
        Self::new(1.0, 0.0, duration)
    }

    /// A fade that is already at its end level.
    pub fn settled(opacity: f32) -> Self {
        Self::new(opacity, opacity, Duration::ZERO)
    }

    /// Set the easing function.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Linear progress before easing, in [0.0, 1.0].
    pub fn raw_progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    /// Current opacity, between the two endpoint levels.
    pub fn opacity(&self) -> f32 {
        self.from + (self.to - self.from) * self.value()
    }

    /// Configured length.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);
    const MS_150: Duration = Duration::from_millis(150);
    const MS_300: Duration = Duration::from_millis(300);

    #[test]
    fn easing_clamps_input() {
        assert!((linear(-1.0) - 0.0).abs() < f32::EPSILON);
        assert!((linear(2.0) - 1.0).abs() < f32::EPSILON);
        assert!((ease_out(1.5) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn ease_out_is_ahead_of_linear() {
        assert!(ease_out(0.5) > linear(0.5));
    }

    #[test]
    fn ease_in_out_midpoint() {
        assert!((ease_in_out(0.5) - 0.5).abs() < 0.01);
    }

    #[test]
    fn bezier_endpoints_are_exact() {
        assert_eq!(overlay_exit(0.0), 0.0);
        assert_eq!(overlay_exit(1.0), 1.0);
    }

    #[test]
    fn bezier_linear_control_points_match_linear() {
        let curve = CubicBezier::new(0.25, 0.25, 0.75, 0.75);
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((curve.eval(t) - t).abs() < 0.01, "t={t}");
        }
    }

    #[test]
    fn overlay_exit_is_monotonic() {
        let mut prev = 0.0f32;
        for i in 0..=200 {
            let v = overlay_exit(i as f32 / 200.0);
            assert!(v >= prev - 1e-3, "non-monotonic at step {i}");
            prev = v;
        }
    }

    #[test]
    fn fade_in_starts_transparent() {
        let fade = Fade::fade_in(MS_300);
        assert!((fade.opacity() - 0.0).abs() < f32::EPSILON);
        assert!(!fade.is_complete());
    }

    #[test]
    fn fade_out_midpoint() {
        let mut fade = Fade::fade_out(MS_300);
        fade.tick(MS_150);
        assert!((fade.opacity() - 0.5).abs() < 0.01);
    }

    #[test]
    fn fade_small_ticks_complete_without_drift() {
        let mut fade = Fade::fade_in(Duration::from_millis(160));
        for _ in 0..10 {
            fade.tick(MS_16);
        }
        assert!(fade.is_complete());
        assert!((fade.opacity() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn fade_zero_duration_is_settled() {
        let fade = Fade::fade_in(Duration::ZERO);
        assert!(fade.is_complete());
        assert!((fade.opacity() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn settled_fade_holds_level() {
        let mut fade = Fade::settled(0.4);
        fade.tick(MS_300);
        assert!((fade.opacity() - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn fade_reset_restarts() {
        let mut fade = Fade::fade_in(MS_300).easing(ease_out);
        fade.tick(MS_300);
        assert!(fade.is_complete());
        fade.reset();
        assert!(!fade.is_complete());
        assert!((fade.opacity() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn fade_overshoot_clamps() {
        let mut fade = Fade::fade_in(MS_150);
        fade.tick(Duration::from_secs(5));
        assert!((fade.opacity() - 1.0).abs() < f32::EPSILON);
    }
}
