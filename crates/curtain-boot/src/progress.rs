#![forbid(unsafe_code)]

//! Frame-synchronised progress from 0 to 100 over a fixed duration.
//!
//! Progress is derived from `now - start` on every repaint rather than from
//! accumulated frame deltas, so dropped frames never slow the bar down and
//! the final sample lands on exactly `100.0`.
//!
//! # Invariants
//!
//! 1. Reported progress never decreases, even if the host hands in an older
//!    timestamp.
//! 2. `100.0` is reported exactly once, with `complete = true`; nothing is
//!    scheduled afterwards.
//! 3. After [`ProgressClock::dispose`] the clock owns no task and ignores
//!    every wakeup.

use std::time::Duration;

use curtain_core::scheduler::{Scheduler, TaskId, TaskKind, Wakeup};

/// Largest `f32` below `100.0`.
const BELOW_FULL: f32 = f32::from_bits(100.0_f32.to_bits() - 1);

/// Map elapsed time onto `[0, 100]`.
///
/// Exactly `100.0` once `elapsed >= duration` and strictly below it before
/// then, even when the ratio rounds up to `100.0` in `f32`. A zero duration
/// is complete immediately.
#[must_use]
pub fn progress_at(elapsed: Duration, duration: Duration) -> f32 {
    if elapsed >= duration {
        return 100.0;
    }
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ((ratio * 100.0) as f32).clamp(0.0, BELOW_FULL)
}

/// One progress report, produced per repaint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    pub progress: f32,
    pub complete: bool,
    /// Frame timestamp the sample was computed for.
    pub at: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockState {
    Idle,
    Running { start: Duration },
    Finished,
    Disposed,
}

/// Repaint-driven progress clock.
#[derive(Debug, Clone)]
pub struct ProgressClock {
    duration: Duration,
    state: ClockState,
    progress: f32,
    frame: Option<TaskId>,
}

impl ProgressClock {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            state: ClockState::Idle,
            progress: 0.0,
            frame: None,
        }
    }

    /// Record the start time and ask for the first repaint.
    ///
    /// Only the first call has an effect.
    pub fn start(&mut self, scheduler: &mut Scheduler) -> bool {
        if self.state != ClockState::Idle {
            return false;
        }
        self.state = ClockState::Running {
            start: scheduler.now(),
        };
        self.frame = Some(scheduler.request_frame());
        true
    }

    /// Whether `id` is the repaint this clock is waiting for.
    #[must_use]
    pub fn owns(&self, id: TaskId) -> bool {
        self.frame == Some(id)
    }

    /// Handle a repaint. Returns a sample if the wakeup belonged to this clock.
    pub fn on_frame(&mut self, wakeup: &Wakeup, scheduler: &mut Scheduler) -> Option<ProgressSample> {
        if wakeup.kind != TaskKind::Frame || !self.owns(wakeup.id) {
            return None;
        }
        self.frame = None;

        let ClockState::Running { start } = self.state else {
            return None;
        };

        let raw = progress_at(wakeup.at.saturating_sub(start), self.duration);
        self.progress = raw.max(self.progress);

        if self.progress >= 100.0 {
            self.progress = 100.0;
            self.state = ClockState::Finished;
            tracing::debug!(at_ms = wakeup.at.as_millis() as u64, "progress complete");
            return Some(ProgressSample {
                progress: 100.0,
                complete: true,
                at: wakeup.at,
            });
        }

        self.frame = Some(scheduler.request_frame());
        Some(ProgressSample {
            progress: self.progress,
            complete: false,
            at: wakeup.at,
        })
    }

    /// Stop scheduling repaints. Idempotent.
    pub fn dispose(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.frame.take() {
            scheduler.cancel(id);
        }
        if self.state != ClockState::Finished {
            self.state = ClockState::Disposed;
        }
    }

    /// Last reported progress.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Whether 100 has been reported.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == ClockState::Finished
    }

    /// Configured duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn run(clock: &mut ProgressClock, sched: &mut Scheduler, at: Duration) -> Vec<ProgressSample> {
        sched
            .advance_to(at)
            .iter()
            .filter_map(|w| clock.on_frame(w, sched))
            .collect()
    }

    #[test]
    fn progress_at_endpoints() {
        assert_eq!(progress_at(Duration::ZERO, ms(2000)), 0.0);
        assert_eq!(progress_at(ms(1000), ms(2000)), 50.0);
        assert_eq!(progress_at(ms(2000), ms(2000)), 100.0);
        assert_eq!(progress_at(ms(9000), ms(2000)), 100.0);
        assert_eq!(progress_at(Duration::ZERO, Duration::ZERO), 100.0);
    }

    #[test]
    fn progress_stays_below_full_until_duration() {
        let almost = ms(2000) - Duration::from_nanos(10);
        let p = progress_at(almost, ms(2000));
        assert!(p < 100.0, "progress {p} reached 100 early");
        assert!(p > 99.9);
    }

    #[test]
    fn frame_just_before_duration_is_not_complete() {
        let mut sched = Scheduler::new();
        let mut clock = ProgressClock::new(ms(2000));
        clock.start(&mut sched);
        let samples = run(&mut clock, &mut sched, ms(2000) - Duration::from_nanos(10));
        assert_eq!(samples.len(), 1);
        assert!(samples[0].progress < 100.0);
        assert!(!samples[0].complete);
        assert!(!clock.is_complete());
        assert_eq!(sched.pending(), 1);

        let samples = run(&mut clock, &mut sched, ms(2000));
        assert!(samples[0].complete);
        assert_eq!(samples[0].progress, 100.0);
    }

    #[test]
    fn first_frame_at_start_reports_zero() {
        let mut sched = Scheduler::new();
        let mut clock = ProgressClock::new(ms(2000));
        assert!(clock.start(&mut sched));
        let samples = run(&mut clock, &mut sched, Duration::ZERO);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].progress, 0.0);
        assert!(!samples[0].complete);
    }

    #[test]
    fn completes_exactly_once_at_duration() {
        let mut sched = Scheduler::new();
        let mut clock = ProgressClock::new(ms(2000));
        clock.start(&mut sched);
        let mut completions = 0;
        let mut t = 0;
        while t <= 2500 {
            for s in run(&mut clock, &mut sched, ms(t)) {
                if s.complete {
                    completions += 1;
                    assert_eq!(s.progress, 100.0);
                    assert!(s.at >= ms(2000));
                }
            }
            t += 16;
        }
        assert_eq!(completions, 1);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn backwards_timestamp_does_not_regress() {
        let mut sched = Scheduler::new();
        let mut clock = ProgressClock::new(ms(1000));
        clock.start(&mut sched);
        run(&mut clock, &mut sched, ms(600));
        let before = clock.progress();
        // The scheduler clamps time, so the clock sees the same frame time.
        let samples = run(&mut clock, &mut sched, ms(100));
        assert!(samples[0].progress >= before);
    }

    #[test]
    fn zero_duration_completes_on_first_frame() {
        let mut sched = Scheduler::new();
        let mut clock = ProgressClock::new(Duration::ZERO);
        clock.start(&mut sched);
        let samples = run(&mut clock, &mut sched, ms(16));
        assert_eq!(samples.len(), 1);
        assert!(samples[0].complete);
    }

    #[test]
    fn dispose_cancels_pending_frame() {
        let mut sched = Scheduler::new();
        let mut clock = ProgressClock::new(ms(2000));
        clock.start(&mut sched);
        assert_eq!(sched.pending(), 1);
        clock.dispose(&mut sched);
        clock.dispose(&mut sched);
        assert_eq!(sched.pending(), 0);
        assert!(run(&mut clock, &mut sched, ms(3000)).is_empty());
        assert!(!clock.is_complete());
    }

    #[test]
    fn start_twice_is_ignored() {
        let mut sched = Scheduler::new();
        let mut clock = ProgressClock::new(ms(2000));
        assert!(clock.start(&mut sched));
        assert!(!clock.start(&mut sched));
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn foreign_wakeups_are_ignored() {
        let mut sched = Scheduler::new();
        let mut clock = ProgressClock::new(ms(2000));
        clock.start(&mut sched);
        let other = sched.request_frame();
        let wakeups = sched.advance_to(ms(16));
        let foreign = wakeups.iter().find(|w| w.id == other).copied();
        let foreign = foreign.expect("foreign frame fired");
        assert!(clock.on_frame(&foreign, &mut sched).is_none());
    }
}
