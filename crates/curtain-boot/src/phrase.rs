#![forbid(unsafe_code)]

//! Cycles the loading phrases on a fixed interval.
//!
//! The first phrase is fully visible as soon as the overlay mounts. Every
//! interval wakeup advances `(index + 1) mod len` and restarts the cross-fade.
//! The rotator shares the boot sequence's lifetime but not its clock: it
//! keeps cycling through `Running` and `Completing` and only stops when told.

use std::time::Duration;

use curtain_core::animation::{Animation, Fade, ease_in_out};
use curtain_core::scheduler::{Scheduler, TaskId, TaskKind, Wakeup};

/// Interval-driven phrase cycle.
#[derive(Debug, Clone)]
pub struct PhraseRotator {
    phrases: Vec<String>,
    index: usize,
    interval: Duration,
    crossfade: Duration,
    fade: Fade,
    timer: Option<TaskId>,
    stopped: bool,
}

impl PhraseRotator {
    /// Create a rotator. An empty list never arms a timer.
    #[must_use]
    pub fn new(phrases: Vec<String>, interval: Duration, crossfade: Duration) -> Self {
        Self {
            phrases,
            index: 0,
            interval,
            crossfade,
            // First phrase appears with no transition.
            fade: Fade::settled(1.0),
            timer: None,
            stopped: false,
        }
    }

    /// Arm the interval timer. Only the first call has an effect.
    pub fn start(&mut self, scheduler: &mut Scheduler) -> bool {
        if self.stopped || self.timer.is_some() || self.phrases.len() < 2 {
            return false;
        }
        self.timer = Some(scheduler.set_interval(self.interval));
        true
    }

    /// Handle an interval wakeup. Returns the new index if it advanced.
    pub fn on_timer(&mut self, wakeup: &Wakeup) -> Option<usize> {
        if wakeup.kind != TaskKind::Interval || self.timer != Some(wakeup.id) || self.stopped {
            return None;
        }
        self.index = (self.index + 1) % self.phrases.len();
        self.fade = Fade::fade_in(self.crossfade).easing(ease_in_out);
        tracing::trace!(index = self.index, "loading phrase advanced");
        Some(self.index)
    }

    /// Whether `id` is this rotator's timer.
    #[must_use]
    pub fn owns(&self, id: TaskId) -> bool {
        self.timer == Some(id)
    }

    /// Advance the cross-fade by a frame delta.
    pub fn tick(&mut self, dt: Duration) {
        self.fade.tick(dt);
    }

    /// Stop advancing and release the timer. Idempotent.
    pub fn stop(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.timer.take() {
            scheduler.cancel(id);
        }
        self.stopped = true;
    }

    /// The phrase currently on screen.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.phrases.get(self.index).map(String::as_str)
    }

    /// Current index into the phrase list.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Opacity of the current phrase, for the cross-fade.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        if self.phrases.is_empty() {
            0.0
        } else {
            self.fade.opacity()
        }
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    #[must_use]
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const I: Duration = Duration::from_millis(1000);
    const X: Duration = Duration::from_millis(300);

    fn abc() -> Vec<String> {
        vec!["A".into(), "B".into(), "C".into()]
    }

    fn pump(r: &mut PhraseRotator, s: &mut Scheduler, at: Duration) {
        for w in s.advance_to(at) {
            r.on_timer(&w);
        }
    }

    #[test]
    fn cycles_at_each_interval() {
        let mut s = Scheduler::new();
        let mut r = PhraseRotator::new(abc(), I, X);
        assert!(r.start(&mut s));
        let mut seen = vec![r.current().map(str::to_owned)];
        for k in 1..=3 {
            pump(&mut r, &mut s, I * k);
            seen.push(r.current().map(str::to_owned));
        }
        let seen: Vec<_> = seen.into_iter().flatten().collect();
        assert_eq!(seen, ["A", "B", "C", "A"]);
    }

    #[test]
    fn first_phrase_has_no_transition() {
        let r = PhraseRotator::new(abc(), I, X);
        assert_eq!(r.opacity(), 1.0);
    }

    #[test]
    fn later_phrases_cross_fade() {
        let mut s = Scheduler::new();
        let mut r = PhraseRotator::new(abc(), I, X);
        r.start(&mut s);
        pump(&mut r, &mut s, I);
        assert_eq!(r.opacity(), 0.0);
        r.tick(Duration::from_millis(150));
        assert!((r.opacity() - 0.5).abs() < 0.01);
        r.tick(Duration::from_millis(150));
        assert_eq!(r.opacity(), 1.0);
    }

    #[test]
    fn stop_releases_timer_and_freezes_index() {
        let mut s = Scheduler::new();
        let mut r = PhraseRotator::new(abc(), I, X);
        r.start(&mut s);
        pump(&mut r, &mut s, I);
        r.stop(&mut s);
        r.stop(&mut s);
        assert_eq!(s.pending(), 0);
        pump(&mut r, &mut s, I * 5);
        assert_eq!(r.current(), Some("B"));
        assert!(!r.start(&mut s));
    }

    #[test]
    fn empty_list_never_arms() {
        let mut s = Scheduler::new();
        let mut r = PhraseRotator::new(Vec::new(), I, X);
        assert!(!r.start(&mut s));
        assert_eq!(s.pending(), 0);
        assert_eq!(r.current(), None);
        assert_eq!(r.opacity(), 0.0);
    }

    #[test]
    fn single_phrase_is_static() {
        let mut s = Scheduler::new();
        let mut r = PhraseRotator::new(vec!["Only".into()], I, X);
        assert!(!r.start(&mut s));
        assert_eq!(r.current(), Some("Only"));
    }

    #[test]
    fn skipped_periods_each_advance() {
        let mut s = Scheduler::new();
        let mut r = PhraseRotator::new(abc(), I, X);
        r.start(&mut s);
        // Host stalled for 2.5 intervals: two wakeups, two advances.
        pump(&mut r, &mut s, Duration::from_millis(2500));
        assert_eq!(r.current(), Some("C"));
    }
}
