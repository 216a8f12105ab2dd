#![forbid(unsafe_code)]

//! Boot state machine.
//!
//! ```text
//! Idle ──start──▶ Running ──progress = 100──▶ Completing ──grace──▶ Done
//! ```
//!
//! The sequencer owns the progress clock, the phrase rotator and the scroll
//! lock. The host feeds it every [`Wakeup`] the scheduler produces; wakeups
//! that belong to someone else are ignored. Entering `Done` stops the
//! rotator, releases the scroll lock and runs the completion hook, in that
//! order.
//!
//! # Invariants
//!
//! 1. The phase only moves forward, one step at a time.
//! 2. The completion hook runs at most once, and only on entering `Done`.
//! 3. After `dispose` the sequencer owns no scheduler task and no scroll
//!    listener.

use std::fmt;
use std::time::Duration;

use curtain_core::platform::Platform;
use curtain_core::scheduler::{Scheduler, TaskId, TaskKind, Wakeup};

use crate::config::BootConfig;
use crate::phrase::PhraseRotator;
use crate::progress::ProgressClock;
use crate::scroll_lock::ScrollLock;

/// Boot lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum BootPhase {
    #[default]
    Idle,
    Running,
    Completing,
    Done,
}

impl BootPhase {
    /// The only phase this one may advance to.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Running),
            Self::Running => Some(Self::Completing),
            Self::Completing => Some(Self::Done),
            Self::Done => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completing => "completing",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for BootPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the boot sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootState {
    pub phase: BootPhase,
    /// Percentage in `[0, 100]`, never decreasing.
    pub progress: f32,
    /// Scheduler time at which the sequence entered `Running`.
    pub start: Option<Duration>,
}

type CompleteHook = Box<dyn FnOnce()>;

/// Owner of the loading overlay's timers and scroll lock.
pub struct BootSequencer {
    config: BootConfig,
    phase: BootPhase,
    start: Option<Duration>,
    clock: ProgressClock,
    rotator: PhraseRotator,
    lock: ScrollLock,
    grace: Option<TaskId>,
    on_complete: Option<CompleteHook>,
    disposed: bool,
}

impl fmt::Debug for BootSequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootSequencer")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("start", &self.start)
            .field("clock", &self.clock)
            .field("rotator", &self.rotator)
            .field("lock", &self.lock)
            .field("grace", &self.grace)
            .field("has_hook", &self.on_complete.is_some())
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl BootSequencer {
    #[must_use]
    pub fn new(config: BootConfig, phrases: Vec<String>) -> Self {
        Self {
            config,
            phase: BootPhase::Idle,
            start: None,
            clock: ProgressClock::new(config.duration),
            rotator: PhraseRotator::new(phrases, config.phrase_interval, config.crossfade),
            lock: ScrollLock::new(),
            grace: None,
            on_complete: None,
            disposed: false,
        }
    }

    /// Install the hook run on entering `Done`.
    #[must_use]
    pub fn on_complete(mut self, hook: impl FnOnce() + 'static) -> Self {
        self.set_on_complete(hook);
        self
    }

    /// Replace the completion hook. Ignored once `Done` or disposed.
    pub fn set_on_complete(&mut self, hook: impl FnOnce() + 'static) {
        if self.phase == BootPhase::Done || self.disposed {
            return;
        }
        self.on_complete = Some(Box::new(hook));
    }

    /// Enter `Running`: lock scroll, start the clock and the rotator.
    ///
    /// Returns `false` if the sequence was already started or disposed.
    pub fn start(&mut self, scheduler: &mut Scheduler, platform: &mut dyn Platform) -> bool {
        if self.disposed || !self.advance(BootPhase::Running) {
            return false;
        }
        self.start = Some(scheduler.now());
        self.lock.acquire(platform);
        self.clock.start(scheduler);
        self.rotator.start(scheduler);
        true
    }

    /// Route one scheduler wakeup. Returns the phase entered, if any.
    pub fn handle(
        &mut self,
        wakeup: &Wakeup,
        scheduler: &mut Scheduler,
        platform: &mut dyn Platform,
    ) -> Option<BootPhase> {
        if self.disposed {
            return None;
        }

        if self.clock.owns(wakeup.id) {
            let sample = self.clock.on_frame(wakeup, scheduler)?;
            if sample.complete && self.advance(BootPhase::Completing) {
                self.grace = Some(scheduler.set_timeout(self.config.grace));
                return Some(BootPhase::Completing);
            }
            return None;
        }

        if self.rotator.owns(wakeup.id) {
            self.rotator.on_timer(wakeup);
            return None;
        }

        if wakeup.kind == TaskKind::Timeout && self.grace == Some(wakeup.id) {
            self.grace = None;
            if self.advance(BootPhase::Done) {
                self.finish(scheduler, platform);
                return Some(BootPhase::Done);
            }
        }

        None
    }

    /// Forward a scroll event from the host. Returns whether it was
    /// suppressed.
    pub fn on_scroll(&mut self, platform: &mut dyn Platform) -> bool {
        self.lock.intercept(platform)
    }

    /// Advance the phrase cross-fade by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        self.rotator.tick(dt);
    }

    /// Tear down before or after completion. Idempotent.
    ///
    /// Before `Done` every pending task is cancelled and the scroll lock is
    /// released; the completion hook is dropped without running.
    pub fn dispose(&mut self, scheduler: &mut Scheduler, platform: &mut dyn Platform) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if self.phase == BootPhase::Done {
            return;
        }
        self.clock.dispose(scheduler);
        self.rotator.stop(scheduler);
        if let Some(id) = self.grace.take() {
            scheduler.cancel(id);
        }
        self.lock.release(platform);
        if self.on_complete.take().is_some() {
            tracing::debug!(phase = %self.phase, "boot disposed before completion");
        }
    }

    #[must_use]
    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.clock.progress()
    }

    #[must_use]
    pub fn state(&self) -> BootState {
        BootState {
            phase: self.phase,
            progress: self.progress(),
            start: self.start,
        }
    }

    /// Phrase currently on screen, if the list is non-empty.
    #[must_use]
    pub fn current_phrase(&self) -> Option<&str> {
        self.rotator.current()
    }

    #[must_use]
    pub fn phrase_opacity(&self) -> f32 {
        self.rotator.opacity()
    }

    #[must_use]
    pub fn is_scroll_locked(&self) -> bool {
        self.lock.is_active()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    #[must_use]
    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    /// Single forward-only transition point.
    fn advance(&mut self, to: BootPhase) -> bool {
        if self.phase.next() != Some(to) {
            tracing::trace!(from = %self.phase, to = %to, "rejected phase transition");
            return false;
        }
        tracing::debug!(from = %self.phase, to = %to, "boot phase");
        self.phase = to;
        true
    }

    fn finish(&mut self, scheduler: &mut Scheduler, platform: &mut dyn Platform) {
        self.rotator.stop(scheduler);
        self.lock.release(platform);
        let elapsed = self
            .start
            .map(|s| scheduler.now().saturating_sub(s))
            .unwrap_or_default();
        tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "boot complete");
        if let Some(hook) = self.on_complete.take() {
            hook();
        }
    }
}
