#![forbid(unsafe_code)]

//! Host-driven page shell.
//!
//! # Lifecycle
//!
//! 1. [`PageShell::new`] wires the boot sequencer, the (unmounted) particle
//!    field and the presentation fades from a [`ShellConfig`].
//! 2. [`PageShell::init`] starts the boot at the host's first timestamp.
//! 3. [`PageShell::step`] is called on every repaint with a monotonic
//!    timestamp.
//! 4. [`PageShell::unmount`] tears everything down.
//!
//! The overlay starts its exit fade when progress reaches 100, content is
//! revealed and the particle field mounted only once the boot is `Done`, and
//! 100 ms later the scroll offset is pinned to the top one last time.

use std::time::Duration;

use curtain_boot::{BootPhase, BootSequencer};
use curtain_core::animation::{Animation, Fade, ease_out, overlay_exit};
use curtain_core::capability::{DeviceCapabilityProfile, ParticleTier};
use curtain_core::platform::{Platform, ScrollPosition};
use curtain_core::scheduler::{Scheduler, TaskId, TaskKind};
use curtain_particles::{FieldState, Mode, ParticleField, Surface, Theme};

use crate::config::ShellConfig;

/// Loading overlay exit duration.
pub const OVERLAY_EXIT: Duration = Duration::from_millis(600);
/// Page content reveal duration.
pub const CONTENT_REVEAL: Duration = Duration::from_millis(500);
/// Delay after `Done` before the final scroll-to-top.
pub const POST_BOOT_SETTLE: Duration = Duration::from_millis(100);

/// Result of a single [`PageShell::step`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    /// Boot phase after this step.
    pub phase: BootPhase,
    /// Phase entered during this step, if any (the last one when several).
    pub entered: Option<BootPhase>,
    /// The boot reached `Done` during this step. Set on exactly one step per
    /// page load, after the content reveal and field mount have started.
    /// Hosts that must not re-enter the shell from their completion callback
    /// dispatch it from here once `step` has returned.
    pub boot_completed: bool,
    /// Progress percentage in `[0, 100]`.
    pub progress: f32,
    /// Loading overlay opacity; zero once its exit has finished.
    pub overlay_opacity: f32,
    /// Page content opacity.
    pub content_opacity: f32,
    /// Whether the particle field drew a frame.
    pub particles_drawn: bool,
    /// Number of scheduler wakeups routed during this step.
    pub wakeups: u32,
    /// Current frame index (monotonically increasing).
    pub frame_idx: u64,
}

/// Owner of one page load's boot, reveal and ambient animation.
pub struct PageShell<P: Platform, S: Surface> {
    platform: P,
    scheduler: Scheduler,
    boot: BootSequencer,
    field: ParticleField<S>,
    overlay: Fade,
    content: Fade,
    settle: Option<TaskId>,
    last_step: Option<Duration>,
    started: bool,
    unmounted: bool,
}

impl<P: Platform, S: Surface> PageShell<P, S> {
    /// Wire a shell. `surface` is `None` when the host has no 2D canvas.
    #[must_use]
    pub fn new(config: &ShellConfig, platform: P, surface: Option<S>) -> Self {
        let boot = BootSequencer::new(config.boot_config(), config.phrases());
        let field = ParticleField::new(surface, config.palette()).with_seed(config.seed);
        Self {
            platform,
            scheduler: Scheduler::new(),
            boot,
            field,
            overlay: Fade::settled(1.0),
            content: Fade::settled(0.0),
            settle: None,
            last_step: None,
            started: false,
            unmounted: false,
        }
    }

    /// Run `hook` when the boot reaches `Done`.
    #[must_use]
    pub fn on_boot_complete(mut self, hook: impl FnOnce() + 'static) -> Self {
        self.set_boot_hook(hook);
        self
    }

    /// Replace the boot completion hook. Ignored once the boot is `Done`.
    pub fn set_boot_hook(&mut self, hook: impl FnOnce() + 'static) {
        self.boot.set_on_complete(hook);
    }

    /// Start the boot at host time `now`. Only the first call has an effect.
    pub fn init(&mut self, now: Duration) -> bool {
        if self.started || self.unmounted {
            return false;
        }
        self.started = true;
        self.scheduler.advance_to(now);
        self.last_step = Some(self.scheduler.now());
        tracing::info!(at_ms = now.as_millis() as u64, "page boot starting");
        self.boot.start(&mut self.scheduler, &mut self.platform)
    }

    /// Advance to host time `now` and route every due wakeup.
    pub fn step(&mut self, now: Duration) -> StepResult {
        let mut result = StepResult {
            phase: self.boot.phase(),
            entered: None,
            boot_completed: false,
            progress: self.boot.progress(),
            overlay_opacity: self.overlay_opacity(),
            content_opacity: self.content_opacity(),
            particles_drawn: false,
            wakeups: 0,
            frame_idx: self.scheduler.frame_idx(),
        };
        if !self.started || self.unmounted {
            return result;
        }

        let wakeups = self.scheduler.advance_to(now);
        let now = self.scheduler.now();
        let dt = self.last_step.map_or(Duration::ZERO, |t| now.saturating_sub(t));
        self.last_step = Some(now);
        self.overlay.tick(dt);
        self.content.tick(dt);
        self.boot.tick(dt);

        for wakeup in &wakeups {
            result.wakeups += 1;
            if let Some(phase) = self.boot.handle(wakeup, &mut self.scheduler, &mut self.platform) {
                result.entered = Some(phase);
                result.boot_completed |= phase == BootPhase::Done;
                self.on_phase(phase);
                continue;
            }
            if self.field.on_frame(wakeup, &mut self.scheduler) {
                result.particles_drawn = true;
                continue;
            }
            if wakeup.kind == TaskKind::Timeout && self.settle == Some(wakeup.id) {
                self.settle = None;
                self.platform.set_scroll_position(ScrollPosition::TOP);
                tracing::debug!("post-boot scroll settled");
            }
        }

        result.phase = self.boot.phase();
        result.progress = self.boot.progress();
        result.overlay_opacity = self.overlay_opacity();
        result.content_opacity = self.content_opacity();
        result.frame_idx = self.scheduler.frame_idx();
        result
    }

    /// Forward a scroll event from the host. Returns whether it was
    /// suppressed.
    pub fn scroll_event(&mut self) -> bool {
        self.boot.on_scroll(&mut self.platform)
    }

    /// Switch the particle palette.
    pub fn set_palette(&mut self, theme: Theme, mode: Mode) {
        self.field.set_palette(theme, mode);
    }

    /// Re-read the platform viewport and pass it to the particle field.
    pub fn resize(&mut self) {
        let viewport = self.platform.viewport();
        self.field.resize(viewport);
    }

    /// Re-evaluate particle gating, e.g. after a reduced-motion preference
    /// change. Only meaningful once the field is mounted.
    pub fn reconfigure(&mut self) -> FieldState {
        let profile = self.capability_profile();
        self.field.reconfigure(&profile, &mut self.scheduler)
    }

    /// Tear down the boot, the field and the settle timer. Idempotent.
    pub fn unmount(&mut self) {
        if self.unmounted {
            return;
        }
        self.unmounted = true;
        self.boot.dispose(&mut self.scheduler, &mut self.platform);
        self.field.unmount(&mut self.scheduler);
        if let Some(id) = self.settle.take() {
            self.scheduler.cancel(id);
        }
        tracing::debug!(pending = self.scheduler.pending(), "page shell unmounted");
    }

    #[must_use]
    pub fn phase(&self) -> BootPhase {
        self.boot.phase()
    }

    #[must_use]
    pub fn boot(&self) -> &BootSequencer {
        &self.boot
    }

    #[must_use]
    pub fn field(&self) -> &ParticleField<S> {
        &self.field
    }

    #[must_use]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Phrase currently shown on the overlay.
    #[must_use]
    pub fn current_phrase(&self) -> Option<&str> {
        self.boot.current_phrase()
    }

    #[must_use]
    pub fn phrase_opacity(&self) -> f32 {
        self.boot.phrase_opacity()
    }

    /// Overlay opacity; zero once the exit fade has finished.
    #[must_use]
    pub fn overlay_opacity(&self) -> f32 {
        self.overlay.opacity()
    }

    /// Whether the overlay still needs to be painted.
    #[must_use]
    pub fn overlay_visible(&self) -> bool {
        self.overlay_opacity() > 0.0
    }

    #[must_use]
    pub fn content_opacity(&self) -> f32 {
        self.content.opacity()
    }

    #[must_use]
    pub fn is_unmounted(&self) -> bool {
        self.unmounted
    }

    fn capability_profile(&self) -> DeviceCapabilityProfile {
        DeviceCapabilityProfile::from_signals(&self.platform.device_signals())
    }

    fn on_phase(&mut self, phase: BootPhase) {
        match phase {
            BootPhase::Completing => {
                self.overlay = Fade::fade_out(OVERLAY_EXIT).easing(overlay_exit);
            }
            BootPhase::Done => {
                self.content = Fade::fade_in(CONTENT_REVEAL).easing(ease_out);
                self.settle = Some(self.scheduler.set_timeout(POST_BOOT_SETTLE));

                let profile = self.capability_profile();
                let viewport = self.platform.viewport();
                let state = self.field.mount(&profile, viewport, &mut self.scheduler);
                let tier: ParticleTier = self.field.tier();
                tracing::info!(?state, ?tier, "content revealed");
            }
            BootPhase::Idle | BootPhase::Running => {}
        }
    }
}

impl<P: Platform + std::fmt::Debug, S: Surface + std::fmt::Debug> std::fmt::Debug for PageShell<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageShell")
            .field("platform", &self.platform)
            .field("scheduler", &self.scheduler)
            .field("boot", &self.boot)
            .field("field", &self.field)
            .field("settle", &self.settle)
            .field("started", &self.started)
            .field("unmounted", &self.unmounted)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curtain_core::platform::MemoryPlatform;
    use curtain_particles::RecordingSurface;

    type TestShell = PageShell<MemoryPlatform, RecordingSurface>;

    fn shell() -> TestShell {
        PageShell::new(
            &ShellConfig::default(),
            MemoryPlatform::new(1440.0, 900.0),
            Some(RecordingSurface::new()),
        )
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn step_before_init_does_nothing() {
        let mut s = shell();
        let r = s.step(ms(100));
        assert_eq!(r.phase, BootPhase::Idle);
        assert_eq!(r.wakeups, 0);
        assert_eq!(s.scheduler().pending(), 0);
    }

    #[test]
    fn overlay_exit_starts_at_completing() {
        let mut s = shell();
        s.init(ms(0));
        s.step(ms(1000));
        assert_eq!(s.overlay_opacity(), 1.0);
        let r = s.step(ms(2000));
        assert_eq!(r.entered, Some(BootPhase::Completing));
        s.step(ms(2300));
        let mid = s.overlay_opacity();
        assert!(mid > 0.0 && mid < 1.0, "{mid}");
        s.step(ms(2700));
        assert!(!s.overlay_visible());
    }

    #[test]
    fn field_mounts_only_at_done() {
        let mut s = shell();
        s.init(ms(0));
        s.step(ms(2000));
        assert_eq!(s.field().state(), FieldState::Idle);
        let r = s.step(ms(2200));
        assert_eq!(r.entered, Some(BootPhase::Done));
        assert_eq!(s.field().state(), FieldState::Running);
    }

    #[test]
    fn boot_completion_is_reported_once_after_reveal() {
        let mut s = shell();
        s.init(ms(0));
        let mut reported = Vec::new();
        let mut t = 0;
        while t <= 3000 {
            let r = s.step(ms(t));
            if r.boot_completed {
                assert_eq!(r.phase, BootPhase::Done);
                assert_eq!(s.field().state(), FieldState::Running);
                assert!(s.scheduler().pending() > 0);
                reported.push(t);
            }
            t += 16;
        }
        assert_eq!(reported.len(), 1, "{reported:?}");
        assert!(reported[0] >= 2200);
    }

    #[test]
    fn unmount_before_done_never_reports_completion() {
        let mut s = shell();
        s.init(ms(0));
        s.step(ms(2000));
        s.unmount();
        assert!(!s.step(ms(2200)).boot_completed);
        assert!(!s.step(ms(5000)).boot_completed);
    }

    #[test]
    fn settle_pins_scroll_after_done() {
        let mut s = shell();
        s.init(ms(0));
        s.step(ms(2000));
        s.step(ms(2200));
        s.platform_mut().scroll_to(ScrollPosition::new(0.0, 90.0));
        s.step(ms(2300));
        assert_eq!(s.platform().scroll_position(), ScrollPosition::TOP);
        s.platform_mut().scroll_to(ScrollPosition::new(0.0, 90.0));
        s.step(ms(2400));
        assert_eq!(s.platform().scroll_position().top, 90.0);
    }

    #[test]
    fn unmount_mid_boot_leaves_no_tasks() {
        let mut s = shell();
        s.init(ms(0));
        s.step(ms(500));
        s.unmount();
        s.unmount();
        assert_eq!(s.scheduler().pending(), 0);
        assert_eq!(s.platform().listener_count(), 0);
        let r = s.step(ms(5000));
        assert_eq!(r.wakeups, 0);
        assert_eq!(r.phase, BootPhase::Running);
    }

    #[test]
    fn init_is_one_shot() {
        let mut s = shell();
        assert!(s.init(ms(10)));
        assert!(!s.init(ms(20)));
        assert_eq!(s.platform().listener_count(), 1);
    }
}
