#![forbid(unsafe_code)]

//! The particle field component.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──mount──▶ Running ◀──reconfigure──▶ Gated
//!   │                │                        │
//!   └─(no surface)─▶ Unsupported              │
//!                    └────────unmount─────────┴──▶ Disposed
//! ```
//!
//! Gating is decided at `mount` and again only on an explicit
//! `reconfigure`; resizing never re-gates. A gated or unsupported field
//! holds no particles and no frame request.
//!
//! # Per-frame work
//!
//! 1. Clear the surface.
//! 2. Advance every particle by its velocity, wrap it, fill its circle in
//!    palette colour `i mod 3`.
//! 3. For every unordered pair closer than [`PROXIMITY_RADIUS`], stroke a
//!    connector whose alpha decays linearly with distance.
//!
//! The pair pass is O(n²); the tier cap keeps `n` at 50 or below.

use curtain_core::capability::{DeviceCapabilityProfile, ParticleTier};
use curtain_core::geometry::Viewport;
use curtain_core::scheduler::{Scheduler, TaskId, TaskKind, Wakeup};

use crate::palette::{Mode, Palette, Theme};
use crate::particle::{self, LINK_WIDTH, PROXIMITY_RADIUS, Particle, connection_opacity};
use crate::rng::Xorshift64;
use crate::surface::Surface;

/// Default seed when the host does not pick one.
pub const DEFAULT_SEED: u64 = 0x5EED_CAFE;

/// Where the field is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldState {
    /// Constructed, not yet mounted.
    #[default]
    Idle,
    /// The capability profile ruled particles out.
    Gated,
    /// No drawing surface was available.
    Unsupported,
    /// Animating.
    Running,
    /// Unmounted; terminal.
    Disposed,
}

/// Ambient particle animation over a [`Surface`].
#[derive(Debug)]
pub struct ParticleField<S: Surface> {
    surface: Option<S>,
    palette: Palette,
    rng: Xorshift64,
    particles: Vec<Particle>,
    viewport: Viewport,
    tier: ParticleTier,
    state: FieldState,
    frame: Option<TaskId>,
}

impl<S: Surface> ParticleField<S> {
    /// Create a field. `None` models a host that could not obtain a 2D
    /// context; such a field mounts as [`FieldState::Unsupported`].
    #[must_use]
    pub fn new(surface: Option<S>, palette: Palette) -> Self {
        Self {
            surface,
            palette,
            rng: Xorshift64::new(DEFAULT_SEED),
            particles: Vec::new(),
            viewport: Viewport::default(),
            tier: ParticleTier::Off,
            state: FieldState::Idle,
            frame: None,
        }
    }

    /// Use a specific PRNG seed for particle placement.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Xorshift64::new(seed);
        self
    }

    /// Evaluate gating and, if allowed, seed particles and request the first
    /// frame. Only the first call has an effect.
    pub fn mount(
        &mut self,
        profile: &DeviceCapabilityProfile,
        viewport: Viewport,
        scheduler: &mut Scheduler,
    ) -> FieldState {
        if self.state != FieldState::Idle {
            return self.state;
        }
        self.viewport = viewport;

        if self.surface.is_none() {
            tracing::warn!("particle field has no drawing surface");
            self.state = FieldState::Unsupported;
            return self.state;
        }

        self.tier = profile.particle_tier();
        if !self.tier.is_enabled() {
            tracing::info!(
                profile = profile.profile_name().unwrap_or("detected"),
                flags = ?profile.flags(),
                "particle field gated"
            );
            self.state = FieldState::Gated;
            return self.state;
        }

        self.start(scheduler);
        self.state
    }

    /// Handle a repaint. Returns whether a frame was drawn.
    pub fn on_frame(&mut self, wakeup: &Wakeup, scheduler: &mut Scheduler) -> bool {
        if wakeup.kind != TaskKind::Frame || self.frame != Some(wakeup.id) {
            return false;
        }
        self.frame = None;
        if self.state != FieldState::Running {
            return false;
        }
        self.step();
        self.frame = Some(scheduler.request_frame());
        true
    }

    /// Switch colours. A real change reseeds the particles.
    pub fn set_palette(&mut self, theme: Theme, mode: Mode) {
        let palette = Palette::new(theme, mode);
        if palette == self.palette {
            return;
        }
        self.palette = palette;
        if self.state == FieldState::Running {
            self.reseed();
        }
    }

    /// Follow a viewport change. Reseeds when running; never re-gates.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport || self.state == FieldState::Disposed {
            return;
        }
        self.viewport = viewport;
        if self.state == FieldState::Running {
            if let Some(surface) = self.surface.as_mut() {
                surface.resize(viewport);
            }
            self.reseed();
        }
    }

    /// Re-evaluate gating against a new profile.
    ///
    /// No effect before `mount`, after `unmount`, or without a surface.
    pub fn reconfigure(
        &mut self,
        profile: &DeviceCapabilityProfile,
        scheduler: &mut Scheduler,
    ) -> FieldState {
        if !matches!(self.state, FieldState::Running | FieldState::Gated) {
            return self.state;
        }
        let tier = profile.particle_tier();
        if tier == self.tier {
            return self.state;
        }
        tracing::info!(from = ?self.tier, to = ?tier, "particle tier changed");
        self.tier = tier;

        match (self.state, tier.is_enabled()) {
            (FieldState::Running, false) => {
                self.stop(scheduler);
                self.state = FieldState::Gated;
            }
            (FieldState::Running, true) => self.reseed(),
            (FieldState::Gated, true) => self.start(scheduler),
            _ => {}
        }
        self.state
    }

    /// Stop the animation loop and drop the particles. Idempotent.
    pub fn unmount(&mut self, scheduler: &mut Scheduler) {
        if self.state == FieldState::Disposed {
            return;
        }
        self.stop(scheduler);
        self.state = FieldState::Disposed;
        tracing::debug!("particle field unmounted");
    }

    #[must_use]
    pub fn state(&self) -> FieldState {
        self.state
    }

    #[must_use]
    pub fn tier(&self) -> ParticleTier {
        self.tier
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Whether `id` is this field's pending repaint.
    #[must_use]
    pub fn owns(&self, id: TaskId) -> bool {
        self.frame == Some(id)
    }

    fn start(&mut self, scheduler: &mut Scheduler) {
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(self.viewport);
        }
        self.reseed();
        self.frame = Some(scheduler.request_frame());
        self.state = FieldState::Running;
        tracing::info!(
            tier = ?self.tier,
            count = self.particles.len(),
            "particle field running"
        );
    }

    fn stop(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.frame.take() {
            scheduler.cancel(id);
        }
        self.particles = Vec::new();
    }

    fn reseed(&mut self) {
        let count = self.tier.particle_count();
        self.particles = particle::seed(count, self.viewport, &mut self.rng);
        tracing::debug!(
            count,
            width = self.viewport.width,
            height = self.viewport.height,
            theme = %self.palette.theme(),
            mode = %self.palette.mode(),
            "particles reseeded"
        );
    }

    fn step(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.clear();

        for (i, p) in self.particles.iter_mut().enumerate() {
            p.advance(self.viewport);
            surface.fill_circle(p.position, p.radius, self.palette.particle_color(i));
        }

        let r2 = PROXIMITY_RADIUS * PROXIMITY_RADIUS;
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                if a.position.distance_squared(b.position) >= r2 {
                    continue;
                }
                let d = a.position.distance(b.position);
                if let Some(opacity) = connection_opacity(d) {
                    surface.stroke_line(
                        a.position,
                        b.position,
                        LINK_WIDTH,
                        self.palette.link_color(opacity),
                    );
                }
            }
        }
    }
}
