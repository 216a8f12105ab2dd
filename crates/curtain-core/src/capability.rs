#![forbid(unsafe_code)]

//! Device capability model and the single animation-degradation policy.
//!
//! A [`DeviceCapabilityProfile`] is derived once per mount from raw
//! [`DeviceSignals`] (processor count, memory, network type, viewport width,
//! motion preference). Every component that wants to scale back its animation
//! asks the profile instead of re-deriving its own notion of "weak device".
//!
//! # Decision Rules
//!
//! ```text
//! IF slow_network OR critically_constrained          THEN particles Off
//! ELSE IF narrow AND (very_narrow OR low_end)         THEN particles Off
//! ELSE IF low_end OR prefers_reduced_motion           THEN Reduced (20)
//! ELSE IF narrow                                      THEN Compact (30)
//! ELSE                                                     Full (50)
//! ```
//!
//! # Failure Modes
//!
//! | Mode | Condition | Behavior |
//! |------|-----------|----------|
//! | Unknown processor count | API absent | Assume 4 (not low-end) |
//! | Unknown memory | API absent | Memory signal ignored |
//! | Unknown network type | API absent | Not a slow network |
//!
//! A false negative (animating on a weak device) costs frame rate, never
//! correctness, so unknown signals lean towards "capable".

use bitflags::bitflags;

/// Viewports narrower than this are treated as phones/tablets.
pub const NARROW_VIEWPORT_PX: f32 = 768.0;
/// Narrow viewports below this width never run the particle field.
pub const VERY_NARROW_VIEWPORT_PX: f32 = 480.0;
/// Fewer logical processors than this marks a low-end device.
pub const LOW_END_PROCESSORS: u32 = 4;
/// Less device memory (GB) than this marks a low-end device.
pub const LOW_END_MEMORY_GB: f32 = 4.0;
/// At or below both of these the device is critically constrained.
pub const CRITICAL_PROCESSORS: u32 = 2;
pub const CRITICAL_MEMORY_GB: f32 = 2.0;
/// Assumed processor count when the platform does not report one.
pub const DEFAULT_PROCESSORS: u32 = 4;

/// Effective connection type as reported by the Network Information API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EffectiveConnection {
    Slow2g,
    TwoG,
    ThreeG,
    FourG,
    #[default]
    Unknown,
}

impl EffectiveConnection {
    /// Parse the `effectiveType` string; anything unrecognised is `Unknown`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "slow-2g" => Self::Slow2g,
            "2g" => Self::TwoG,
            "3g" => Self::ThreeG,
            "4g" => Self::FourG,
            _ => Self::Unknown,
        }
    }

    /// Whether this connection type should suppress decorative work.
    #[must_use]
    pub const fn is_slow(self) -> bool {
        matches!(self, Self::Slow2g | Self::TwoG | Self::ThreeG)
    }
}

/// Raw, unprocessed device/network signals captured from the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSignals {
    pub logical_processors: Option<u32>,
    pub device_memory_gb: Option<f32>,
    pub effective_connection: EffectiveConnection,
    pub save_data: bool,
    pub viewport_width: f32,
    pub prefers_reduced_motion: bool,
}

impl Default for DeviceSignals {
    fn default() -> Self {
        Self {
            logical_processors: None,
            device_memory_gb: None,
            effective_connection: EffectiveConnection::Unknown,
            save_data: false,
            viewport_width: 1280.0,
            prefers_reduced_motion: false,
        }
    }
}

bitflags! {
    /// Derived capability facts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CapabilityFlags: u8 {
        const LOW_END = 1 << 0;
        const CRITICALLY_CONSTRAINED = 1 << 1;
        const SLOW_NETWORK = 1 << 2;
        const REDUCED_MOTION = 1 << 3;
        const NARROW_VIEWPORT = 1 << 4;
        const VERY_NARROW_VIEWPORT = 1 << 5;
    }
}

/// How many ambient particles the device can afford.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleTier {
    /// Do not allocate or animate particles at all.
    Off,
    /// Constrained or reduced-motion devices.
    Reduced,
    /// Narrow viewports on capable devices.
    Compact,
    /// Desktop-class devices.
    Full,
}

impl ParticleTier {
    /// Particle count cap for this tier.
    #[must_use]
    pub const fn particle_count(self) -> usize {
        match self {
            Self::Off => 0,
            Self::Reduced => 20,
            Self::Compact => 30,
            Self::Full => 50,
        }
    }

    /// Whether the particle field should run.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// Read-only capability queries consumed by animated components.
pub trait CapabilityProvider {
    fn is_low_end(&self) -> bool;
    fn is_slow_network(&self) -> bool;
    fn prefers_reduced_motion(&self) -> bool;
}

/// Snapshot of device capabilities, computed once per mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCapabilityProfile {
    flags: CapabilityFlags,
    name: Option<&'static str>,
}

impl DeviceCapabilityProfile {
    /// Derive a profile from raw platform signals.
    #[must_use]
    pub fn from_signals(signals: &DeviceSignals) -> Self {
        let processors = signals.logical_processors.unwrap_or(DEFAULT_PROCESSORS);
        let mut flags = CapabilityFlags::empty();

        let low_memory = signals
            .device_memory_gb
            .is_some_and(|gb| gb > 0.0 && gb < LOW_END_MEMORY_GB);
        if processors < LOW_END_PROCESSORS || low_memory {
            flags |= CapabilityFlags::LOW_END;
        }

        if let (Some(cores), Some(gb)) = (signals.logical_processors, signals.device_memory_gb)
            && cores <= CRITICAL_PROCESSORS
            && gb <= CRITICAL_MEMORY_GB
        {
            flags |= CapabilityFlags::CRITICALLY_CONSTRAINED;
        }

        if signals.effective_connection.is_slow() || signals.save_data {
            flags |= CapabilityFlags::SLOW_NETWORK;
        }
        if signals.prefers_reduced_motion {
            flags |= CapabilityFlags::REDUCED_MOTION;
        }
        if signals.viewport_width < NARROW_VIEWPORT_PX {
            flags |= CapabilityFlags::NARROW_VIEWPORT;
        }
        if signals.viewport_width < VERY_NARROW_VIEWPORT_PX {
            flags |= CapabilityFlags::VERY_NARROW_VIEWPORT;
        }

        Self { flags, name: None }
    }

    /// Desktop with plenty of headroom.
    #[must_use]
    pub const fn desktop() -> Self {
        Self {
            flags: CapabilityFlags::empty(),
            name: Some("desktop"),
        }
    }

    /// Capable phone in portrait (narrow, but wide enough for particles).
    #[must_use]
    pub const fn mobile() -> Self {
        Self {
            flags: CapabilityFlags::NARROW_VIEWPORT,
            name: Some("mobile"),
        }
    }

    /// Budget phone: narrow and low-end.
    #[must_use]
    pub const fn low_end_mobile() -> Self {
        Self {
            flags: CapabilityFlags::NARROW_VIEWPORT.union(CapabilityFlags::LOW_END),
            name: Some("low-end-mobile"),
        }
    }

    /// Desktop on a slow connection.
    #[must_use]
    pub const fn slow_network() -> Self {
        Self {
            flags: CapabilityFlags::SLOW_NETWORK,
            name: Some("slow-network"),
        }
    }

    /// Desktop whose user asked for reduced motion.
    #[must_use]
    pub const fn reduced_motion() -> Self {
        Self {
            flags: CapabilityFlags::REDUCED_MOTION,
            name: Some("reduced-motion"),
        }
    }

    /// Raw flags.
    #[must_use]
    pub const fn flags(&self) -> CapabilityFlags {
        self.flags
    }

    /// Name of the predefined profile, if this is one.
    #[must_use]
    pub const fn profile_name(&self) -> Option<&'static str> {
        self.name
    }

    #[must_use]
    pub const fn is_narrow_viewport(&self) -> bool {
        self.flags.contains(CapabilityFlags::NARROW_VIEWPORT)
    }

    #[must_use]
    pub const fn is_critically_constrained(&self) -> bool {
        self.flags.contains(CapabilityFlags::CRITICALLY_CONSTRAINED)
    }

    /// The particle policy. This is the only place the thresholds combine.
    #[must_use]
    pub fn particle_tier(&self) -> ParticleTier {
        let f = self.flags;
        if f.intersects(CapabilityFlags::SLOW_NETWORK | CapabilityFlags::CRITICALLY_CONSTRAINED) {
            return ParticleTier::Off;
        }
        if f.contains(CapabilityFlags::NARROW_VIEWPORT)
            && f.intersects(CapabilityFlags::VERY_NARROW_VIEWPORT | CapabilityFlags::LOW_END)
        {
            return ParticleTier::Off;
        }
        if f.intersects(CapabilityFlags::LOW_END | CapabilityFlags::REDUCED_MOTION) {
            return ParticleTier::Reduced;
        }
        if f.contains(CapabilityFlags::NARROW_VIEWPORT) {
            return ParticleTier::Compact;
        }
        ParticleTier::Full
    }
}

impl Default for DeviceCapabilityProfile {
    fn default() -> Self {
        Self::desktop()
    }
}

impl CapabilityProvider for DeviceCapabilityProfile {
    fn is_low_end(&self) -> bool {
        self.flags.contains(CapabilityFlags::LOW_END)
    }

    fn is_slow_network(&self) -> bool {
        self.flags.contains(CapabilityFlags::SLOW_NETWORK)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.flags.contains(CapabilityFlags::REDUCED_MOTION)
    }
}

/// Builder for custom profiles in tests and simulations.
#[derive(Debug, Clone, Default)]
pub struct CapabilityProfileBuilder {
    flags: CapabilityFlags,
}

impl CapabilityProfileBuilder {
    /// Start from a fully capable desktop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn low_end(mut self, on: bool) -> Self {
        self.flags.set(CapabilityFlags::LOW_END, on);
        self
    }

    #[must_use]
    pub fn critically_constrained(mut self, on: bool) -> Self {
        self.flags.set(CapabilityFlags::CRITICALLY_CONSTRAINED, on);
        self
    }

    #[must_use]
    pub fn slow_network(mut self, on: bool) -> Self {
        self.flags.set(CapabilityFlags::SLOW_NETWORK, on);
        self
    }

    #[must_use]
    pub fn reduced_motion(mut self, on: bool) -> Self {
        self.flags.set(CapabilityFlags::REDUCED_MOTION, on);
        self
    }

    /// Mark the viewport narrow; `very_narrow` also sets the sub-480px flag.
    #[must_use]
    pub fn narrow_viewport(mut self, narrow: bool, very_narrow: bool) -> Self {
        self.flags.set(CapabilityFlags::NARROW_VIEWPORT, narrow);
        self.flags
            .set(CapabilityFlags::VERY_NARROW_VIEWPORT, narrow && very_narrow);
        self
    }

    #[must_use]
    pub fn build(self) -> DeviceCapabilityProfile {
        DeviceCapabilityProfile {
            flags: self.flags,
            name: None,
        }
    }
}
