#![forbid(unsafe_code)]

//! Ambient particle background.
//!
//! A [`ParticleField`](field::ParticleField) seeds a capped number of slow
//! particles, moves them on a wrap-around torus every repaint and draws faint
//! connectors between close pairs. How many particles (if any) is decided once
//! per mount from a [`DeviceCapabilityProfile`](curtain_core::DeviceCapabilityProfile).
//!
//! Drawing goes through the [`Surface`](surface::Surface) trait so the same
//! field runs against a browser canvas or the in-memory
//! [`RecordingSurface`](surface::RecordingSurface).

pub mod field;
pub mod palette;
pub mod particle;
pub mod rng;
pub mod surface;

pub use field::{FieldState, ParticleField};
pub use palette::{Mode, Palette, ParseModeError, ParseThemeError, Rgba, Theme};
pub use particle::{LINK_WIDTH, MAX_LINK_OPACITY, PROXIMITY_RADIUS, Particle, connection_opacity};
pub use rng::Xorshift64;
pub use surface::{DrawOp, RecordingSurface, Surface};
