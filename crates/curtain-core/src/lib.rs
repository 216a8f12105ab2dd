#![forbid(unsafe_code)]

//! Core: host-driven time, task scheduling, platform adapter and device
//! capability policy shared by the boot choreography and the particle field.

pub mod animation;
pub mod capability;
pub mod geometry;
pub mod logging;
pub mod platform;
pub mod scheduler;

pub use capability::{CapabilityProvider, DeviceCapabilityProfile, DeviceSignals, ParticleTier};
pub use geometry::{Point, Velocity, Viewport};
pub use platform::{ListenerId, MemoryPlatform, Platform, ScrollPosition, ScrollRestoration};
pub use scheduler::{Scheduler, TaskId, TaskKind, Wakeup};
