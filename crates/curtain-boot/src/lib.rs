#![forbid(unsafe_code)]

//! Boot choreography for the landing page.
//!
//! A [`BootSequencer`](sequencer::BootSequencer) owns the loading overlay's
//! moving parts: a frame-driven [`ProgressClock`](progress::ProgressClock),
//! a [`PhraseRotator`](phrase::PhraseRotator) and a
//! [`ScrollLock`](scroll_lock::ScrollLock). It walks
//! `Idle → Running → Completing → Done` exactly once and tells the host when
//! the page may be revealed.
//!
//! All timing is host-driven through [`curtain_core::Scheduler`]; nothing in
//! this crate reads a wall clock.

pub mod config;
pub mod phrase;
pub mod phrases;
pub mod progress;
pub mod scroll_lock;
pub mod sequencer;

pub use config::BootConfig;
pub use phrase::PhraseRotator;
pub use phrases::PhraseCatalog;
pub use progress::{ProgressClock, ProgressSample};
pub use scroll_lock::ScrollLock;
pub use sequencer::{BootPhase, BootSequencer, BootState};
