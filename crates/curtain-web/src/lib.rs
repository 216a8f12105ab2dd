#![forbid(unsafe_code)]

//! Page shell for the landing site.
//!
//! [`PageShell`](shell::PageShell) is the single owner of host-driven time
//! for one page load. The host calls [`PageShell::step`](shell::PageShell::step)
//! from its repaint loop; the shell advances the scheduler, routes wakeups to
//! the boot sequencer and the particle field, and reports what the host should
//! paint.
//!
//! On `wasm32` the `wasm` module binds the shell to a real browser window and
//! canvas and exports it to JavaScript as `CurtainPage`.

pub mod config;
pub mod shell;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use config::{ConfigError, ShellConfig};
pub use shell::{PageShell, StepResult};

#[cfg(target_arch = "wasm32")]
pub use wasm::{BrowserPlatform, CanvasSurface, CurtainPage};
#[cfg(all(target_arch = "wasm32", feature = "subscriber"))]
pub use wasm::init_logging;
