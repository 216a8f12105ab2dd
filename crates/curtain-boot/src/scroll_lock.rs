#![forbid(unsafe_code)]

//! Scroll suppression for the boot window.
//!
//! While held, every scroll event the host forwards is answered by pinning
//! the page back to the top. Acquiring also pins immediately and switches
//! history scroll restoration to manual for the rest of the session, so a
//! reload mid-boot cannot reintroduce an offset, and strips any `#fragment`
//! from the URL so the browser cannot jump to an anchor after release.
//!
//! # Invariants
//!
//! 1. At most one listener is attached per lock; a second `acquire` while
//!    held is a no-op.
//! 2. `release` always detaches the listener it installed and is a no-op when
//!    not held.
//! 3. Once released, `intercept` never touches the scroll offset.

use curtain_core::platform::{ListenerId, Platform, ScrollPosition, ScrollRestoration};

/// Ownership token for "scroll suppression is active".
#[derive(Debug, Default)]
pub struct ScrollLock {
    listener: Option<ListenerId>,
    intercepted: u64,
}

impl ScrollLock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start suppressing scroll. Returns `false` if already held.
    pub fn acquire(&mut self, platform: &mut dyn Platform) -> bool {
        if self.listener.is_some() {
            return false;
        }
        platform.set_scroll_restoration(ScrollRestoration::Manual);
        platform.clear_location_hash();
        platform.set_scroll_position(ScrollPosition::TOP);
        let id = platform.add_scroll_listener();
        self.listener = Some(id);
        tracing::debug!(listener = id.0, "scroll lock acquired");
        true
    }

    /// Answer a forwarded scroll event. Returns whether it was suppressed.
    pub fn intercept(&mut self, platform: &mut dyn Platform) -> bool {
        if self.listener.is_none() {
            return false;
        }
        if platform.scroll_position() != ScrollPosition::TOP {
            platform.set_scroll_position(ScrollPosition::TOP);
        }
        self.intercepted += 1;
        true
    }

    /// Restore native scrolling. Returns whether a listener was removed.
    pub fn release(&mut self, platform: &mut dyn Platform) -> bool {
        let Some(id) = self.listener.take() else {
            return false;
        };
        platform.remove_scroll_listener(id);
        tracing::debug!(
            listener = id.0,
            intercepted = self.intercepted,
            "scroll lock released"
        );
        true
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.listener.is_some()
    }

    /// Listener currently attached, if any.
    #[must_use]
    pub fn listener(&self) -> Option<ListenerId> {
        self.listener
    }

    /// Number of scroll events suppressed so far.
    #[must_use]
    pub fn intercepted(&self) -> u64 {
        self.intercepted
    }
}
