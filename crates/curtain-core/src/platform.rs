#![forbid(unsafe_code)]

//! Narrow platform adapter between the choreography and the host page.
//!
//! The boot and particle logic never touch a DOM directly. They talk to a
//! [`Platform`], which a browser host implements over `window`/`history` and
//! tests implement with [`MemoryPlatform`].

use std::collections::BTreeSet;

use crate::capability::DeviceSignals;
use crate::geometry::Viewport;

/// Document scroll offset in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    pub left: f32,
    pub top: f32,
}

impl ScrollPosition {
    pub const TOP: Self = Self { left: 0.0, top: 0.0 };

    #[inline]
    pub const fn new(left: f32, top: f32) -> Self {
        Self { left, top }
    }
}

/// Browser scroll-position restoration on reload / history navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollRestoration {
    #[default]
    Auto,
    Manual,
}

/// Handle for an installed scroll listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Host page services used by the choreography.
pub trait Platform {
    /// Current viewport size.
    fn viewport(&self) -> Viewport;

    /// Current document scroll offset.
    fn scroll_position(&self) -> ScrollPosition;

    /// Jump (without smooth scrolling) to `pos`.
    fn set_scroll_position(&mut self, pos: ScrollPosition);

    /// Configure history scroll restoration for the session.
    fn set_scroll_restoration(&mut self, mode: ScrollRestoration);

    /// Attach a non-passive scroll listener whose events the host forwards
    /// to the choreography.
    fn add_scroll_listener(&mut self) -> ListenerId;

    /// Detach a listener. Unknown ids are ignored.
    fn remove_scroll_listener(&mut self, id: ListenerId);

    /// Drop any `#fragment` from the current URL without navigating, so the
    /// browser does not jump to an anchor once scrolling is restored. A URL
    /// without a fragment is left untouched.
    fn clear_location_hash(&mut self);

    /// `prefers-reduced-motion: reduce`.
    fn prefers_reduced_motion(&self) -> bool;

    /// Raw device/network signals for capability gating.
    fn device_signals(&self) -> DeviceSignals {
        DeviceSignals {
            viewport_width: self.viewport().width,
            prefers_reduced_motion: self.prefers_reduced_motion(),
            ..DeviceSignals::default()
        }
    }
}

/// In-memory platform for headless hosts and tests.
///
/// Records every listener and scroll change so callers can assert on the
/// exact page state the choreography left behind.
#[derive(Debug, Clone)]
pub struct MemoryPlatform {
    viewport: Viewport,
    scroll: ScrollPosition,
    restoration: ScrollRestoration,
    listeners: BTreeSet<ListenerId>,
    next_listener: u64,
    reduced_motion: bool,
    signals: Option<DeviceSignals>,
    scroll_writes: usize,
    hash: String,
    hash_clears: usize,
}

impl MemoryPlatform {
    /// A page of the given size, scrolled to the top.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            scroll: ScrollPosition::TOP,
            restoration: ScrollRestoration::Auto,
            listeners: BTreeSet::new(),
            next_listener: 1,
            reduced_motion: false,
            signals: None,
            scroll_writes: 0,
            hash: String::new(),
            hash_clears: 0,
        }
    }

    /// Override the reported device signals (viewport width and motion
    /// preference are still taken from the platform state).
    #[must_use]
    pub fn with_signals(mut self, signals: DeviceSignals) -> Self {
        self.signals = Some(signals);
        self
    }

    /// Report `prefers-reduced-motion`.
    #[must_use]
    pub fn with_reduced_motion(mut self, on: bool) -> Self {
        self.reduced_motion = on;
        self
    }

    /// Start with `hash` (e.g. `"#pricing"`) in the URL.
    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = hash.into();
        self
    }

    /// Simulate a user or programmatic scroll. Returns whether any listener
    /// is attached, i.e. whether the host would dispatch a scroll event.
    pub fn scroll_to(&mut self, pos: ScrollPosition) -> bool {
        self.scroll = pos;
        !self.listeners.is_empty()
    }

    /// Resize the page.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    /// Number of attached scroll listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Whether a specific listener is still attached.
    #[must_use]
    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.contains(&id)
    }

    /// Current restoration mode.
    #[must_use]
    pub fn restoration(&self) -> ScrollRestoration {
        self.restoration
    }

    /// Current URL fragment, empty when there is none.
    #[must_use]
    pub fn location_hash(&self) -> &str {
        &self.hash
    }

    /// How many times a fragment was actually stripped from the URL.
    #[must_use]
    pub fn hash_clears(&self) -> usize {
        self.hash_clears
    }

    /// How many times the choreography wrote the scroll offset.
    #[must_use]
    pub fn scroll_writes(&self) -> usize {
        self.scroll_writes
    }
}

impl Default for MemoryPlatform {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

impl Platform for MemoryPlatform {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_position(&self) -> ScrollPosition {
        self.scroll
    }

    fn set_scroll_position(&mut self, pos: ScrollPosition) {
        self.scroll = pos;
        self.scroll_writes += 1;
    }

    fn set_scroll_restoration(&mut self, mode: ScrollRestoration) {
        self.restoration = mode;
    }

    fn add_scroll_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id);
        id
    }

    fn remove_scroll_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    fn clear_location_hash(&mut self) {
        if !self.hash.is_empty() {
            self.hash.clear();
            self.hash_clears += 1;
        }
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn device_signals(&self) -> DeviceSignals {
        let base = self.signals.clone().unwrap_or_default();
        DeviceSignals {
            viewport_width: self.viewport.width,
            prefers_reduced_motion: self.reduced_motion || base.prefers_reduced_motion,
            ..base
        }
    }
}
