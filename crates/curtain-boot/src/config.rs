#![forbid(unsafe_code)]

//! Boot timing configuration.
//!
//! One canonical progress duration; every other boot length is derived from
//! the fields here rather than hardcoded at call sites.

use std::time::Duration;

/// Progress bar run time.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);
/// Pause between 100% and handing the page over, so the exit can start.
pub const DEFAULT_GRACE: Duration = Duration::from_millis(200);
/// Loading phrase rotation period.
pub const DEFAULT_PHRASE_INTERVAL: Duration = Duration::from_millis(1000);
/// Cross-fade between consecutive phrases.
pub const DEFAULT_CROSSFADE: Duration = Duration::from_millis(300);

/// Timing for one boot sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootConfig {
    pub duration: Duration,
    pub grace: Duration,
    pub phrase_interval: Duration,
    pub crossfade: Duration,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            grace: DEFAULT_GRACE,
            phrase_interval: DEFAULT_PHRASE_INTERVAL,
            crossfade: DEFAULT_CROSSFADE,
        }
    }
}

impl BootConfig {
    #[must_use]
    pub fn duration(mut self, d: Duration) -> Self {
        self.duration = d;
        self
    }

    #[must_use]
    pub fn grace(mut self, d: Duration) -> Self {
        self.grace = d;
        self
    }

    #[must_use]
    pub fn phrase_interval(mut self, d: Duration) -> Self {
        self.phrase_interval = d;
        self
    }

    #[must_use]
    pub fn crossfade(mut self, d: Duration) -> Self {
        self.crossfade = d;
        self
    }

    /// Time from start until `Done`: progress plus grace.
    ///
    /// The scroll lock is held for exactly this long.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.duration.saturating_add(self.grace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_total_2200ms() {
        assert_eq!(BootConfig::default().total(), Duration::from_millis(2200));
    }

    #[test]
    fn total_follows_overrides() {
        let cfg = BootConfig::default()
            .duration(Duration::from_millis(500))
            .grace(Duration::ZERO);
        assert_eq!(cfg.total(), Duration::from_millis(500));
    }
}
