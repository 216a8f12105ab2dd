#![forbid(unsafe_code)]

//! Page configuration, as handed over by the host page in JSON.
//!
//! Every field is optional; missing fields take the defaults below. Unknown
//! theme or mode names degrade to the defaults with a warning rather than
//! failing the page.

use std::fmt;
use std::time::Duration;

use curtain_boot::config::{
    DEFAULT_CROSSFADE, DEFAULT_DURATION, DEFAULT_GRACE, DEFAULT_PHRASE_INTERVAL,
};
use curtain_boot::phrases::DEFAULT_LANGUAGE;
use curtain_boot::{BootConfig, PhraseCatalog};
use curtain_particles::field::DEFAULT_SEED;
use curtain_particles::{Mode, Palette, Theme};
use serde::{Deserialize, Serialize};

/// Shell configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShellConfig {
    pub boot_ms: u64,
    pub grace_ms: u64,
    pub phrase_interval_ms: u64,
    pub crossfade_ms: u64,
    /// BCP 47-ish language tag for the loading phrases.
    pub language: String,
    pub theme: String,
    pub mode: String,
    pub seed: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            boot_ms: DEFAULT_DURATION.as_millis() as u64,
            grace_ms: DEFAULT_GRACE.as_millis() as u64,
            phrase_interval_ms: DEFAULT_PHRASE_INTERVAL.as_millis() as u64,
            crossfade_ms: DEFAULT_CROSSFADE.as_millis() as u64,
            language: DEFAULT_LANGUAGE.to_owned(),
            theme: Theme::default().as_str().to_owned(),
            mode: Mode::default().as_str().to_owned(),
            seed: DEFAULT_SEED,
        }
    }
}

impl ShellConfig {
    /// Parse from JSON. Blank input yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    /// Serialize back to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(ConfigError::Serialize)
    }

    #[must_use]
    pub fn boot_config(&self) -> BootConfig {
        BootConfig::default()
            .duration(Duration::from_millis(self.boot_ms))
            .grace(Duration::from_millis(self.grace_ms))
            .phrase_interval(Duration::from_millis(self.phrase_interval_ms))
            .crossfade(Duration::from_millis(self.crossfade_ms))
    }

    /// Configured theme, or the default if the name is unknown.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme.parse().unwrap_or_else(|err| {
            tracing::warn!(%err, "falling back to the default theme");
            Theme::default()
        })
    }

    /// Configured mode, or the default if the name is unknown.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode.parse().unwrap_or_else(|err| {
            tracing::warn!(%err, "falling back to the default mode");
            Mode::default()
        })
    }

    #[must_use]
    pub fn palette(&self) -> Palette {
        Palette::new(self.theme(), self.mode())
    }

    /// Loading phrases for the configured language, with fallback.
    #[must_use]
    pub fn phrases(&self) -> Vec<String> {
        PhraseCatalog::builtin().phrases_for(&self.language)
    }
}

/// Configuration failure.
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON document did not match [`ShellConfig`].
    Parse(serde_json::Error),
    /// [`ShellConfig`] could not be written out as JSON.
    Serialize(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid shell config: {err}"),
            Self::Serialize(err) => write!(f, "could not serialize shell config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) | Self::Serialize(err) => Some(err),
        }
    }
}
