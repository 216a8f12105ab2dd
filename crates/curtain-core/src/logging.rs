#![forbid(unsafe_code)]

//! Logging bootstrap.
//!
//! Library code only emits `tracing` events. Hosts that want them printed
//! enable the `subscriber` feature and call [`init`] once at startup.

use std::fmt;

/// Default filter when neither the config nor `RUST_LOG` provide one.
pub const DEFAULT_FILTER: &str = "info,curtain_boot=debug,curtain_particles=info,curtain_web=info";

/// Output format for the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, one line per event.
    #[default]
    Compact,
    /// One JSON object per event, for log shipping.
    Json,
}

/// Subscriber configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive string; `RUST_LOG` wins when set.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_owned(),
            format: LogFormat::Compact,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }

    #[must_use]
    pub fn filter(mut self, directives: impl Into<String>) -> Self {
        self.filter = directives.into();
        self
    }
}

/// Logging setup failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    /// The filter directive string did not parse.
    InvalidFilter(String),
    /// A global subscriber was already installed.
    AlreadyInitialized,
    /// Built without the `subscriber` feature.
    Unavailable,
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFilter(msg) => write!(f, "invalid log filter: {msg}"),
            Self::AlreadyInitialized => write!(f, "a global tracing subscriber is already set"),
            Self::Unavailable => write!(f, "built without the `subscriber` feature"),
        }
    }
}

impl std::error::Error for LoggingError {}

/// Install a global `tracing` subscriber writing to stdout.
#[cfg(feature = "subscriber")]
pub fn init(config: &LogConfig) -> Result<(), LoggingError> {
    init_with_writer(config, std::io::stdout)
}

/// Install a global `tracing` subscriber writing through `writer`.
///
/// On `wasm32` events carry no timestamp (there is no wall clock to read)
/// and no ANSI colouring.
#[cfg(feature = "subscriber")]
pub fn init_with_writer<W>(config: &LogConfig, writer: W) -> Result<(), LoggingError>
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let env = std::env::var("RUST_LOG").ok();
    let filter = resolve_filter(env.as_deref(), &config.filter)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);
    #[cfg(target_arch = "wasm32")]
    let builder = builder.without_time().with_ansi(false);

    let result = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|_| LoggingError::AlreadyInitialized)
}

/// Non-blank `RUST_LOG` wins over the configured directives.
#[cfg(feature = "subscriber")]
fn resolve_filter(
    env: Option<&str>,
    configured: &str,
) -> Result<tracing_subscriber::EnvFilter, LoggingError> {
    let directives = match env {
        Some(env) if !env.trim().is_empty() => env,
        _ => configured,
    };
    tracing_subscriber::EnvFilter::try_new(directives)
        .map_err(|e| LoggingError::InvalidFilter(e.to_string()))
}

/// Install a global `tracing` subscriber.
#[cfg(not(feature = "subscriber"))]
pub fn init(config: &LogConfig) -> Result<(), LoggingError> {
    let _ = config;
    Err(LoggingError::Unavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_default_filter() {
        let cfg = LogConfig::default();
        assert_eq!(cfg.filter, DEFAULT_FILTER);
        assert_eq!(cfg.format, LogFormat::Compact);
    }

    #[test]
    fn builder_sets_fields() {
        let cfg = LogConfig::default().json().filter("warn");
        assert_eq!(cfg.format, LogFormat::Json);
        assert_eq!(cfg.filter, "warn");
    }

    #[test]
    fn error_messages() {
        assert!(
            LoggingError::InvalidFilter("x".into())
                .to_string()
                .contains("invalid log filter")
        );
    }

    #[cfg(feature = "subscriber")]
    #[test]
    fn bad_directive_is_rejected() {
        let err = resolve_filter(None, "curtain_core=notalevel").unwrap_err();
        assert!(matches!(err, LoggingError::InvalidFilter(_)), "{err:?}");
        assert!(resolve_filter(None, DEFAULT_FILTER).is_ok());
    }

    #[cfg(feature = "subscriber")]
    #[test]
    fn env_directives_win_over_config() {
        assert!(resolve_filter(Some("debug"), "curtain_core=notalevel").is_ok());
        assert!(resolve_filter(Some("  "), "curtain_core=notalevel").is_err());
    }

    // The only test in this binary that installs the global subscriber.
    #[cfg(feature = "subscriber")]
    #[test]
    fn second_init_reports_already_initialized() {
        let cfg = LogConfig::default().filter("warn");
        assert_eq!(init_with_writer(&cfg, std::io::sink), Ok(()));
        assert_eq!(init(&cfg), Err(LoggingError::AlreadyInitialized));
        assert_eq!(
            init_with_writer(&cfg.clone().json(), std::io::sink),
            Err(LoggingError::AlreadyInitialized)
        );
    }

    #[cfg(not(feature = "subscriber"))]
    #[test]
    fn init_without_feature_is_unavailable() {
        assert_eq!(init(&LogConfig::default()), Err(LoggingError::Unavailable));
    }
}
