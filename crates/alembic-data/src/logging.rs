//! Log level parsing and subscriber setup.
//!
//! Level names follow spdlog: `trace`, `debug`, `info`, `warn`, `err`,
//! `critical`, `off`. `warning` and `error` are accepted too. Initialization is
//! idempotent; the first call wins.

use crate::schema::DebugConfig;
use std::fmt;
use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Severity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Critical,
    Off,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
            LogLevel::Off => "off",
        }
    }

    /// The `EnvFilter` directive for this level. `tracing` has no level above
    /// error, so critical filters as error.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Critical => "error",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}'")]
pub struct UnknownLevel(pub String);

impl FromStr for LogLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "err" | "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            "off" => Ok(LogLevel::Off),
            _ => Err(UnknownLevel(s.to_string())),
        }
    }
}

/// Resolved log thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LogLevel,
    /// Severity at which buffered host sinks should flush. The stdout
    /// subscriber installed here writes through and ignores it.
    pub flush_level: LogLevel,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            flush_level: LogLevel::Trace,
        }
    }
}

impl LogSettings {
    /// Read the `debug` section. Missing or unknown names keep the defaults.
    pub fn from_config(config: &DebugConfig) -> Self {
        let defaults = Self::default();
        let parse = |name: &Option<String>, fallback: LogLevel| {
            name.as_deref()
                .and_then(|n| n.parse().ok())
                .unwrap_or(fallback)
        };
        Self {
            level: parse(&config.log_level, defaults.level),
            flush_level: parse(&config.flush_level, defaults.flush_level),
        }
    }

    pub fn env_filter_string(&self) -> String {
        self.level.directive().to_string()
    }
}

static TRACING_INIT: Once = Once::new();

/// Install the global `fmt` subscriber (idempotent, first call wins).
///
/// `RUST_LOG` overrides the configured level when set. Returns `true` only if
/// this call installed the subscriber; `false` when an earlier call ran or
/// another global subscriber was already set.
pub fn init_logging(settings: &LogSettings) -> bool {
    let filter_str = settings.env_filter_string();
    let mut installed = false;
    TRACING_INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact();

        match subscriber.try_init() {
            Ok(()) => installed = true,
            // The embedding host owns the global subscriber; its filter applies.
            Err(e) => tracing::warn!(
                error = %e,
                level = %settings.level,
                "Global subscriber already set, configured log level not applied"
            ),
        }
    });
    if installed {
        tracing::info!(
            level = %settings.level,
            flush = %settings.flush_level,
            "Logging initialized"
        );
    }
    installed
}
