use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

const OVERRIDE_VAR: &str = "RUST_LOG";
const CONFIGURED_VAR: &str = "TEAPOIO_LOG_LEVEL";

#[derive(Debug)]
pub enum TelemetryError {
    InvalidFilter {
        variable: &'static str,
        directives: String,
        source: ParseError,
    },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter {
                variable,
                directives,
                ..
            } => write!(f, "{variable}='{directives}' is not a usable log filter"),
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "a log subscriber is already active: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// Install the global subscriber on stderr so command output on stdout stays
/// clean.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let override_directives = std::env::var(OVERRIDE_VAR).ok();
    let filter = log_filter(override_directives.as_deref(), &config.log_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

/// A non-blank `RUST_LOG` replaces the configured level. Either one is
/// reported by name when it does not parse.
fn log_filter(
    override_directives: Option<&str>,
    configured: &str,
) -> Result<EnvFilter, TelemetryError> {
    let (variable, directives) = match override_directives.map(str::trim) {
        Some(directives) if !directives.is_empty() => (OVERRIDE_VAR, directives),
        _ => (CONFIGURED_VAR, configured.trim()),
    };

    EnvFilter::try_new(directives).map_err(|source| TelemetryError::InvalidFilter {
        variable,
        directives: directives.to_string(),
        source,
    })
}
