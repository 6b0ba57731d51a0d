use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::domain::ValidationPolicy;

const DEFAULT_DATA_FILE: &str = "dados.json";

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub storage: StorageConfig,
    pub telemetry: TelemetryConfig,
    pub validation: ValidationPolicy,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("TEAPOIO_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let data_file = env::var("TEAPOIO_DATA_FILE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());

        let log_level = env::var("TEAPOIO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let phone_max_digits = match env::var("TEAPOIO_PHONE_MAX_DIGITS") {
            Ok(raw) => parse_phone_digits(&raw)?,
            Err(_) => ValidationPolicy::default().phone_max_digits(),
        };

        let require_national_id = match env::var("TEAPOIO_REQUIRE_NATIONAL_ID") {
            Ok(raw) => parse_bool("TEAPOIO_REQUIRE_NATIONAL_ID", &raw)?,
            Err(_) => false,
        };

        Ok(Self {
            environment,
            storage: StorageConfig {
                data_file: PathBuf::from(data_file),
            },
            telemetry: TelemetryConfig { log_level },
            validation: ValidationPolicy::new(phone_max_digits, require_national_id),
        })
    }
}

/// Location of the JSON data file.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_file: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPhoneDigits { value: String },
    InvalidBool { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPhoneDigits { value } => write!(
                f,
                "TEAPOIO_PHONE_MAX_DIGITS must be a number between 1 and 255, got '{value}'"
            ),
            ConfigError::InvalidBool { key, value } => {
                write!(f, "{key} must be true or false, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn parse_phone_digits(raw: &str) -> Result<u8, ConfigError> {
    match raw.trim().parse::<u8>() {
        Ok(digits) if digits > 0 => Ok(digits),
        _ => Err(ConfigError::InvalidPhoneDigits {
            value: raw.to_string(),
        }),
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: raw.to_string(),
        }),
    }
}
