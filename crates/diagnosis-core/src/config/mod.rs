use crate::workflows::diagnosis::{ScenarioDefinition, ScenarioError};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
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
    pub telemetry: TelemetryConfig,
    pub diagnosis: DiagnosisConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let ansi = match env::var("APP_LOG_ANSI") {
            Ok(value) => parse_flag("APP_LOG_ANSI", &value)?,
            Err(_) => false,
        };

        let scenario_path = match env::var("DIAGNOSIS_SCENARIO_PATH") {
            Ok(value) if !value.trim().is_empty() => {
                let path = PathBuf::from(value.trim());
                if !path.is_file() {
                    return Err(ConfigError::ScenarioNotFound(path));
                }
                Some(path)
            }
            _ => None,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level, ansi },
            diagnosis: DiagnosisConfig { scenario_path },
        })
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Which scenario definition the diagnosis runs against.
#[derive(Debug, Clone, Default)]
pub struct DiagnosisConfig {
    pub scenario_path: Option<PathBuf>,
}

impl DiagnosisConfig {
    /// Loads the configured scenario file, or the built-in standard scenario.
    pub fn load_scenario(&self) -> Result<ScenarioDefinition, ScenarioError> {
        match &self.scenario_path {
            Some(path) => ScenarioDefinition::from_path(path),
            None => Ok(ScenarioDefinition::standard()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidFlag { name: &'static str, value: String },
    ScenarioNotFound(PathBuf),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be a boolean flag, got '{value}'")
            }
            ConfigError::ScenarioNotFound(path) => write!(
                f,
                "DIAGNOSIS_SCENARIO_PATH points to a missing file: {}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
