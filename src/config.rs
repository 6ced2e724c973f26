//! Environment-driven configuration: where the flat data files live and how
//! verbose logging should be.

use std::env;
use std::path::{Path, PathBuf};

/// Top-level configuration for the engine.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data: DataConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let data_dir = env::var("BTOFLOW_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        if data_dir.trim().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }

        let log_level = env::var("BTOFLOW_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            data: DataConfig {
                data_dir: PathBuf::from(data_dir),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Locations of the six flat record files, one per persisted entity class.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub data_dir: PathBuf,
}

impl DataConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn applicant_file(&self) -> PathBuf {
        self.data_dir.join("applicants.csv")
    }

    pub fn officer_file(&self) -> PathBuf {
        self.data_dir.join("officers.csv")
    }

    pub fn manager_file(&self) -> PathBuf {
        self.data_dir.join("managers.csv")
    }

    pub fn project_file(&self) -> PathBuf {
        self.data_dir.join("projects.csv")
    }

    pub fn application_file(&self) -> PathBuf {
        self.data_dir.join("applications.csv")
    }

    pub fn enquiry_file(&self) -> PathBuf {
        self.data_dir.join("enquiries.csv")
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BTOFLOW_DATA_DIR must not be empty")]
    EmptyDataDir,
}
