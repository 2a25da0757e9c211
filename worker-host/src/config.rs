use std::{path::Path, time::Duration};

use serde::Deserialize;
use worker_runtime::SCOPED_WRITER;

use crate::cmd::Cli;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Interval must be at least one second")]
    ZeroInterval,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkerConfig {
    pub interval_secs: u64,
    pub service_name: String,
    pub log_level: String,
    pub otel_stdout: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            service_name: SCOPED_WRITER.to_string(),
            log_level: "info".to_string(),
            otel_stdout: false,
        }
    }
}

impl WorkerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Defaults, then the config file if one is given, then command line flags.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(interval_secs) = cli.interval_secs {
            config.interval_secs = interval_secs;
        }

        if let Some(service) = &cli.service {
            config.service_name = service.clone();
        }

        if let Some(log_level) = &cli.log_level {
            config.log_level = log_level.clone();
        }

        config.otel_stdout |= cli.otel_stdout;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        Ok(())
    }
}
