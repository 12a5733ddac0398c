use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::metric::Metric;
use crate::domain::sprint::{SprintWindow, SprintWindowError};
use crate::domain::ticket::Ticket;
use crate::services::horizon_forecast::HorizonOptions;
use crate::services::simulation_types::SimulationOptions;

pub const DEFAULT_WINDOW_SPRINTS: usize = 6;

#[derive(Error, Debug)]
pub enum ForecastConfigError {
    #[error("failed to read forecast config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse forecast config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Which sprints to analyze: an explicit list, or else the latest `last`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub sprints: Option<Vec<u32>>,
    pub last: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            sprints: None,
            last: DEFAULT_WINDOW_SPRINTS,
        }
    }
}

impl WindowConfig {
    pub fn resolve(&self, tickets: &[Ticket]) -> Result<SprintWindow, SprintWindowError> {
        match &self.sprints {
            Some(sprints) => SprintWindow::new(sprints.clone()),
            None => SprintWindow::latest(tickets, self.last),
        }
    }
}

/// Everything a forecast run can be tuned with. Every field has a default, so
/// a config file only needs the values it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub window: WindowConfig,
    pub metric: Metric,
    /// Fixed seed for reproducible simulations.
    pub seed: Option<u64>,
    pub simulation: SimulationOptions,
    pub horizons: HorizonOptions,
}

pub fn load_forecast_config<P: AsRef<Path>>(path: P) -> Result<ForecastConfig, ForecastConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ForecastConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    deserialize_forecast_config_from_yaml_str(&contents, path)
}

fn deserialize_forecast_config_from_yaml_str(
    input: &str,
    origin_path: &Path,
) -> Result<ForecastConfig, ForecastConfigError> {
    if input.trim().is_empty() {
        return Ok(ForecastConfig::default());
    }
    serde_yaml::from_str(input).map_err(|source| ForecastConfigError::Parse {
        path: origin_path.to_path_buf(),
        source,
    })
}
