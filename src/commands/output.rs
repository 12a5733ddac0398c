use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use thiserror::Error;

use sprint_forecasts::services::random_source::RngSource;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to serialize yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to serialize json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write output file: {0}")]
    Write(#[from] std::io::Error),
}

/// Seeded generator when a seed is given, otherwise one seeded from entropy.
pub fn unit_source(seed: Option<u64>) -> RngSource<StdRng> {
    match seed {
        Some(seed) => RngSource::new(StdRng::seed_from_u64(seed)),
        None => RngSource::new(StdRng::from_entropy()),
    }
}

pub fn write_yaml<T: Serialize>(path: &str, value: &T) -> Result<(), OutputError> {
    let yaml = serde_yaml::to_string(value)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
