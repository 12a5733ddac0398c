use serde::Serialize;
use thiserror::Error;

/// Validation failures reported by the forecasters.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForecastError {
    #[error("at least {required} sprints of history are required, got {available}")]
    InsufficientData { required: usize, available: usize },
    #[error("invalid value {value} at sprint index {index}: values must be finite and non-negative")]
    InvalidInput { index: usize, value: f64 },
    #[error("iterations must be greater than zero")]
    InvalidIterations,
    #[error("horizons must be a non-empty list of positive sprint counts, got {horizons:?}")]
    InvalidHorizon { horizons: Vec<u32> },
}

/// A serializable success-or-failure record for forecast responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Success(T),
    Failure { error: ForecastError },
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn into_result(self) -> Result<T, ForecastError> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure { error } => Err(error),
        }
    }
}

impl<T> From<Result<T, ForecastError>> for Outcome<T> {
    fn from(result: Result<T, ForecastError>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(error) => Outcome::Failure { error },
        }
    }
}
