use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::domain::metric::Metric;
use crate::domain::sprint::{SprintWindow, SprintWindowError};
use crate::domain::ticket::{Ticket, latest_closure_date};
use crate::services::contributor_aggregation::{
    ContributorStatistics, aggregate_contributors, contributor_statistics,
};
use crate::services::forecast_config::ForecastConfig;
use crate::services::forecast_error::Outcome;
use crate::services::horizon_forecast::{HorizonOptions, HorizonResult, forecast_horizons};
use crate::services::random_source::UnitSource;
use crate::services::simulation::simulate_with_source;
use crate::services::simulation_types::{SimulationOptions, SimulationResult};
use crate::services::team_series::{TeamSeries, team_series};

/// A fully resolved forecast request.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub window: SprintWindow,
    pub metric: Metric,
    pub simulation: SimulationOptions,
    pub horizons: HorizonOptions,
}

impl ForecastRequest {
    pub fn from_config(config: &ForecastConfig, tickets: &[Ticket]) -> Result<Self, SprintWindowError> {
        Ok(Self {
            window: config.window.resolve(tickets)?,
            metric: config.metric,
            simulation: config.simulation.clone(),
            horizons: config.horizons.clone(),
        })
    }
}

/// Both forecasts for one ticket set, each succeeding or failing on its own.
#[derive(Serialize, Debug, Clone)]
pub struct ForecastReport {
    pub sprints: SprintWindow,
    pub data_through: Option<NaiveDate>,
    pub contributors: Vec<ContributorStatistics>,
    pub team_series: TeamSeries,
    pub simulation: Outcome<SimulationResult>,
    pub horizons: Outcome<HorizonResult>,
}

impl ForecastReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn run_forecast<S: UnitSource + ?Sized>(
    tickets: &[Ticket],
    request: &ForecastRequest,
    source: &mut S,
) -> ForecastReport {
    let record = aggregate_contributors(tickets, &request.window);
    let contributors = contributor_statistics(&record);
    let series = team_series(&record, request.metric);
    info!(
        contributors = contributors.len(),
        sprints = request.window.len(),
        series = series.len(),
        "running forecast"
    );

    let simulation = simulate_with_source(&contributors, &request.simulation, source).into();
    let horizons = forecast_horizons(&series.values, &request.horizons).into();

    ForecastReport {
        sprints: request.window.clone(),
        data_through: latest_closure_date(tickets),
        contributors,
        team_series: series,
        simulation,
        horizons,
    }
}
