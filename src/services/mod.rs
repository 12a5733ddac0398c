pub mod contributor_aggregation;
pub mod forecast_config;
pub mod forecast_error;
pub mod forecast_request;
pub mod horizon_forecast;
pub mod random_source;
pub mod simulation;
pub mod simulation_types;
pub mod stats;
pub mod team_series;
pub mod ticket_yaml;
