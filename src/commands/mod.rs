pub mod base_commands;
pub mod forecast_cmd;
pub mod horizons_cmd;
pub mod output;
pub mod report_format;
pub mod simulate_cmd;
