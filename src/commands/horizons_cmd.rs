use std::process::ExitCode;

use sprint_forecasts::services::contributor_aggregation::aggregate_contributors;
use sprint_forecasts::services::horizon_forecast::{HorizonOptions, forecast_horizons};
use sprint_forecasts::services::team_series::team_series;
use sprint_forecasts::services::ticket_yaml::load_tickets_from_yaml_file;

use crate::commands::base_commands::HorizonsArgs;
use crate::commands::output::write_yaml;
use crate::commands::report_format::format_horizon_report;

pub fn horizons_command(args: HorizonsArgs) -> ExitCode {
    let tickets = match load_tickets_from_yaml_file(&args.input) {
        Ok(tickets) => tickets,
        Err(e) => {
            eprintln!("Failed to load tickets: {e}");
            return ExitCode::FAILURE;
        }
    };

    let window = match args.window.to_config().resolve(&tickets) {
        Ok(window) => window,
        Err(e) => {
            eprintln!("Failed to select sprints: {e}");
            return ExitCode::FAILURE;
        }
    };

    let series = team_series(&aggregate_contributors(&tickets, &window), args.metric);
    let options = HorizonOptions {
        use_weighting: args.weighting,
        exclude_outliers: args.exclude_outliers,
        horizons: args.horizons,
        ..HorizonOptions::default()
    };

    let result = match forecast_horizons(&series.values, &options) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Failed to forecast horizons: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", format_horizon_report(&result, args.metric));

    if let Some(output) = args.output {
        if let Err(e) = write_yaml(&output, &result) {
            eprintln!("Failed to write horizon output: {e}");
            return ExitCode::FAILURE;
        }
        println!("Horizon forecast written to {output}");
    }
    ExitCode::SUCCESS
}
