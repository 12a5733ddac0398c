use std::process::ExitCode;

use sprint_forecasts::services::forecast_config::{ForecastConfig, load_forecast_config};
use sprint_forecasts::services::forecast_request::{ForecastRequest, run_forecast};
use sprint_forecasts::services::ticket_yaml::load_tickets_from_yaml_file;

use crate::commands::base_commands::ForecastArgs;
use crate::commands::output::{unit_source, write_json, write_yaml};
use crate::commands::report_format::format_forecast_report;

pub fn forecast_command(args: ForecastArgs) -> ExitCode {
    let config = match args.config.as_deref().map(load_forecast_config) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            eprintln!("Failed to load forecast config: {e}");
            return ExitCode::FAILURE;
        }
        None => ForecastConfig::default(),
    };

    let tickets = match load_tickets_from_yaml_file(&args.input) {
        Ok(tickets) => tickets,
        Err(e) => {
            eprintln!("Failed to load tickets: {e}");
            return ExitCode::FAILURE;
        }
    };

    let request = match ForecastRequest::from_config(&config, &tickets) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Failed to select sprints: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut source = unit_source(args.seed.or(config.seed));
    let report = run_forecast(&tickets, &request, &mut source);
    println!("{}", format_forecast_report(&report));

    if let Some(output) = args.output {
        let written = if args.json {
            write_json(&output, &report)
        } else {
            write_yaml(&output, &report)
        };
        if let Err(e) = written {
            eprintln!("Failed to write forecast report: {e}");
            return ExitCode::FAILURE;
        }
        println!("Forecast report written to {output}");
    }
    ExitCode::SUCCESS
}
