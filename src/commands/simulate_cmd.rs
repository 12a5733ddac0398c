use std::process::ExitCode;

use sprint_forecasts::services::contributor_aggregation::{
    aggregate_contributors, contributor_statistics,
};
use sprint_forecasts::services::simulation::simulate_with_source;
use sprint_forecasts::services::simulation_types::SimulationOptions;
use sprint_forecasts::services::ticket_yaml::load_tickets_from_yaml_file;

use crate::commands::base_commands::SimulateArgs;
use crate::commands::output::{unit_source, write_yaml};
use crate::commands::report_format::format_simulation_report;

pub fn simulate_command(args: SimulateArgs) -> ExitCode {
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

    let record = aggregate_contributors(&tickets, &window);
    let statistics = contributor_statistics(&record);
    let options = SimulationOptions {
        iterations: args.iterations,
        excluded_contributors: args.exclude,
        sampling_mode: args.mode,
    };

    let mut source = unit_source(args.seed);
    let simulation = match simulate_with_source(&statistics, &options, &mut source) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Failed to simulate next sprint: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", format_simulation_report(&simulation, &window));

    if let Some(output) = args.output {
        if let Err(e) = write_yaml(&output, &simulation) {
            eprintln!("Failed to write simulation output: {e}");
            return ExitCode::FAILURE;
        }
        println!("Simulation result written to {output}");
    }
    ExitCode::SUCCESS
}
