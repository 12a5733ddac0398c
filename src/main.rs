mod commands;

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::commands::base_commands::{CliArgs, Commands};
use crate::commands::forecast_cmd::forecast_command;
use crate::commands::horizons_cmd::horizons_command;
use crate::commands::simulate_cmd::simulate_command;

const LOG_ENV: &str = "SPRINT_FORECASTS_LOG";

fn main() -> ExitCode {
    init_tracing();
    let args = CliArgs::parse();
    match args.command {
        Commands::Simulate(args) => simulate_command(args),
        Commands::Horizons(args) => horizons_command(args),
        Commands::Forecast(args) => forecast_command(args),
        Commands::Completions { shell } => {
            let mut command = CliArgs::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
            ExitCode::SUCCESS
        }
    }
}

/// Logs go to stderr so reports on stdout stay clean. Filter with `SPRINT_FORECASTS_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
