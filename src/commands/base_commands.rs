use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use sprint_forecasts::domain::metric::Metric;
use sprint_forecasts::services::forecast_config::{DEFAULT_WINDOW_SPRINTS, WindowConfig};
use sprint_forecasts::services::horizon_forecast::DEFAULT_HORIZONS;
use sprint_forecasts::services::simulation_types::{DEFAULT_ITERATIONS, SamplingMode};

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Forecast next-sprint output by resampling each contributor's history
    Simulate(SimulateArgs),
    /// Project team output over several future sprint horizons
    Horizons(HorizonsArgs),
    /// Run both forecasts from a config file and write a full report
    Forecast(ForecastArgs),
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    /// Comma-separated sprint numbers to analyze
    #[arg(long, value_delimiter = ',', conflicts_with = "last")]
    pub sprints: Option<Vec<u32>>,
    /// Analyze the latest N sprints found in the tickets
    #[arg(long, default_value_t = DEFAULT_WINDOW_SPRINTS)]
    pub last: usize,
}

impl WindowArgs {
    pub fn to_config(&self) -> WindowConfig {
        WindowConfig {
            sprints: self.sprints.clone(),
            last: self.last,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Tickets YAML file
    #[arg(short, long)]
    pub input: String,
    /// Optional output YAML file
    #[arg(short, long)]
    pub output: Option<String>,
    #[command(flatten)]
    pub window: WindowArgs,
    /// Number of simulation iterations
    #[arg(short = 'n', long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: usize,
    /// Comma-separated contributors to leave out (e.g. planned absences)
    #[arg(short, long, value_delimiter = ',')]
    pub exclude: Vec<String>,
    /// How each contributor's output is drawn
    #[arg(short, long, value_enum, default_value_t = SamplingMode::Historical)]
    pub mode: SamplingMode,
    /// Seed for a reproducible simulation
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct HorizonsArgs {
    /// Tickets YAML file
    #[arg(short, long)]
    pub input: String,
    /// Optional output YAML file
    #[arg(short, long)]
    pub output: Option<String>,
    #[command(flatten)]
    pub window: WindowArgs,
    /// Team series to project
    #[arg(long, value_enum, default_value_t = Metric::Throughput)]
    pub metric: Metric,
    /// Give the last two sprints half of the total weight
    #[arg(long)]
    pub weighting: bool,
    /// Drop unusually low sprints before projecting
    #[arg(long)]
    pub exclude_outliers: bool,
    /// Comma-separated horizon lengths in sprints
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_HORIZONS.to_vec())]
    pub horizons: Vec<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct ForecastArgs {
    /// Tickets YAML file
    #[arg(short, long)]
    pub input: String,
    /// Forecast config YAML file
    #[arg(short, long)]
    pub config: Option<String>,
    /// Optional output file for the full report
    #[arg(short, long)]
    pub output: Option<String>,
    /// Write the report as JSON instead of YAML
    #[arg(long)]
    pub json: bool,
    /// Seed for a reproducible simulation, overriding the config
    #[arg(long)]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulate_defaults_match_engine_defaults() {
        let args = CliArgs::parse_from(["sprint-forecasts", "simulate", "-i", "tickets.yaml"]);

        if let Commands::Simulate(args) = args.command {
            assert_eq!(args.iterations, 10_000);
            assert_eq!(args.mode, SamplingMode::Historical);
            assert!(args.exclude.is_empty());
            assert_eq!(args.window.last, 6);
            assert_eq!(args.window.sprints, None);
        } else {
            panic!("expected simulate command");
        }
    }

    #[test]
    fn horizons_parse_comma_separated_lists() {
        let args = CliArgs::parse_from([
            "sprint-forecasts",
            "horizons",
            "-i",
            "tickets.yaml",
            "--sprints",
            "3,4,5",
            "--horizons",
            "1,3",
            "--metric",
            "story-points",
            "--weighting",
        ]);

        if let Commands::Horizons(args) = args.command {
            assert_eq!(args.window.sprints, Some(vec![3, 4, 5]));
            assert_eq!(args.horizons, vec![1, 3]);
            assert_eq!(args.metric, Metric::StoryPoints);
            assert!(args.weighting);
            assert!(!args.exclude_outliers);
        } else {
            panic!("expected horizons command");
        }
    }

    #[test]
    fn horizons_default_to_standard_list() {
        let args = CliArgs::parse_from(["sprint-forecasts", "horizons", "-i", "tickets.yaml"]);
        if let Commands::Horizons(args) = args.command {
            assert_eq!(args.horizons, vec![1, 2, 3, 4, 6]);
        } else {
            panic!("expected horizons command");
        }
    }

    #[test]
    fn sprints_and_last_conflict() {
        let result = CliArgs::try_parse_from([
            "sprint-forecasts",
            "simulate",
            "-i",
            "tickets.yaml",
            "--sprints",
            "1,2",
            "--last",
            "4",
        ]);
        assert!(result.is_err());
    }
}
