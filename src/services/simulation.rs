use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::services::contributor_aggregation::{ContributorStatistics, MetricSummary};
use crate::services::forecast_error::ForecastError;
use crate::services::random_source::{RngSource, UnitSource, pick_index, standard_normal};
use crate::services::simulation_types::{
    FrequencyBin, MetricDistribution, SamplingMode, Scenario, ScenarioKind, SimulationOptions,
    SimulationResult,
};
use crate::services::stats;

/// Monte Carlo forecast of the next sprint using an entropy-seeded generator.
pub fn simulate(
    contributors: &[ContributorStatistics],
    options: &SimulationOptions,
) -> Result<SimulationResult, ForecastError> {
    let mut source = RngSource::new(StdRng::from_entropy());
    simulate_with_source(contributors, options, &mut source)
}

/// Monte Carlo forecast of the next sprint.
///
/// Each iteration draws one sprint's output per contributor and sums the draws
/// into a team total. Excluded and never-active contributors are skipped; if
/// nobody remains the result is all zeros with no simulated contributors.
pub fn simulate_with_source<S: UnitSource + ?Sized>(
    contributors: &[ContributorStatistics],
    options: &SimulationOptions,
    source: &mut S,
) -> Result<SimulationResult, ForecastError> {
    if options.iterations == 0 {
        return Err(ForecastError::InvalidIterations);
    }

    let excluded = excluded_names(&options.excluded_contributors);
    let team: Vec<&ContributorStatistics> = contributors
        .iter()
        .filter(|stats| !excluded.contains(&stats.contributor))
        .filter(|stats| stats.is_active())
        .collect();

    if team.is_empty() {
        warn!(
            contributors = contributors.len(),
            excluded = excluded.len(),
            "no active contributors left to simulate, returning a zero forecast"
        );
        return Ok(zero_result(options, excluded));
    }

    info!(
        iterations = options.iterations,
        contributors = team.len(),
        mode = ?options.sampling_mode,
        "running resampling simulation"
    );

    let mut throughput_samples = Vec::with_capacity(options.iterations);
    let mut story_point_samples = Vec::with_capacity(options.iterations);
    for _ in 0..options.iterations {
        let (throughput, story_points) = simulate_single_sprint(&team, options.sampling_mode, source);
        throughput_samples.push(throughput);
        story_point_samples.push(story_points);
    }

    let throughput = distribution_from_samples(throughput_samples);
    let story_points = distribution_from_samples(story_point_samples);
    info!(
        p15 = throughput.p15,
        p50 = throughput.p50,
        p85 = throughput.p85,
        "simulation finished"
    );

    Ok(SimulationResult {
        iterations: options.iterations,
        sampling_mode: options.sampling_mode,
        excluded_contributors: excluded,
        contributors_simulated: team.iter().map(|stats| stats.contributor.clone()).collect(),
        scenarios: scenarios_from(&throughput, &story_points),
        throughput,
        story_points,
    })
}

/// Exclusions matched the way ticket contributors are: trimmed, blanks dropped.
fn excluded_names(names: &[String]) -> Vec<String> {
    let mut excluded: Vec<String> = Vec::new();
    for name in names.iter().map(|name| name.trim()).filter(|name| !name.is_empty()) {
        if !excluded.iter().any(|seen| seen == name) {
            excluded.push(name.to_string());
        }
    }
    excluded
}

fn simulate_single_sprint<S: UnitSource + ?Sized>(
    team: &[&ContributorStatistics],
    mode: SamplingMode,
    source: &mut S,
) -> (f64, f64) {
    let mut throughput = 0.0;
    let mut story_points = 0.0;
    for member in team {
        match mode {
            SamplingMode::Historical => {
                // Same past sprint for both metrics keeps points tied to tickets.
                let sprint = pick_index(source, member.throughput.values.len());
                throughput += member.throughput.values.get(sprint).copied().unwrap_or(0.0);
                story_points += member.story_points.values.get(sprint).copied().unwrap_or(0.0);
            }
            SamplingMode::Normal => {
                throughput += sample_normal(&member.throughput, source);
                story_points += sample_normal(&member.story_points, source);
            }
        }
    }
    (throughput, story_points)
}

fn sample_normal<S: UnitSource + ?Sized>(summary: &MetricSummary, source: &mut S) -> f64 {
    let value = summary.mean + summary.std_dev * standard_normal(source);
    value.max(0.0).round()
}

fn distribution_from_samples(mut samples: Vec<f64>) -> MetricDistribution {
    samples.sort_by(f64::total_cmp);
    let total = samples.len() as f64;
    let frequencies = samples
        .chunk_by(|a, b| a == b)
        .map(|run| FrequencyBin {
            value: run[0],
            count: run.len(),
            percentage: run.len() as f64 / total * 100.0,
        })
        .collect();

    MetricDistribution {
        p15: stats::percentile_sorted(&samples, 15.0),
        p50: stats::percentile_sorted(&samples, 50.0),
        p85: stats::percentile_sorted(&samples, 85.0),
        mean: stats::mean(&samples),
        std_dev: stats::std_dev(&samples),
        frequencies,
    }
}

fn scenarios_from(throughput: &MetricDistribution, story_points: &MetricDistribution) -> Vec<Scenario> {
    ScenarioKind::ALL
        .iter()
        .map(|kind| {
            let pick = |distribution: &MetricDistribution| match kind {
                ScenarioKind::Pessimistic => distribution.p15,
                ScenarioKind::Realistic => distribution.p50,
                ScenarioKind::Optimistic => distribution.p85,
            };
            Scenario::new(*kind, pick(throughput), pick(story_points))
        })
        .collect()
}

fn zero_result(options: &SimulationOptions, excluded: Vec<String>) -> SimulationResult {
    let throughput = MetricDistribution::default();
    let story_points = MetricDistribution::default();
    SimulationResult {
        iterations: options.iterations,
        sampling_mode: options.sampling_mode,
        excluded_contributors: excluded,
        contributors_simulated: Vec::new(),
        scenarios: scenarios_from(&throughput, &story_points),
        throughput,
        story_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sprint::SprintWindow;
    use crate::services::contributor_aggregation::{aggregate_contributors, contributor_statistics};
    use crate::test_support::{SequenceSource, build_history};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn team_stats(histories: &[(&str, &[u32])]) -> Vec<ContributorStatistics> {
        let mut tickets = Vec::new();
        let mut sprint_count = 0;
        for (name, per_sprint) in histories {
            tickets.extend(build_history(name, 1, per_sprint, 2.0));
            sprint_count = sprint_count.max(per_sprint.len() as u32);
        }
        let window = SprintWindow::new((1..=sprint_count).collect()).unwrap();
        contributor_statistics(&aggregate_contributors(&tickets, &window))
    }

    fn options(iterations: usize, mode: SamplingMode) -> SimulationOptions {
        SimulationOptions {
            iterations,
            sampling_mode: mode,
            ..SimulationOptions::default()
        }
    }

    #[test]
    fn constant_history_gives_exact_team_total() {
        let stats = team_stats(&[("alice", &[3, 3, 3]), ("bob", &[3, 3, 3]), ("carol", &[3, 3, 3])]);

        for iterations in [1, 7, 500] {
            for mode in [SamplingMode::Historical, SamplingMode::Normal] {
                let mut rng = RngSource::new(StdRng::seed_from_u64(iterations as u64));
                let result = simulate_with_source(&stats, &options(iterations, mode), &mut rng).unwrap();
                assert_eq!(result.throughput.p15, 9.0);
                assert_eq!(result.throughput.p50, 9.0);
                assert_eq!(result.throughput.p85, 9.0);
                assert_eq!(result.story_points.p50, 18.0);
                assert_eq!(result.iterations, iterations);
            }
        }
    }

    #[test]
    fn historical_mode_resamples_idle_sprints_too() {
        let stats = team_stats(&[("alice", &[4, 0])]);
        // draws pick sprint 0, 1, 0, 1
        let mut source = SequenceSource::new(vec![0.1, 0.9]);
        let result =
            simulate_with_source(&stats, &options(4, SamplingMode::Historical), &mut source).unwrap();

        assert_eq!(result.throughput.frequencies.len(), 2);
        assert_eq!(
            result.throughput.frequencies[0],
            FrequencyBin {
                value: 0.0,
                count: 2,
                percentage: 50.0
            }
        );
        assert_eq!(result.throughput.frequencies[1].value, 4.0);
        assert_eq!(result.throughput.mean, 2.0);
        assert_eq!(result.throughput.std_dev, 2.0);
        assert_eq!(result.story_points.frequencies[1].value, 8.0);
    }

    #[test]
    fn normal_mode_is_floored_and_integral() {
        let stats = team_stats(&[("alice", &[1, 9, 1, 9]), ("bob", &[2, 0, 0, 1])]);
        let mut rng = RngSource::new(StdRng::seed_from_u64(5));
        let result =
            simulate_with_source(&stats, &options(2_000, SamplingMode::Normal), &mut rng).unwrap();

        for bin in &result.throughput.frequencies {
            assert!(bin.value >= 0.0);
            assert_eq!(bin.value, bin.value.round());
        }
        let percentage: f64 = result.throughput.frequencies.iter().map(|bin| bin.percentage).sum();
        assert!((percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn excluded_contributors_are_left_out() {
        let stats = team_stats(&[("alice", &[2, 2]), ("bob", &[5, 5])]);
        let mut simulation_options = options(10, SamplingMode::Historical);
        simulation_options.excluded_contributors = vec!["bob".to_string()];

        let mut rng = RngSource::new(StdRng::seed_from_u64(1));
        let result = simulate_with_source(&stats, &simulation_options, &mut rng).unwrap();
        assert_eq!(result.contributors_simulated, vec!["alice"]);
        assert_eq!(result.excluded_contributors, vec!["bob"]);
        assert_eq!(result.throughput.p85, 2.0);
    }

    #[test]
    fn exclusions_are_trimmed_like_ticket_contributors() {
        let stats = team_stats(&[("alice", &[2, 2]), ("bob", &[5, 5]), ("carol", &[1, 1])]);
        let mut simulation_options = options(10, SamplingMode::Historical);
        simulation_options.excluded_contributors =
            vec!["alice".to_string(), " bob".to_string(), "  ".to_string(), "bob ".to_string()];

        let mut rng = RngSource::new(StdRng::seed_from_u64(3));
        let result = simulate_with_source(&stats, &simulation_options, &mut rng).unwrap();
        assert_eq!(result.contributors_simulated, vec!["carol"]);
        assert_eq!(result.excluded_contributors, vec!["alice", "bob"]);
        assert_eq!(result.throughput.p50, 1.0);
    }

    #[test]
    fn normal_mode_draws_mean_plus_scaled_deviate() {
        // alice: throughput mean 3, sd 1; story points mean 6, sd 2
        let stats = team_stats(&[("alice", &[2, 4])]);
        let deviate = |z: f64, angle: f64| vec![1.0 - (-z * z / 2.0).exp(), angle];

        // u2 = 0 gives z = +1
        let mut source = SequenceSource::new(deviate(1.0, 0.0));
        let result = simulate_with_source(&stats, &options(3, SamplingMode::Normal), &mut source).unwrap();
        assert_eq!(result.throughput.p50, 4.0);
        assert_eq!(result.story_points.p50, 8.0);

        // u2 = 0.5 gives z = -2
        let mut source = SequenceSource::new(deviate(2.0, 0.5));
        let result = simulate_with_source(&stats, &options(3, SamplingMode::Normal), &mut source).unwrap();
        assert_eq!(result.throughput.p50, 1.0);
        assert_eq!(result.story_points.p50, 2.0);

        // z = -4 drives both draws below zero
        let mut source = SequenceSource::new(deviate(4.0, 0.5));
        let result = simulate_with_source(&stats, &options(3, SamplingMode::Normal), &mut source).unwrap();
        assert_eq!(result.throughput.p85, 0.0);
        assert_eq!(result.story_points.p85, 0.0);
    }

    #[test]
    fn entropy_seeded_simulation_runs() {
        let stats = team_stats(&[("alice", &[2, 2, 2]), ("bob", &[1, 1, 1])]);
        let result = simulate(&stats, &options(200, SamplingMode::Historical)).unwrap();
        assert_eq!(result.iterations, 200);
        assert_eq!(result.throughput.p50, 3.0);
        assert_eq!(result.story_points.p50, 6.0);
        assert_eq!(result.throughput.frequencies.len(), 1);
    }

    #[test]
    fn nobody_left_gives_zero_forecast() {
        let stats = team_stats(&[("alice", &[2, 2])]);
        let mut simulation_options = options(10, SamplingMode::Historical);
        simulation_options.excluded_contributors = vec!["alice".to_string()];

        let mut source = SequenceSource::new(vec![0.5]);
        let result = simulate_with_source(&stats, &simulation_options, &mut source).unwrap();
        assert!(!result.has_active_contributors());
        assert_eq!(result.throughput, MetricDistribution::default());
        assert_eq!(result.scenarios.len(), 3);
        assert!(result.scenarios.iter().all(|s| s.throughput == 0.0));
    }

    #[test]
    fn zero_iterations_are_rejected() {
        let stats = team_stats(&[("alice", &[2, 2])]);
        let mut source = SequenceSource::new(vec![0.5]);
        let error =
            simulate_with_source(&stats, &options(0, SamplingMode::Historical), &mut source).unwrap_err();
        assert_eq!(error, ForecastError::InvalidIterations);
    }

    #[test]
    fn scenarios_map_percentiles_in_order() {
        let stats = team_stats(&[("alice", &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10])]);
        let mut rng = RngSource::new(StdRng::seed_from_u64(99));
        let result =
            simulate_with_source(&stats, &options(1_000, SamplingMode::Historical), &mut rng).unwrap();

        let pessimistic = result.scenario(ScenarioKind::Pessimistic).unwrap();
        let realistic = result.scenario(ScenarioKind::Realistic).unwrap();
        let optimistic = result.scenario(ScenarioKind::Optimistic).unwrap();
        assert_eq!(pessimistic.confidence, 85);
        assert_eq!(pessimistic.description, "85% chance of doing better");
        assert_eq!(pessimistic.throughput, result.throughput.p15);
        assert_eq!(realistic.throughput, result.throughput.p50);
        assert_eq!(optimistic.confidence, 15);
        assert_eq!(optimistic.story_points, result.story_points.p85);
        assert!(pessimistic.throughput <= realistic.throughput);
        assert!(realistic.throughput <= optimistic.throughput);
    }
}
