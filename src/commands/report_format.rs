use sprint_forecasts::domain::metric::Metric;
use sprint_forecasts::domain::sprint::SprintWindow;
use sprint_forecasts::services::forecast_error::Outcome;
use sprint_forecasts::services::forecast_request::ForecastReport;
use sprint_forecasts::services::horizon_forecast::HorizonResult;
use sprint_forecasts::services::simulation_types::{SamplingMode, Scenario, SimulationResult};
use sprint_forecasts::services::stats::{StabilityLevel, TrendDirection, TrendStrength};

pub fn format_simulation_report(result: &SimulationResult, window: &SprintWindow) -> String {
    let contributors = if result.has_active_contributors() {
        result.contributors_simulated.join(", ")
    } else {
        "none (zero forecast)".to_string()
    };
    let excluded = if result.excluded_contributors.is_empty() {
        "n/a".to_string()
    } else {
        result.excluded_contributors.join(", ")
    };

    let mut lines = Vec::new();
    lines.push("Simulation Report".to_string());
    lines.push(format!("Sprints: {}", format_sprints(window)));
    lines.push(format!("Iterations: {}", result.iterations));
    lines.push(format!("Sampling mode: {}", sampling_mode_name(result.sampling_mode)));
    lines.push(format!("Contributors: {contributors}"));
    lines.push(format!("Excluded: {excluded}"));
    lines.push(String::new());
    lines.push("Next sprint:".to_string());
    lines.push("Scenario | Confidence | Throughput | Story points".to_string());
    lines.push("---------|------------|------------|-------------".to_string());
    lines.extend(result.scenarios.iter().map(format_scenario_row));

    lines.join("\n")
}

fn format_scenario_row(scenario: &Scenario) -> String {
    format!(
        "{label} | {confidence}% | {throughput:.0} | {points:.1}",
        label = scenario.label,
        confidence = scenario.confidence,
        throughput = scenario.throughput,
        points = scenario.story_points
    )
}

pub fn format_horizon_report(result: &HorizonResult, metric: Metric) -> String {
    let metadata = &result.metadata;
    let outliers = if metadata.outliers.is_empty() {
        "none".to_string()
    } else {
        metadata
            .outliers
            .iter()
            .map(|value| format!("{value}"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut lines = Vec::new();
    lines.push("Horizon Report".to_string());
    lines.push(format!("Metric: {}", metric.label()));
    lines.push(format!(
        "Sprints analyzed: {} (used: {})",
        metadata.sprints_analyzed, metadata.sprints_used
    ));
    lines.push(format!("Outliers removed: {outliers}"));
    lines.push(format!(
        "Trend: {} ({}, slope {:.2})",
        trend_direction_name(metadata.trend.direction),
        trend_strength_name(metadata.trend.strength),
        metadata.trend.slope
    ));
    lines.push(format!(
        "Stability: {} (cv {:.2})",
        stability_name(metadata.stability.level),
        metadata.stability.coefficient_of_variation
    ));
    lines.push(format!(
        "Per sprint: mean {:.1}, std dev {:.1}",
        metadata.base_mean, metadata.base_std_dev
    ));
    lines.push(String::new());
    lines.push("Sprints | Weeks | P50 | P85 | P95 | Mean".to_string());
    lines.push("--------|-------|-----|-----|-----|-----".to_string());
    for projection in &result.projections {
        lines.push(format!(
            "{} | {} | {} | {} | {} | {}",
            projection.sprints,
            projection.weeks,
            projection.p50,
            projection.p85,
            projection.p95,
            projection.mean
        ));
    }

    lines.join("\n")
}

pub fn format_forecast_report(report: &ForecastReport) -> String {
    let mut sections = Vec::new();
    if let Some(date) = report.data_through {
        sections.push(format!("Data through: {}", date.format("%Y-%m-%d")));
    }
    sections.push(match &report.simulation {
        Outcome::Success(result) => format_simulation_report(result, &report.sprints),
        Outcome::Failure { error } => format!("Simulation unavailable: {error}"),
    });
    sections.push(match &report.horizons {
        Outcome::Success(result) => format_horizon_report(result, report.team_series.metric),
        Outcome::Failure { error } => format!("Horizon forecast unavailable: {error}"),
    });
    sections.join("\n\n")
}

fn format_sprints(window: &SprintWindow) -> String {
    window
        .sprints()
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn sampling_mode_name(mode: SamplingMode) -> &'static str {
    match mode {
        SamplingMode::Historical => "historical",
        SamplingMode::Normal => "normal",
    }
}

fn trend_direction_name(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Up => "up",
        TrendDirection::Down => "down",
        TrendDirection::Stable => "stable",
    }
}

fn trend_strength_name(strength: TrendStrength) -> &'static str {
    match strength {
        TrendStrength::Strong => "strong",
        TrendStrength::Moderate => "moderate",
        TrendStrength::None => "none",
    }
}

fn stability_name(level: StabilityLevel) -> &'static str {
    match level {
        StabilityLevel::High => "high",
        StabilityLevel::Moderate => "moderate",
        StabilityLevel::Low => "low",
    }
}
