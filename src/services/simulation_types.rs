use serde::{Deserialize, Serialize};

pub const DEFAULT_ITERATIONS: usize = 10_000;

/// How a contributor's next-sprint output is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SamplingMode {
    /// Resample one of the contributor's past sprints, idle sprints included.
    #[default]
    Historical,
    /// Draw from a normal distribution fitted to the active sprints.
    Normal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    pub iterations: usize,
    pub excluded_contributors: Vec<String>,
    pub sampling_mode: SamplingMode,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            excluded_contributors: Vec::new(),
            sampling_mode: SamplingMode::Historical,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FrequencyBin {
    pub value: f64,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct MetricDistribution {
    pub p15: f64,
    pub p50: f64,
    pub p85: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub frequencies: Vec<FrequencyBin>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    Pessimistic,
    Realistic,
    Optimistic,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::Pessimistic,
        ScenarioKind::Realistic,
        ScenarioKind::Optimistic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ScenarioKind::Pessimistic => "Pessimistic",
            ScenarioKind::Realistic => "Realistic",
            ScenarioKind::Optimistic => "Optimistic",
        }
    }

    /// Chance, in percent, that the team does better than this scenario.
    pub fn confidence(&self) -> u8 {
        match self {
            ScenarioKind::Pessimistic => 85,
            ScenarioKind::Realistic => 50,
            ScenarioKind::Optimistic => 15,
        }
    }

    pub fn percentile(&self) -> u8 {
        100 - self.confidence()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Scenario {
    pub id: ScenarioKind,
    pub label: String,
    pub confidence: u8,
    pub description: String,
    pub throughput: f64,
    pub story_points: f64,
}

impl Scenario {
    pub fn new(kind: ScenarioKind, throughput: f64, story_points: f64) -> Self {
        Self {
            id: kind,
            label: kind.label().to_string(),
            confidence: kind.confidence(),
            description: format!("{}% chance of doing better", kind.confidence()),
            throughput,
            story_points,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub iterations: usize,
    pub sampling_mode: SamplingMode,
    pub excluded_contributors: Vec<String>,
    /// Empty when nobody was left to simulate; every figure is then zero.
    pub contributors_simulated: Vec<String>,
    pub throughput: MetricDistribution,
    pub story_points: MetricDistribution,
    pub scenarios: Vec<Scenario>,
}

impl SimulationResult {
    pub fn has_active_contributors(&self) -> bool {
        !self.contributors_simulated.is_empty()
    }

    pub fn scenario(&self, kind: ScenarioKind) -> Option<&Scenario> {
        self.scenarios.iter().find(|scenario| scenario.id == kind)
    }
}
