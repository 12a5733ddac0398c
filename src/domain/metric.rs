use serde::{Deserialize, Serialize};

/// Which per-sprint quantity a team series is built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Throughput,
    StoryPoints,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Throughput => "Throughput",
            Metric::StoryPoints => "Story points",
        }
    }
}
