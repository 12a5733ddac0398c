use serde::Serialize;

use crate::domain::metric::Metric;
use crate::services::contributor_aggregation::ContributorSprintRecord;

/// Team totals in ascending sprint order.
///
/// Sprints in which nobody delivered anything are left out rather than
/// recorded as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamSeries {
    pub metric: Metric,
    pub sprints: Vec<u32>,
    pub values: Vec<f64>,
}

impl TeamSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub fn team_series(record: &ContributorSprintRecord, metric: Metric) -> TeamSeries {
    let mut series = TeamSeries {
        metric,
        ..TeamSeries::default()
    };

    for (position, sprint) in record.window().sprints().iter().enumerate() {
        let mut delivered = false;
        let mut total = 0.0;
        for (_, deliveries) in record.contributors() {
            let delivery = deliveries[position];
            delivered |= delivery.throughput > 0;
            total += match metric {
                Metric::Throughput => f64::from(delivery.throughput),
                Metric::StoryPoints => delivery.story_points,
            };
        }
        if delivered {
            series.sprints.push(*sprint);
            series.values.push(total);
        }
    }

    series
}
