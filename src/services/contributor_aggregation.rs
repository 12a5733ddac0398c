use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::domain::sprint::SprintWindow;
use crate::domain::ticket::Ticket;
use crate::services::stats;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SprintDelivery {
    pub throughput: u32,
    pub story_points: f64,
}

/// Per-contributor deliveries, one slot per sprint of the window.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributorSprintRecord {
    window: SprintWindow,
    contributors: BTreeMap<String, Vec<SprintDelivery>>,
}

impl ContributorSprintRecord {
    pub fn window(&self) -> &SprintWindow {
        &self.window
    }

    /// Contributors in name order with their dense per-sprint deliveries.
    pub fn contributors(&self) -> impl Iterator<Item = (&str, &[SprintDelivery])> {
        self.contributors
            .iter()
            .map(|(name, deliveries)| (name.as_str(), deliveries.as_slice()))
    }

    pub fn deliveries(&self, contributor: &str) -> Option<&[SprintDelivery]> {
        self.contributors.get(contributor).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.contributors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty()
    }
}

/// Groups finished, attributed tickets by contributor and sprint.
///
/// A ticket counts once for every sprint of its assignment history that lies
/// inside the window; sprints outside the window are ignored.
pub fn aggregate_contributors(tickets: &[Ticket], window: &SprintWindow) -> ContributorSprintRecord {
    let mut contributors: BTreeMap<String, Vec<SprintDelivery>> = BTreeMap::new();
    let mut attributed = 0usize;

    for ticket in tickets.iter().filter(|ticket| ticket.is_finished) {
        let Some(name) = ticket.contributor_name() else {
            continue;
        };
        let positions: BTreeSet<usize> = ticket
            .sprints
            .iter()
            .filter_map(|sprint| window.position(*sprint))
            .collect();
        if positions.is_empty() {
            continue;
        }

        let deliveries = contributors
            .entry(name.to_string())
            .or_insert_with(|| vec![SprintDelivery::default(); window.len()]);
        for position in positions {
            deliveries[position].throughput += 1;
            deliveries[position].story_points += ticket.story_points;
        }
        attributed += 1;
    }

    debug!(
        tickets = tickets.len(),
        attributed,
        contributors = contributors.len(),
        sprints = window.len(),
        "aggregated contributor deliveries"
    );

    ContributorSprintRecord {
        window: window.clone(),
        contributors,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricSummary {
    /// One value per analyzed sprint, zero where nothing was delivered.
    pub values: Vec<f64>,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p15: f64,
    pub p50: f64,
    pub p85: f64,
}

/// Read-only view of one contributor's history.
///
/// Summary figures use only the sprints the contributor was active in, so
/// inactive sprints do not dilute their typical output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContributorStatistics {
    pub contributor: String,
    pub sprints_analyzed: usize,
    pub sprints_active: usize,
    pub throughput: MetricSummary,
    pub story_points: MetricSummary,
}

impl ContributorStatistics {
    pub fn is_active(&self) -> bool {
        self.sprints_active > 0
    }
}

pub fn contributor_statistics(record: &ContributorSprintRecord) -> Vec<ContributorStatistics> {
    record
        .contributors()
        .map(|(name, deliveries)| statistics_for(name, deliveries))
        .collect()
}

fn statistics_for(contributor: &str, deliveries: &[SprintDelivery]) -> ContributorStatistics {
    let active: Vec<bool> = deliveries.iter().map(|d| d.throughput > 0).collect();
    let throughput: Vec<f64> = deliveries.iter().map(|d| f64::from(d.throughput)).collect();
    let story_points: Vec<f64> = deliveries.iter().map(|d| d.story_points).collect();

    ContributorStatistics {
        contributor: contributor.to_string(),
        sprints_analyzed: deliveries.len(),
        sprints_active: active.iter().filter(|flag| **flag).count(),
        throughput: summarize(throughput, &active),
        story_points: summarize(story_points, &active),
    }
}

fn summarize(values: Vec<f64>, active: &[bool]) -> MetricSummary {
    let mut scored: Vec<f64> = values
        .iter()
        .zip(active)
        .filter(|(_, is_active)| **is_active)
        .map(|(value, _)| *value)
        .collect();
    scored.sort_by(f64::total_cmp);

    MetricSummary {
        mean: stats::mean(&scored),
        std_dev: stats::std_dev(&scored),
        min: scored.first().copied().unwrap_or(0.0),
        max: scored.last().copied().unwrap_or(0.0),
        p15: stats::percentile_sorted(&scored, 15.0),
        p50: stats::percentile_sorted(&scored, 50.0),
        p85: stats::percentile_sorted(&scored, 85.0),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{build_done_ticket, build_history, build_open_ticket};

    fn window(sprints: &[u32]) -> SprintWindow {
        SprintWindow::new(sprints.to_vec()).unwrap()
    }

    #[test]
    fn only_finished_attributed_in_window_tickets_count() {
        let mut anonymous = build_done_ticket("", &[1], 3.0);
        anonymous.contributor = None;
        let tickets = vec![
            build_done_ticket("alice", &[1], 3.0),
            build_done_ticket("alice", &[9], 5.0),
            build_open_ticket("alice", &[1], 8.0),
            anonymous,
        ];

        let record = aggregate_contributors(&tickets, &window(&[1, 2]));
        assert_eq!(record.len(), 1);
        let deliveries = record.deliveries("alice").unwrap();
        assert_eq!(deliveries[0].throughput, 1);
        assert_eq!(deliveries[0].story_points, 3.0);
        assert_eq!(deliveries[1], SprintDelivery::default());
    }

    #[test]
    fn carried_over_ticket_counts_in_each_window_sprint() {
        let tickets = vec![build_done_ticket("bob", &[2, 3, 3, 4], 2.0)];

        let record = aggregate_contributors(&tickets, &window(&[1, 2, 3]));
        let deliveries = record.deliveries("bob").unwrap();
        let throughput: Vec<u32> = deliveries.iter().map(|d| d.throughput).collect();
        assert_eq!(throughput, vec![0, 1, 1]);
        assert_eq!(deliveries[2].story_points, 2.0);
    }

    #[test]
    fn window_gaps_are_zero_filled() {
        let mut tickets = build_history("carol", 4, &[2, 0, 0, 1], 1.0);
        tickets.push(build_done_ticket("carol", &[10], 1.0));

        let record = aggregate_contributors(&tickets, &window(&[4, 5, 7, 10]));
        let throughput: Vec<u32> = record
            .deliveries("carol")
            .unwrap()
            .iter()
            .map(|d| d.throughput)
            .collect();
        assert_eq!(throughput, vec![2, 0, 1, 1]);
    }

    #[test]
    fn statistics_score_only_active_sprints() {
        // Active in 2 of 6 sprints with 4 and 6 tickets.
        let tickets = build_history("dave", 1, &[0, 4, 0, 0, 6, 0], 2.0);
        let record = aggregate_contributors(&tickets, &window(&[1, 2, 3, 4, 5, 6]));

        let stats = contributor_statistics(&record);
        assert_eq!(stats.len(), 1);
        let dave = &stats[0];
        assert_eq!(dave.contributor, "dave");
        assert_eq!(dave.sprints_analyzed, 6);
        assert_eq!(dave.sprints_active, 2);
        assert!(dave.sprints_active <= dave.sprints_analyzed);
        assert_eq!(dave.throughput.values, vec![0.0, 4.0, 0.0, 0.0, 6.0, 0.0]);
        assert_eq!(dave.throughput.mean, 5.0);
        assert_eq!(dave.throughput.std_dev, 1.0);
        assert_eq!(dave.throughput.min, 4.0);
        assert_eq!(dave.throughput.max, 6.0);
        assert_eq!(dave.throughput.p50, 5.0);
        assert_eq!(dave.story_points.mean, 10.0);
        assert!(dave.is_active());
    }

    #[test]
    fn contributors_are_reported_in_name_order() {
        let tickets = vec![
            build_done_ticket("zoe", &[1], 1.0),
            build_done_ticket("adam", &[1], 1.0),
        ];
        let record = aggregate_contributors(&tickets, &window(&[1]));
        let names: Vec<String> = contributor_statistics(&record)
            .into_iter()
            .map(|stats| stats.contributor)
            .collect();
        assert_eq!(names, vec!["adam", "zoe"]);
    }
}
