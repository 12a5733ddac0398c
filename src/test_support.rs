use chrono::NaiveDate;

use crate::domain::ticket::Ticket;
use crate::services::random_source::UnitSource;

/// A scripted unit source that cycles through fixed draws.
pub struct SequenceSource {
    values: Vec<f64>,
    index: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, index: 0 }
    }
}

impl UnitSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        value
    }
}

pub fn on_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn build_done_ticket(contributor: &str, sprints: &[u32], points: f64) -> Ticket {
    let mut ticket = Ticket::new();
    ticket.sprints = sprints.to_vec();
    ticket.is_finished = true;
    ticket.story_points = points;
    ticket.contributor = Some(contributor.to_string());
    ticket
}

pub fn build_open_ticket(contributor: &str, sprints: &[u32], points: f64) -> Ticket {
    let mut ticket = build_done_ticket(contributor, sprints, points);
    ticket.is_finished = false;
    ticket
}

/// `per_sprint[i]` finished tickets worth `points` each in sprint `first + i`.
pub fn build_history(contributor: &str, first: u32, per_sprint: &[u32], points: f64) -> Vec<Ticket> {
    per_sprint
        .iter()
        .enumerate()
        .flat_map(|(offset, count)| {
            let sprint = first + offset as u32;
            (0..*count).map(move |_| build_done_ticket(contributor, &[sprint], points))
        })
        .collect()
}
