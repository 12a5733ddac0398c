use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A delivered (or not yet delivered) unit of work, as handed over by ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Every sprint the ticket was assigned to, in assignment order.
    pub sprints: Vec<u32>,
    pub is_finished: bool,
    pub closure_date: Option<NaiveDate>,
    pub story_points: f64,
    pub contributor: Option<String>,
}

impl Ticket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contributor name, ignoring blank identifiers.
    pub fn contributor_name(&self) -> Option<&str> {
        self.contributor
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Most recent closure date among finished tickets.
pub fn latest_closure_date(tickets: &[Ticket]) -> Option<NaiveDate> {
    tickets
        .iter()
        .filter(|ticket| ticket.is_finished)
        .filter_map(|ticket| ticket.closure_date)
        .max()
}
