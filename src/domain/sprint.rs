use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::domain::ticket::Ticket;

pub const SPRINT_LENGTH_DAYS: u32 = 14;

/// Converts a horizon expressed in sprints into calendar weeks.
pub fn weeks(sprints: u32) -> u32 {
    sprints.saturating_mul(SPRINT_LENGTH_DAYS / 7)
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SprintWindowError {
    #[error("sprint window is empty")]
    Empty,
    #[error("sprint numbers must be positive")]
    ZeroSprint,
    #[error("sprint window must be strictly ascending: {previous} is followed by {next}")]
    NotAscending { previous: u32, next: u32 },
    #[error("no finished tickets reference any sprint")]
    NoSprintHistory,
}

/// The sprints under analysis, sorted and free of duplicates.
///
/// Aggregations index into dense arrays by position within the window; a
/// sprint number outside the window has no position and is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SprintWindow {
    sprints: Vec<u32>,
}

impl SprintWindow {
    pub fn new(sprints: Vec<u32>) -> Result<Self, SprintWindowError> {
        if sprints.is_empty() {
            return Err(SprintWindowError::Empty);
        }
        if sprints.contains(&0) {
            return Err(SprintWindowError::ZeroSprint);
        }
        for pair in sprints.windows(2) {
            if pair[0] >= pair[1] {
                return Err(SprintWindowError::NotAscending {
                    previous: pair[0],
                    next: pair[1],
                });
            }
        }
        Ok(Self { sprints })
    }

    /// The `count` most recent sprints referenced by finished tickets.
    pub fn latest(tickets: &[Ticket], count: usize) -> Result<Self, SprintWindowError> {
        if count == 0 {
            return Err(SprintWindowError::Empty);
        }
        let seen: BTreeSet<u32> = tickets
            .iter()
            .filter(|ticket| ticket.is_finished)
            .flat_map(|ticket| ticket.sprints.iter().copied())
            .filter(|sprint| *sprint > 0)
            .collect();
        if seen.is_empty() {
            return Err(SprintWindowError::NoSprintHistory);
        }
        let skip = seen.len().saturating_sub(count);
        Self::new(seen.into_iter().skip(skip).collect())
    }

    pub fn position(&self, sprint: u32) -> Option<usize> {
        self.sprints.binary_search(&sprint).ok()
    }

    pub fn sprints(&self) -> &[u32] {
        &self.sprints
    }

    pub fn len(&self) -> usize {
        self.sprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprints.is_empty()
    }
}
