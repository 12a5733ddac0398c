use std::io;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::ticket::Ticket;

#[derive(Error, Debug)]
pub enum TicketYamlError {
    #[error("failed to read tickets yaml: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse tickets yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("ticket {index}: invalid closure date {value} (expected YYYY-MM-DD)")]
    InvalidDate { index: usize, value: String },
    #[error("ticket {index}: story points must be non-negative, got {value}")]
    NegativeStoryPoints { index: usize, value: f64 },
    #[error("ticket {index}: sprint numbers must be positive")]
    InvalidSprint { index: usize },
}

#[derive(Debug, Deserialize)]
struct TicketRecord {
    #[serde(default)]
    sprints: Vec<u32>,
    #[serde(default)]
    finished: bool,
    closed: Option<String>,
    story_points: Option<f64>,
    contributor: Option<String>,
}

pub fn load_tickets_from_yaml_file(path: &str) -> Result<Vec<Ticket>, TicketYamlError> {
    let contents = std::fs::read_to_string(path)?;
    deserialize_tickets_from_yaml_str(&contents)
}

pub fn deserialize_tickets_from_yaml_str(input: &str) -> Result<Vec<Ticket>, TicketYamlError> {
    let records: Vec<TicketRecord> = serde_yaml::from_str(input)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| ticket_from_record(index, record))
        .collect()
}

fn ticket_from_record(index: usize, record: TicketRecord) -> Result<Ticket, TicketYamlError> {
    if record.sprints.contains(&0) {
        return Err(TicketYamlError::InvalidSprint { index });
    }
    let story_points = record.story_points.unwrap_or(0.0);
    if story_points < 0.0 || !story_points.is_finite() {
        return Err(TicketYamlError::NegativeStoryPoints {
            index,
            value: story_points,
        });
    }
    let closure_date = record
        .closed
        .map(|value| {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                .map_err(|_| TicketYamlError::InvalidDate { index, value })
        })
        .transpose()?;

    Ok(Ticket {
        sprints: record.sprints,
        is_finished: record.finished,
        closure_date,
        story_points,
        contributor: record.contributor,
    })
}
