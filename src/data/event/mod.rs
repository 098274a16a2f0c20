use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod db;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Assignment,
    Event,
}

/// Deadline or happening announced to a class. Created by the teacher and
/// never updated or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub class_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub location: Option<String>,
}
