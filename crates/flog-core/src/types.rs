use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{FlogError, Result};

/// Wire format for target days: local wall-clock time, minute precision.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Version stamped into the queue file. Bump on any incompatible change.
pub const DATA_FORMAT_VERSION: u32 = 1;

/// Parse a `YYYY-MM-DDTHH:MM` local time.
pub fn parse_day(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATE_FORMAT).map_err(|e| FlogError::InvalidDateFormat {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

pub fn format_day(t: NaiveDateTime) -> String {
    t.format(DATE_FORMAT).to_string()
}

/// A queued booking request. Two requests are the same request iff both
/// fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingRequest {
    #[serde(rename = "Day")]
    pub day: String,
    #[serde(rename = "Players")]
    pub players: u32,
}

impl PendingRequest {
    pub fn new(day: impl Into<String>, players: u32) -> Self {
        Self {
            day: day.into(),
            players,
        }
    }

    pub fn target(&self) -> Result<NaiveDateTime> {
        parse_day(&self.day)
    }
}

impl fmt::Display for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.day, self.players)
    }
}

/// On-disk shape of the pending queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueState {
    #[serde(rename = "DataFormatVersion")]
    pub format_version: u32,
    /// Older files store an empty queue as `null`.
    #[serde(rename = "Pending", default, deserialize_with = "null_as_empty")]
    pub pending: Vec<PendingRequest>,
}

impl QueueState {
    pub fn new(pending: Vec<PendingRequest>) -> Self {
        Self {
            format_version: DATA_FORMAT_VERSION,
            pending,
        }
    }

    pub fn contains(&self, req: &PendingRequest) -> bool {
        self.pending.iter().any(|p| p == req)
    }
}

impl Default for QueueState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

fn null_as_empty<'de, D>(d: D) -> std::result::Result<Vec<PendingRequest>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<PendingRequest>>::deserialize(d)?.unwrap_or_default())
}
