use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

lazy_static! {
    static ref EMAIL_SHAPE: Regex = Regex::new(r"^\S+@\S+\.\S+$").unwrap();
}

/// Opaque slot identifier, unique within a date. Server-assigned ids pass
/// through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub String);

impl SlotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Available,
    Booked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: SlotStatus,
}

impl Slot {
    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }

    /// Half-open interval overlap on `[start_time, end_time)`.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.start_time < other.end_time && self.end_time > other.start_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BookingRequest {
    pub slot_id: SlotId,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(regex(path = *EMAIL_SHAPE, message = "email must look like name@example.com"))]
    pub email: String,
    pub date: NaiveDate,
}

impl BookingRequest {
    /// Builds the request with identity fields trimmed, so validation judges
    /// what the user meant rather than stray whitespace.
    pub fn new(slot_id: SlotId, name: &str, email: &str, date: NaiveDate) -> Self {
        Self {
            slot_id,
            name: name.trim().to_owned(),
            email: email.trim().to_owned(),
            date,
        }
    }

    /// One human-readable reason per failing field, sorted for stable output.
    pub fn validation_reasons(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => {
                let mut reasons: Vec<String> = errors
                    .field_errors()
                    .into_iter()
                    .flat_map(|(field, field_errors)| {
                        field_errors.iter().map(move |error| match &error.message {
                            Some(message) => message.to_string(),
                            None => format!("{field} is invalid"),
                        })
                    })
                    .collect();
                reasons.sort();
                reasons
            }
        }
    }
}

/// A business rejection is a successful transport call; only network/HTTP
/// failures surface as `TransportError`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BookingResult {
    Confirmed { slot_id: SlotId },
    Rejected { reason: String },
}

/// Whose availability the workflow operates on. Injected at construction,
/// never a module-level constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub interviewer_id: String,
}

impl Identity {
    pub fn new(interviewer_id: impl Into<String>) -> Self {
        Self {
            interviewer_id: interviewer_id.into(),
        }
    }
}
