use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::DomainError;

/// Kinds of class availability changes emitted by booking collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    SlotFreed,
    ClassFull,
    ScheduleChanged,
    BookingCreated,
    BookingCancelled,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::SlotFreed,
        EventKind::ClassFull,
        EventKind::ScheduleChanged,
        EventKind::BookingCreated,
        EventKind::BookingCancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SlotFreed => "SLOT_FREED",
            EventKind::ClassFull => "CLASS_FULL",
            EventKind::ScheduleChanged => "SCHEDULE_CHANGED",
            EventKind::BookingCreated => "BOOKING_CREATED",
            EventKind::BookingCancelled => "BOOKING_CANCELLED",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Accepts "SLOT_FREED", "slot_freed" and "slot-freed"
impl FromStr for EventKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_ascii_uppercase();
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| DomainError::ValidationError(format!("Unknown event kind: {}", s)))
    }
}

/// A change in some gym class's state, as published on the event bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEvent {
    pub class_id: String,
    pub kind: EventKind,
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent {
    pub fn new(class_id: impl Into<String>, kind: EventKind) -> Self {
        Self {
            class_id: class_id.into(),
            kind,
            occurred_at: Utc::now(),
        }
    }
}
