use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const HEARTBEAT_CLASS_ID: &str = "heartbeat";
pub const HEARTBEAT_PRIORITY: u8 = 0;

/// User-facing notice derived from a domain event
///
/// Priority 1 is the most urgent, 4 the least; 0 is reserved for heartbeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub class_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub message: String,
    pub priority: u8,
    pub timestamp: DateTime<Utc>,
}

impl Recommendation {
    /// Synthetic keep-alive item merged into every client stream
    pub fn heartbeat() -> Self {
        Self {
            class_id: HEARTBEAT_CLASS_ID.to_string(),
            class_name: Some("System".to_string()),
            message: "Connection alive".to_string(),
            priority: HEARTBEAT_PRIORITY,
            timestamp: Utc::now(),
        }
    }

    pub fn is_heartbeat(&self) -> bool {
        self.class_id == HEARTBEAT_CLASS_ID && self.priority == HEARTBEAT_PRIORITY
    }
}
