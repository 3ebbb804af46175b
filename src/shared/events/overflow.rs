use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// What a full subscription buffer does with an incoming event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Evict the oldest buffered event and keep the new one
    #[default]
    DropOldest,
    /// Keep the buffer as is and discard the new event
    DropLatest,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropOldest => write!(f, "drop_oldest"),
            OverflowPolicy::DropLatest => write!(f, "drop_latest"),
        }
    }
}

impl FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop_oldest" | "drop-oldest" => Ok(OverflowPolicy::DropOldest),
            "drop_latest" | "drop-latest" => Ok(OverflowPolicy::DropLatest),
            other => Err(format!("unknown overflow policy: {}", other)),
        }
    }
}
