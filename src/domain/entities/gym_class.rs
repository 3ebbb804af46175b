use serde::{Deserialize, Serialize};

/// Class metadata as returned by the class catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GymClass {
    pub id: i64,
    pub name: String,
}

impl GymClass {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
