use crate::domain::entities::GymClass;
use crate::domain::ports::class_repository::{ClassRepository, LookupError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Fixed in-memory class catalog
#[derive(Debug, Clone, Default)]
pub struct InMemoryClassRepository {
    classes: HashMap<i64, GymClass>,
}

impl InMemoryClassRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_classes(classes: impl IntoIterator<Item = GymClass>) -> Self {
        Self {
            classes: classes.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn insert(&mut self, class: GymClass) {
        self.classes.insert(class.id, class);
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassRepository for InMemoryClassRepository {
    fn find_by_id(&self, id: i64) -> Result<Option<GymClass>, LookupError> {
        Ok(self.classes.get(&id).cloned())
    }
}

/// Class catalog read from a JSON file on every lookup
///
/// The file holds an array of `{"id": 1, "name": "Yoga"}` objects, so edits
/// are picked up without a restart. Reads block and must stay off the
/// async workers.
#[derive(Debug, Clone)]
pub struct JsonFileClassRepository {
    path: PathBuf,
}

impl JsonFileClassRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<GymClass>, LookupError> {
        let raw = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw).map_err(|e| {
            LookupError::Malformed(format!("{}: {}", self.path.display(), e))
        })
    }
}

impl ClassRepository for JsonFileClassRepository {
    fn find_by_id(&self, id: i64) -> Result<Option<GymClass>, LookupError> {
        Ok(self.load()?.into_iter().find(|class| class.id == id))
    }
}
