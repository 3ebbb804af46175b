use crate::domain::entities::GymClass;
use thiserror::Error;

/// Failures of the class catalog itself; a missing class is `Ok(None)`
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Class catalog I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Class catalog is malformed: {0}")]
    Malformed(String),
}

/// Synchronous, possibly blocking lookup of class metadata
pub trait ClassRepository: Send + Sync {
    fn find_by_id(&self, id: i64) -> Result<Option<GymClass>, LookupError>;
}
