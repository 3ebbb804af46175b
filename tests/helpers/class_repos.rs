use gymflow::domain::entities::GymClass;
use gymflow::domain::ports::class_repository::{ClassRepository, LookupError};
use gymflow::infrastructure::persistence::InMemoryClassRepository;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Catalog that records every id it was asked for
pub struct RecordingClassRepository {
    inner: InMemoryClassRepository,
    calls: Mutex<Vec<i64>>,
}

impl RecordingClassRepository {
    pub fn new(classes: &[(i64, &str)]) -> Self {
        Self {
            inner: InMemoryClassRepository::from_classes(
                classes.iter().map(|(id, name)| GymClass::new(*id, *name)),
            ),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(&[])
    }

    pub fn calls(&self) -> Vec<i64> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ClassRepository for RecordingClassRepository {
    fn find_by_id(&self, id: i64) -> Result<Option<GymClass>, LookupError> {
        self.calls.lock().unwrap().push(id);
        self.inner.find_by_id(id)
    }
}

/// Catalog whose every lookup fails with an I/O error
#[derive(Default)]
pub struct FailingClassRepository {
    calls: AtomicUsize,
}

impl FailingClassRepository {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ClassRepository for FailingClassRepository {
    fn find_by_id(&self, _id: i64) -> Result<Option<GymClass>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(LookupError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "catalog offline",
        )))
    }
}

/// Catalog that blocks the calling thread before answering
pub struct SlowClassRepository {
    delay: Duration,
    name: String,
}

impl SlowClassRepository {
    pub fn new(delay: Duration, name: &str) -> Self {
        Self {
            delay,
            name: name.to_string(),
        }
    }
}

impl ClassRepository for SlowClassRepository {
    fn find_by_id(&self, id: i64) -> Result<Option<GymClass>, LookupError> {
        std::thread::sleep(self.delay);
        Ok(Some(GymClass::new(id, self.name.clone())))
    }
}
