use crate::domain::ports::task_spawner::TaskSpawner;
use futures::future::BoxFuture;

#[derive(Clone, Default)]
pub struct TokioTaskSpawner;

impl TokioTaskSpawner {
    pub fn new() -> Self {
        Self
    }
}

impl TaskSpawner for TokioTaskSpawner {
    fn spawn(&self, name: &'static str, future: BoxFuture<'static, ()>) {
        tracing::trace!("Spawning {} task", name);
        tokio::spawn(future);
    }
}
