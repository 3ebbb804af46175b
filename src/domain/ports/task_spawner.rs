use futures::future::BoxFuture;

/// Spawns long-running session work onto the hosting runtime
/// Lets tests and alternative runtimes observe or replace task creation
pub trait TaskSpawner: Send + Sync {
    /// Spawn a detached future; `name` is used for logging only
    fn spawn(&self, name: &'static str, future: BoxFuture<'static, ()>);
}
