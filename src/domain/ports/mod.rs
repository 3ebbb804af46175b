pub mod class_repository;
pub mod event_bus;
pub mod task_spawner;

pub use class_repository::*;
pub use event_bus::*;
pub use task_spawner::*;
