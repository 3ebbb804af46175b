pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::services::*;
pub use config::*;
pub use domain::entities::*;
pub use domain::events::*;
pub use domain::ports::*;
pub use shared::events::*;
