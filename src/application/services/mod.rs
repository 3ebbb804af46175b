pub mod event_service;
pub mod recommendation_service;
pub mod recommendation_stream_service;

pub use event_service::*;
pub use recommendation_service::*;
pub use recommendation_stream_service::*;
