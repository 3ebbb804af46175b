pub mod recommendation;

pub use recommendation::run_recommendation_listener;
