pub mod recommendation_rules;

pub use recommendation_rules::*;
