pub mod gym_class;
pub mod recommendation;

pub use gym_class::*;
pub use recommendation::*;
