pub mod events;
pub mod recommendations;
