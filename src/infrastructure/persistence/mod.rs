pub mod class_catalog;

pub use class_catalog::*;
