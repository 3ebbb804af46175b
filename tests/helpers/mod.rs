#![allow(dead_code)]
pub mod class_repos;
pub mod streams;

#[allow(unused_imports)]
pub use class_repos::*;
#[allow(unused_imports)]
pub use streams::*;
