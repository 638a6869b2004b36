//! CLI command implementations

pub mod pack;
pub mod render;
pub mod unpack;
pub mod words;

mod reporting;
