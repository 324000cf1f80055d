//! Data models

pub mod patient;
pub mod prediction;

pub use patient::*;
pub use prediction::*;
