//! Domain models for the assessment engine.

mod catalog;
mod outcome;
mod patient;

pub use catalog::*;
pub use outcome::*;
pub use patient::*;
