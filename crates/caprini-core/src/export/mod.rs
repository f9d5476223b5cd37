//! Export record assembly and its text serializations.

mod delimited;
mod record;

pub use record::*;
