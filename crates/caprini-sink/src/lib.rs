//! Sink adapters for Caprini export records.
//!
//! These adapters only move an already-built [`ExportRecord`] somewhere:
//!
//! - [`RemoteSink`]: POST the record as JSON to the configured sheet endpoint
//! - [`clipboard_text`]: tab-separated header + values for pasting
//! - [`write_csv`]: `Caprini_<name>.csv` download
//!
//! None of them make clinical decisions.
//!
//! [`ExportRecord`]: caprini_core::ExportRecord

pub mod config;
pub mod error;
pub mod remote;
pub mod text;

pub use config::SinkConfig;
pub use error::{SinkError, SinkResult};
pub use remote::{Delivery, RemoteSink, Transport, TransportError, UreqTransport};
pub use text::{clipboard_text, csv_file_name, write_csv};
