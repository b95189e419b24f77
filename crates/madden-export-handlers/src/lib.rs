//! Shared export processing and error handling
//!
//! This crate decides what happens to an export request once the HTTP layer
//! has its method, path and body. It knows nothing about the server framework.

pub mod error;
pub mod processor;

pub use error::ExportError;
pub use processor::{is_readiness_probe, process_export, ExportOutcome};
