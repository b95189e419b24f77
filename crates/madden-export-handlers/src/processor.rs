use crate::error::ExportError;
use madden_export_core::{classify, PathMetadata, Persister};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

pub const READY_MESSAGE: &str = "Madden Companion Export endpoint is ready. Send data to this URL.";
pub const EMPTY_BODY_MESSAGE: &str = "Request received with empty body. Endpoint is working.";
pub const SAVED_MESSAGE: &str = "Data received and saved successfully";

/// Result of handling one export request
#[derive(Debug)]
pub enum ExportOutcome {
    /// GET probe, body never read
    Ready,
    /// POST without a body
    EmptyBody,
    /// Export written to `path`
    Saved {
        path: PathBuf,
        metadata: PathMetadata,
    },
    /// Received but not stored
    Failed(ExportError),
}

impl ExportOutcome {
    /// Text sent back to the companion app
    pub fn message(&self) -> String {
        match self {
            Self::Ready => READY_MESSAGE.to_string(),
            Self::EmptyBody => EMPTY_BODY_MESSAGE.to_string(),
            Self::Saved { .. } => SAVED_MESSAGE.to_string(),
            Self::Failed(err) => err.response_message(),
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// GET requests to the export endpoint are readiness probes
pub fn is_readiness_probe(method: &str) -> bool {
    method.eq_ignore_ascii_case("GET")
}

/// Classify and persist one export body.
///
/// Blocking: performs filesystem I/O. Never panics on bad input; every failure
/// becomes [`ExportOutcome::Failed`] after being logged.
pub fn process_export(persister: &Persister, path: &str, body: &[u8]) -> ExportOutcome {
    tracing::dispatcher::with_default(persister.dispatch(), || {
        debug!("Received data of size {} bytes", body.len());

        if body.is_empty() {
            warn!("Empty request body received");
            return ExportOutcome::EmptyBody;
        }

        let metadata = classify(path);
        debug!("Extracted path metadata: {:?}", metadata);

        match persister.persist(body, &metadata) {
            Ok(stored) => {
                info!("Successfully processed export data to {}", stored.display());
                ExportOutcome::Saved {
                    path: stored,
                    metadata,
                }
            }
            Err(e) => {
                let err = ExportError::from(e);
                error!(error_type = err.error_type(), "Error processing export: {}", err);
                ExportOutcome::Failed(err)
            }
        }
    })
}
