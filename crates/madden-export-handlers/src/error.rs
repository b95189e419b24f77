use madden_export_core::PersistError;
use thiserror::Error;

/// Failure while handling an export request.
///
/// None of these reach the sender as an HTTP error: the companion app only
/// checks for a success status, so every variant is answered with 200 and a
/// human-readable message.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The request body could not be read (I/O error or over the size limit)
    #[error("failed to read request body: {message}")]
    BodyRead { message: String },

    /// The export could not be stored
    #[error(transparent)]
    Persist(#[from] PersistError),

    /// The worker running the export did not complete
    #[error("export task failed: {message}")]
    Internal { message: String },
}

impl ExportError {
    /// Error type string for logs
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::BodyRead { .. } => "BodyRead",
            Self::Persist(err) => err.kind(),
            Self::Internal { .. } => "Internal",
        }
    }

    /// Text sent back to the companion app
    pub fn response_message(&self) -> String {
        match self {
            Self::BodyRead { message } => {
                format!("Received request but could not read body: {}", message)
            }
            Self::Persist(err) => format!("Data received but could not be processed: {}", err),
            Self::Internal { message } => {
                format!("Data received but could not be processed: {}", message)
            }
        }
    }
}
