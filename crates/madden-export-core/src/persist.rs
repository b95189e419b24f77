//! Export persistence
//!
//! Payloads that parse as JSON are pretty-printed into a `.json` file named
//! from the path metadata and the inferred export label. Anything else is
//! stored byte-for-byte in a `.txt` file.
//!
//! Log events are emitted through the dispatcher handed to [`Persister::new`],
//! never through an ambient global subscriber.

use crate::error::Result;
use crate::naming::{json_file_name, raw_file_name};
use crate::path::PathMetadata;
use crate::payload::Payload;
use crate::storage::{ensure_directory_exists, save_json_to_file, save_raw_to_file};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn, Dispatch};

const PREVIEW_CHARS: usize = 100;

/// Writes exports into a data directory
#[derive(Debug, Clone)]
pub struct Persister {
    data_dir: PathBuf,
    dispatch: Dispatch,
}

impl Persister {
    pub fn new(data_dir: impl Into<PathBuf>, dispatch: Dispatch) -> Self {
        Self {
            data_dir: data_dir.into(),
            dispatch,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The logging sink this persister reports to
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Store an export stamped with the current local time
    pub fn persist(&self, body: &[u8], metadata: &PathMetadata) -> Result<PathBuf> {
        self.persist_at(body, metadata, Local::now())
    }

    /// Store an export stamped with `at`, returning the written path
    pub fn persist_at(
        &self,
        body: &[u8],
        metadata: &PathMetadata,
        at: DateTime<Local>,
    ) -> Result<PathBuf> {
        tracing::dispatcher::with_default(&self.dispatch, || match Payload::parse(body) {
            Ok(payload) => self.store_structured(&payload, metadata, &at),
            Err(e) => {
                warn!("Received non-JSON data, saving as raw text: {}", e);
                self.store_raw(body, &at)
            }
        })
    }

    fn store_raw(&self, body: &[u8], at: &DateTime<Local>) -> Result<PathBuf> {
        debug!("Data preview: {}", preview(body));

        ensure_directory_exists(&self.data_dir)?;
        let path = self.data_dir.join(raw_file_name(at));
        save_raw_to_file(&path, body)?;

        info!("Saved raw data to {}", path.display());
        Ok(path)
    }

    fn store_structured(
        &self,
        payload: &Payload,
        metadata: &PathMetadata,
        at: &DateTime<Local>,
    ) -> Result<PathBuf> {
        if let Payload::Object(_) = payload {
            debug!("JSON object keys: {:?}", payload.keys());
        }

        let label = payload.export_label(metadata);
        debug!("Processing export of type: {}", label);

        ensure_directory_exists(&self.data_dir)?;
        let path = self.data_dir.join(json_file_name(metadata, &label, at));
        save_json_to_file(&path, payload)?;

        info!("Saved {} export data to {}", label, path.display());
        Ok(path)
    }
}

/// First characters of a payload, lossily decoded
fn preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.into_owned()
    }
}
