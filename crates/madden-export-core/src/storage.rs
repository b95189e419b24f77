//! Filesystem helpers for export files

use crate::error::{PersistError, Result};
use crate::payload::Payload;
use std::fs;
use std::path::Path;

/// Create a directory and its parents if missing
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| PersistError::DirectoryCreate {
        path: path.to_path_buf(),
        source,
    })
}

/// Write bytes verbatim, creating the parent directory first
pub fn save_raw_to_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory_exists(parent)?;
    }

    fs::write(path, data).map_err(|source| PersistError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a payload as indented JSON, creating the parent directory first
pub fn save_json_to_file(path: &Path, payload: &Payload) -> Result<()> {
    let encoded = payload
        .to_pretty_json()
        .map_err(|source| PersistError::Serialization { source })?;
    save_raw_to_file(path, &encoded)
}

/// Read a stored export back
pub fn load_json_from_file(path: &Path) -> Result<Payload> {
    let data = fs::read(path).map_err(|source| PersistError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    Payload::parse(&data).map_err(|source| PersistError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// True if `path` exists and is not a directory
pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

/// True if `path` exists and is a directory
pub fn directory_exists(path: &Path) -> bool {
    path.is_dir()
}
