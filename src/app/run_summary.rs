use crate::error::{EtlError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Outcome of one ETL run, optionally written out as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub messages_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages_sha256: Option<String>,
    pub categories_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories_sha256: Option<String>,
    pub database_path: String,
    pub table: String,
    pub columns: Vec<String>,
    pub rows_loaded: usize,
    pub duplicates_removed: usize,
    pub rows_written: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let body = serde_json::to_string_pretty(self)?;
        fs::write(path, body).map_err(|e| EtlError::io(path, e))
    }
}

/// Hex SHA-256 of a file's contents.
pub fn file_sha256(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| EtlError::io(path, e))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
