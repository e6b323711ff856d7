use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Invalid invocation: {0}")]
    Invocation(String),

    #[error("Failed to read CSV file '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    #[error("Invalid category token '{token}' for id {id} in {file}: {reason}")]
    InvalidCategory {
        file: String,
        id: String,
        token: String,
        reason: String,
    },

    #[error("Table '{0}' already exists in destination database")]
    TableExists(String),

    #[error("SQLite error on '{path}': {source}")]
    Sqlite {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EtlError {
    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        EtlError::Csv {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn sqlite(path: impl Into<PathBuf>, source: rusqlite::Error) -> Self {
        EtlError::Sqlite {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EtlError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn missing_column(file: impl Into<String>, column: &str) -> Self {
        EtlError::MissingColumn {
            file: file.into(),
            column: column.to_string(),
        }
    }

    /// Process exit code for this error. Invocation problems are distinguished
    /// from pipeline failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            EtlError::Invocation(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
