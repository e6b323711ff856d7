use crate::app::ports::{IfExists, TableSink};
use crate::app::run_summary::{file_sha256, RunSummary};
use crate::config::EtlConfig;
use crate::constants::DISASTER_TABLE;
use crate::error::Result;
use crate::infra::sqlite_sink::SqliteSink;
use crate::pipeline::ingestion::loader::{load_data, LoadOptions};
use crate::pipeline::processing::cleaner::clean_data_with_report;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// The three paths a run needs.
#[derive(Debug, Clone)]
pub struct EtlPaths {
    pub messages: PathBuf,
    pub categories: PathBuf,
    pub database: PathBuf,
}

/// Load → clean → save, printing progress to stdout as each stage starts.
pub struct EtlUseCase {
    load_options: LoadOptions,
    if_exists: IfExists,
    input_checksums: bool,
}

impl EtlUseCase {
    pub fn new(load_options: LoadOptions, if_exists: IfExists) -> Self {
        Self {
            load_options,
            if_exists,
            input_checksums: false,
        }
    }

    /// Record SHA-256 checksums of both inputs in the run summary. They are
    /// taken before loading starts.
    pub fn with_input_checksums(mut self, enabled: bool) -> Self {
        self.input_checksums = enabled;
        self
    }

    pub fn from_config(config: &EtlConfig) -> Self {
        Self::new(
            LoadOptions {
                validate_category_names: config.validate_category_names,
            },
            config.if_exists,
        )
    }

    /// Runs against the SQLite file at `paths.database`.
    pub fn run(&self, paths: &EtlPaths) -> Result<RunSummary> {
        self.run_with(paths, |path: &Path| SqliteSink::open(path))
    }

    /// Runs with a caller-provided sink. `open_sink` is only called once
    /// loading and cleaning have succeeded, so a bad input never touches the
    /// destination.
    #[instrument(skip(self, open_sink), fields(db = %paths.database.display()))]
    pub fn run_with<S, F>(&self, paths: &EtlPaths, open_sink: F) -> Result<RunSummary>
    where
        S: TableSink,
        F: FnOnce(&Path) -> Result<S>,
    {
        let started_at = Utc::now();

        println!(
            "Loading data...\n    MESSAGES: {}\n    CATEGORIES: {}",
            paths.messages.display(),
            paths.categories.display()
        );
        let (messages_sha256, categories_sha256) = if self.input_checksums {
            (
                Some(file_sha256(&paths.messages)?),
                Some(file_sha256(&paths.categories)?),
            )
        } else {
            (None, None)
        };
        let merged = load_data(&paths.messages, &paths.categories, self.load_options)?;
        if merged.is_empty() {
            warn!("No ids in common between messages and categories; the table will be empty");
        }
        let rows_loaded = merged.len();

        println!("Cleaning data...");
        let (cleaned, report) = clean_data_with_report(merged)?;

        println!("Saving data...\n    DATABASE: {}", paths.database.display());
        let rows_written = {
            let mut sink = open_sink(&paths.database)?;
            sink.create_table(DISASTER_TABLE, &cleaned, self.if_exists)?
        };

        println!("Cleaned data saved to database!");
        info!(
            rows_loaded,
            duplicates_removed = report.duplicates_removed,
            rows_written,
            "ETL run complete"
        );

        Ok(RunSummary {
            messages_path: paths.messages.display().to_string(),
            messages_sha256,
            categories_path: paths.categories.display().to_string(),
            categories_sha256,
            database_path: paths.database.display().to_string(),
            table: DISASTER_TABLE.to_string(),
            columns: cleaned.column_names().iter().map(|s| s.to_string()).collect(),
            rows_loaded,
            duplicates_removed: report.duplicates_removed,
            rows_written,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
