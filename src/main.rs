use clap::error::ErrorKind;
use clap::Parser;
use disaster_etl::app::run_summary::RunSummary;
use disaster_etl::config::EtlConfig;
use disaster_etl::constants::USAGE;
use disaster_etl::{logging, EtlError, EtlPaths, EtlUseCase, IfExists};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "disaster_etl")]
#[command(about = "Merge disaster messages with their categories, clean them and save to SQLite")]
#[command(version = "0.1.0")]
struct Cli {
    /// CSV file containing messages (e.g. disaster_messages.csv)
    messages: PathBuf,
    /// CSV file containing categories (e.g. disaster_categories.csv)
    categories: PathBuf,
    /// SQLite destination database (e.g. DisasterResponse.db)
    database: PathBuf,

    /// What to do if `disaster_data` already exists. Overrides the config file.
    #[arg(long, value_enum)]
    if_exists: Option<IfExists>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON run summary to this file
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            println!("{}", USAGE);
            let err = EtlError::Invocation(e.kind().to_string());
            return ExitCode::from(err.exit_code() as u8);
        }
    };

    let config = match cli.config.as_deref().map(EtlConfig::load).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => return fail(e),
    };
    let config = EtlConfig {
        if_exists: cli.if_exists.unwrap_or(config.if_exists),
        ..config
    };

    let _log_guard = logging::init_logging(&config.logging);
    info!(?config, "Starting ETL run");

    let paths = EtlPaths {
        messages: cli.messages,
        categories: cli.categories,
        database: cli.database,
    };
    let use_case = EtlUseCase::from_config(&config).with_input_checksums(cli.summary.is_some());
    let summary = match use_case.run(&paths) {
        Ok(summary) => summary,
        Err(e) => return fail(e),
    };

    if let Some(path) = cli.summary {
        if let Err(e) = write_summary(&summary, path) {
            return fail(e);
        }
    }
    ExitCode::SUCCESS
}

fn write_summary(summary: &RunSummary, path: PathBuf) -> disaster_etl::Result<()> {
    summary.write_json(&path)?;
    info!("Run summary written to {}", path.display());
    Ok(())
}

fn fail(e: EtlError) -> ExitCode {
    error!("ETL run failed: {}", e);
    eprintln!("❌ {}", e);
    ExitCode::from(e.exit_code() as u8)
}
