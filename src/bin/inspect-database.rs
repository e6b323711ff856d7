use clap::Parser;
use disaster_etl::constants::DISASTER_TABLE;
use disaster_etl::infra::sqlite_sink::SqliteSink;

/// Print the schema, row count and first rows of a table written by disaster_etl.
#[derive(Parser)]
#[command(name = "inspect-database")]
struct Args {
    /// SQLite database produced by disaster_etl
    database: std::path::PathBuf,
    #[arg(long, default_value = DISASTER_TABLE)]
    table: String,
    /// Number of rows to print
    #[arg(long, default_value_t = 5)]
    head: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Opening {}...", args.database.display());
    let sink = SqliteSink::open(&args.database)?;
    if !sink.table_exists(&args.table)? {
        anyhow::bail!("table '{}' not found in {}", args.table, args.database.display());
    }

    let table = sink.read_table(&args.table)?;
    println!("Table: {}", args.table);
    println!("Rows: {}", table.len());
    println!("Columns ({}):", table.columns.len());
    for column in &table.columns {
        println!("  {} {}", column.name, column.column_type.sql_type());
    }

    for row in table.rows.iter().take(args.head) {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        println!("  {}", cells.join(" | "));
    }

    Ok(())
}
