// Pipeline ingestion: reading the delimited inputs and joining them on `id`

pub mod csv_source;
pub mod loader;
