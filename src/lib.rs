pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;

// Application layer: the run itself and the ports it writes through
pub mod app;
// Adapters behind the ports
pub mod infra;

pub use app::etl_use_case::{EtlPaths, EtlUseCase};
pub use app::ports::{IfExists, TableSink};
pub use error::{EtlError, Result};
