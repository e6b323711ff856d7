pub mod etl_use_case;
pub mod ports;
pub mod run_summary;
