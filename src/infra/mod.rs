pub mod sqlite_sink;
