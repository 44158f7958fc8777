//! Line format shared by every binary of the workspace:
//! `[LEVEL][module::path] message`.

use std::fmt;
use std::io::Write;

use log::{Level, LevelFilter, SetLoggerError};

/// Render a single log line, without the trailing newline
pub fn format_line(level: Level, modpath: &str, what: &fmt::Arguments<'_>) -> String {
    format!("[{:5}][{}] {}", level.as_str(), modpath, what)
}

/// Install `env_logger` at `level`, `RUST_LOG` takes precedence when set
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format(|buf, record| {
            let modpath = record.module_path().unwrap_or_else(|| record.target());
            writeln!(buf, "{}", format_line(record.level(), modpath, record.args()))
        })
        .try_init()
}
