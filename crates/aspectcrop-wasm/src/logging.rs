//! Browser console backend for the `log` facade.
//!
//! The core logs through `log`; on `wasm32` these records are forwarded to
//! `console.error/warn/info/debug`. On other targets the logger drops them.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            emit(record.level(), &format_record(record));
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Install the console logger. Later calls only change the level.
pub(crate) fn install(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::debug!("console logger installed");
    }
    log::set_max_level(level);
}

fn format_record(record: &Record) -> String {
    format!("[{}] {}: {}", record.level(), record.target(), record.args())
}

pub(crate) fn parse_level(level: &str) -> Result<LevelFilter, String> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| format!("Unknown log level: {}", level))
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, _line: &str) {}

/// Set the console log level: "off", "error", "warn", "info", "debug" or "trace".
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level).map_err(|e| JsValue::from_str(&e))?;
    install(filter);
    Ok(())
}
