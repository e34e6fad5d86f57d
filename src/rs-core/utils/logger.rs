use std::sync::atomic::{AtomicU8, Ordering};

use log::{Level, LevelFilter, Metadata, Record};

use crate::{
    bindings::{jsLog, LogLevel},
    wasm_bindgen,
};

static MAX_LOG_LEVEL: AtomicU8 = AtomicU8::new(LoggerLevel::Debug as u8);

static LOGGER: Logger = Logger {};

/// Maximum level of logs forwarded to the JavaScript console.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum LoggerLevel {
    None = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl From<LoggerLevel> for LevelFilter {
    fn from(level: LoggerLevel) -> Self {
        match level {
            LoggerLevel::None => LevelFilter::Off,
            LoggerLevel::Error => LevelFilter::Error,
            LoggerLevel::Warn => LevelFilter::Warn,
            LoggerLevel::Info => LevelFilter::Info,
            LoggerLevel::Debug => LevelFilter::Debug,
        }
    }
}

/// `log` backend printing through the JavaScript console.
///
/// Nothing is printed until `Logger::install` has been called, which the exported
/// `Dispatcher` constructor does. Native unit tests never install it.
pub struct Logger {}

impl Logger {
    /// Register this logger as the `log` backend. Calling it more than once is harmless.
    pub fn install() {
        if log::set_logger(&LOGGER).is_ok() {
            let level = MAX_LOG_LEVEL.load(Ordering::Relaxed);
            log::set_max_level(LevelFilter::from(level_from_u8(level)));
        }
    }

    pub fn set_logger_level(new_level: LoggerLevel) {
        MAX_LOG_LEVEL.store(new_level as u8, Ordering::Relaxed);
        log::set_max_level(new_level.into());
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let max = level_from_u8(MAX_LOG_LEVEL.load(Ordering::Relaxed));
        metadata.level() <= LevelFilter::from(max)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => LogLevel::Error,
            Level::Warn => LogLevel::Warn,
            Level::Info => LogLevel::Info,
            Level::Debug | Level::Trace => LogLevel::Debug,
        };
        jsLog(level, &record.args().to_string());
    }

    fn flush(&self) {}
}

fn level_from_u8(val: u8) -> LoggerLevel {
    match val {
        0 => LoggerLevel::None,
        1 => LoggerLevel::Error,
        2 => LoggerLevel::Warn,
        3 => LoggerLevel::Info,
        _ => LoggerLevel::Debug,
    }
}

/// Update the maximum level of logs printed to the JavaScript console.
#[wasm_bindgen]
pub fn set_log_level(level: LoggerLevel) {
    Logger::set_logger_level(level);
}
