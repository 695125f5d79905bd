use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;
use once_cell::sync::Lazy;
use parking_lot::Mutex;

use super::constants::LOG_TARGET;
use super::errors::MatchError;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {h({l})} [{T}] {t} - {m}{n}";
const LOG_FILE_NAME: &str = "postlist_core.log";
const CONSOLE_APPENDER: &str = "console";
const FILE_APPENDER: &str = "file";

/// Handle of the installed log4rs logger, later calls only swap its config.
static LOG4RS_HANDLE: Lazy<Mutex<Option<Handle>>> = Lazy::new(|| Mutex::new(None));

/// Logger settings for the query evaluation library.
///
/// - `log_directory`: where `postlist_core.log` is written when `log_in_file` is set.
/// - `log_level`: one of `off`, `error`, `warn`, `info`, `debug`, `trace`.
/// - `console_display`: also log to stdout.
/// - `only_record_crate`: drop records whose target is outside this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerConfig {
    pub log_directory: PathBuf,
    pub log_level: String,
    pub log_in_file: bool,
    pub console_display: bool,
    pub only_record_crate: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_directory: PathBuf::from("."),
            log_level: "info".to_string(),
            log_in_file: false,
            console_display: true,
            only_record_crate: true,
        }
    }
}

impl LoggerConfig {
    pub fn new(
        log_directory: impl Into<PathBuf>,
        log_level: impl Into<String>,
        log_in_file: bool,
        console_display: bool,
        only_record_crate: bool,
    ) -> Self {
        Self {
            log_directory: log_directory.into(),
            log_level: log_level.into(),
            log_in_file,
            console_display,
            only_record_crate,
        }
    }

    pub fn level_filter(&self) -> Result<LevelFilter, MatchError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|e| MatchError::LoggerError(format!("invalid log level '{}': {}", self.log_level, e)))
    }

    pub fn build_logger_config(&self) -> Result<Config, MatchError> {
        let level = self.level_filter()?;
        let mut appenders: Vec<&str> = Vec::new();
        let mut builder = Config::builder();

        if self.console_display {
            let console = ConsoleAppender::builder()
                .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
                .build();
            builder = builder.appender(Appender::builder().build(CONSOLE_APPENDER, Box::new(console)));
            appenders.push(CONSOLE_APPENDER);
        }

        if self.log_in_file {
            let file = FileAppender::builder()
                .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
                .build(self.log_directory.join(LOG_FILE_NAME))
                .map_err(|e| MatchError::LoggerError(e.to_string()))?;
            builder = builder.appender(Appender::builder().build(FILE_APPENDER, Box::new(file)));
            appenders.push(FILE_APPENDER);
        }

        let config = if self.only_record_crate {
            builder
                .logger(
                    Logger::builder()
                        .appenders(appenders)
                        .additive(false)
                        .build(LOG_TARGET, level),
                )
                .build(Root::builder().build(LevelFilter::Off))
        } else {
            builder.build(Root::builder().appenders(appenders).build(level))
        };
        config.map_err(|e| MatchError::LoggerError(e.to_string()))
    }

    /// Installs the logger, or replaces the config of a logger installed before.
    pub fn init(&self) -> Result<(), MatchError> {
        let config = self.build_logger_config()?;
        let mut handle = LOG4RS_HANDLE.lock();
        match handle.as_ref() {
            Some(installed) => installed.set_config(config),
            None => {
                let installed = log4rs::init_config(config).map_err(|e| MatchError::LoggerError(e.to_string()))?;
                *handle = Some(installed);
            }
        }
        Ok(())
    }
}
