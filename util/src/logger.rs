//! Session logger
//!
//! Log records go to both stdout and the session's log file, each with its own minimum level.
//! Individual targets can be capped below that, which keeps the per-cycle `trace!` output of the
//! control modules out of the log unless it's asked for.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{self, info, LevelFilter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// Internal imports
use crate::session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Logging parameters, as found in an exec's parameter file.
///
/// Levels are given by name (`"off"`, `"error"`, ... `"trace"`, any case).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogParams {
    /// Minimum level written to the session log file, must include `info`
    pub file_level: String,

    /// Minimum level printed to stdout
    pub stdout_level: String,

    /// Level caps for individual targets, keyed by module path
    #[serde(default)]
    pub targets: BTreeMap<String, String>,
}

/// Parsed logging levels.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLevels {
    pub file: LevelFilter,
    pub stdout: LevelFilter,
    pub targets: Vec<(String, LevelFilter)>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected the log file level to include `INFO`, found `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Unknown log level `{0}`")]
    UnknownLevel(String),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LogParams {
    /// Parse and check the levels.
    pub fn levels(&self) -> Result<LogLevels, LoggerInitError> {
        let file = parse_level(&self.file_level)?;
        if file < LevelFilter::Info {
            return Err(LoggerInitError::InvalidMinLogLevel(file));
        }

        let mut targets = Vec::with_capacity(self.targets.len());
        for (target, level) in self.targets.iter() {
            targets.push((target.clone(), parse_level(level)?));
        }

        Ok(LogLevels {
            file,
            stdout: parse_level(&self.stdout_level)?,
            targets,
        })
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// Must only be called once, the global logger can't be replaced.
pub fn logger_init(params: &LogParams, session: &session::Session) -> Result<(), LoggerInitError> {
    let levels = params.levels()?;

    let log_file = fern::log_file(session.log_file_path.clone())
        .map_err(LoggerInitError::LogFileInitError)?;

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            // If debug or trace include the target, otherwise don't include it
            if record.level() > log::Level::Info {
                out.finish(format_args!(
                    "[{:10.6} {}] {}: {}",
                    session::get_elapsed_seconds(),
                    level_to_str(record.level()),
                    record.target(),
                    message
                ))
            } else {
                out.finish(format_args!(
                    "[{:10.6} {}] {}",
                    session::get_elapsed_seconds(),
                    level_to_str(record.level()),
                    message
                ))
            }
        })
        .level(levels.file.max(levels.stdout));

    for (target, level) in levels.targets.iter() {
        dispatch = dispatch.level_for(target.clone(), *level);
    }

    dispatch
        .chain(
            fern::Dispatch::new()
                .level(levels.stdout)
                .chain(std::io::stdout()),
        )
        .chain(fern::Dispatch::new().level(levels.file).chain(log_file))
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!(
        "    Levels: file {:?}, stdout {:?}",
        levels.file, levels.stdout
    );
    for (target, level) in levels.targets.iter() {
        info!("    {}: {:?}", target, level);
    }
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn parse_level(name: &str) -> Result<LevelFilter, LoggerInitError> {
    name.trim()
        .parse()
        .map_err(|_| LoggerInitError::UnknownLevel(name.to_string()))
}

/// Get the string representation of a log level
fn level_to_str(level: log::Level) -> ColoredString {
    match level {
        log::Level::Trace => "TRC".dimmed().italic(),
        log::Level::Debug => "DBG".dimmed(),
        log::Level::Info => "INF".normal(),
        log::Level::Warn => "WRN".yellow(),
        log::Level::Error => "ERR".red().bold(),
    }
}
