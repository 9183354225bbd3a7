//! Program logging.
//!
//! Log messages go to stderr, coloured if it is a terminal, so that stdout is left for command
//! output. A `run` also keeps a plain-text record of the run in its output folder.
use anyhow::{Context, Result, anyhow};
use chrono::Local;
use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::env;
use std::fs::File;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// The log level used if neither the environment nor the settings file gives one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The environment variable which overrides the log level in the settings file
pub const LOG_LEVEL_ENV_VAR: &str = "GRIDSIZE_LOG_LEVEL";

/// The name of the log file written to the output folder
pub const LOG_FILE_NAME: &str = "gridsize.log";

static LOGGER_INITIALISED: AtomicBool = AtomicBool::new(false);

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INITIALISED.load(Ordering::SeqCst)
}

/// Parse a log level name (`off`, `error`, `warn`, `info`, `debug` or `trace`), ignoring case
fn parse_log_level(level: &str) -> Result<LevelFilter> {
    let level = level.trim();
    level
        .parse()
        .map_err(|_| anyhow!("Unknown log level: {level}"))
}

/// Pick the log level, preferring `GRIDSIZE_LOG_LEVEL` over the settings file
fn resolve_log_level(from_settings: Option<&str>) -> Result<LevelFilter> {
    let from_env = env::var(LOG_LEVEL_ENV_VAR).ok();
    let level = from_env
        .as_deref()
        .or(from_settings)
        .unwrap_or(DEFAULT_LOG_LEVEL);

    parse_log_level(level)
}

/// Messages for the console: short timestamps, no module paths
fn console_dispatch(level: LevelFilter) -> Dispatch {
    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    let use_colour = std::io::stderr().is_terminal();

    Dispatch::new()
        .format(move |out, message, record| {
            let time = Local::now().format("%H:%M:%S");
            if use_colour {
                out.finish(format_args!(
                    "[{time} {}] {message}",
                    colours.color(record.level())
                ));
            } else {
                out.finish(format_args!("[{time} {}] {message}", record.level()));
            }
        })
        .level(level)
        .chain(std::io::stderr())
}

/// Messages for the log file.
///
/// The file always records at least `info` messages, even if the console is quieter.
fn file_dispatch(level: LevelFilter, file: File) -> Dispatch {
    Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} {}: {message}",
                Local::now().to_rfc3339(),
                record.level(),
                record.target()
            ));
        })
        .level(level.max(LevelFilter::Info))
        .chain(file)
}

/// Initialise the program logger.
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level from `settings.toml`, if any
/// * `output_dir`: The output folder of a run. If given, the log file is written there.
pub fn init(log_level_from_settings: Option<&str>, output_dir: Option<&Path>) -> Result<()> {
    let level = resolve_log_level(log_level_from_settings)?;

    let mut dispatch = Dispatch::new().chain(console_dispatch(level));
    if let Some(output_dir) = output_dir {
        let file_path = output_dir.join(LOG_FILE_NAME);
        let file = fern::log_file(&file_path)
            .with_context(|| format!("Failed to create log file: {}", file_path.display()))?;
        dispatch = dispatch.chain(file_dispatch(level, file));
    }

    dispatch.apply().context("Logger already initialised")?;
    LOGGER_INITIALISED.store(true, Ordering::SeqCst);

    Ok(())
}
