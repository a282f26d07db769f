use crate::error::{DocError, Result};
use chrono::Local;
use env_logger::{Builder, Env, Target};
use log::{self, LevelFilter};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use yansi::Paint;

/// Initializes the application's logging system with the specified log level.
///
/// `RUST_LOG`, when set, overrides `log_level`. Records go to stderr in
/// colour and, when `log_file` is given, are also appended to that file as
/// plain text.
pub fn init(log_level: &str, log_file: Option<&Path>) -> Result<()> {
    let file = match log_file {
        Some(path) => Some(Mutex::new(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| DocError::Config(format!("Cannot open log file {}: {}", path.display(), e)))?,
        )),
        None => None,
    };

    Builder::new()
        .filter_level(parse_log_level(log_level))
        .parse_env(Env::default().write_style_or("RUST_LOG_STYLE", "auto"))
        .format(move |buf, record| {
            if let Some(file) = &file {
                // a failed file write must not drop the stderr line
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{}", format_plain(record));
                }
            }
            writeln!(buf, "{}", format_log(record))
        })
        .target(Target::Stderr)
        .try_init()
        .map_err(|e| DocError::Config(format!("Logger already initialized: {}", e)))
}

/// Formats a log record into a structured string
///
/// Returns a formatted string with timestamp, coloured level, target and message
pub fn format_log(record: &log::Record) -> String {
    let label = level_label(record.level());
    let level = match record.level() {
        log::Level::Error => Paint::red(label).bold(),
        log::Level::Warn => Paint::yellow(label).bold(),
        log::Level::Info => Paint::cyan(label).bold(),
        log::Level::Debug => Paint::blue(label).bold(),
        log::Level::Trace => Paint::new(label),
    };
    format!("[{}] {} [{}] {}", timestamp(), level, record_target(record), record.args())
}

/// Same layout as [`format_log`] without colour codes, for the log file
pub fn format_plain(record: &log::Record) -> String {
    format!(
        "[{}] {} [{}] {}",
        timestamp(),
        level_label(record.level()),
        record_target(record),
        record.args()
    )
}

/// Parses a log level string into a LevelFilter
///
/// Returns the corresponding LevelFilter, defaulting to Info for invalid strings
pub fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn level_label(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARN ",
        log::Level::Info => "INFO ",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    }
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

fn record_target<'a>(record: &'a log::Record<'a>) -> &'a str {
    if record.target().is_empty() {
        record.module_path().unwrap_or("unknown")
    } else {
        record.target()
    }
}

/// A warning recorded during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunWarning {
    /// Component that raised it
    pub component: String,
    /// Human readable message
    pub message: String,
}

/// Logging context for one documentation run.
///
/// Built once per invocation and handed to each stage. Every event is
/// forwarded to the `log` facade tagged with the run id; warnings are also
/// kept so the caller can report what was dropped along the way.
#[derive(Debug, Clone)]
pub struct RunLog {
    run_id: String,
    warnings: Arc<Mutex<Vec<RunWarning>>>,
}

impl RunLog {
    /// Starts a new run with a fresh id
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().simple().to_string()[..8].to_string())
    }

    /// Starts a run with a caller-chosen id
    pub fn with_id(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            warnings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Identifier attached to every record of this run
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Logs an informational event
    pub fn info(&self, component: &str, message: impl AsRef<str>) {
        log::info!(target: component, "[run {}] {}", self.run_id, message.as_ref());
    }

    /// Logs a debug event
    pub fn debug(&self, component: &str, message: impl AsRef<str>) {
        log::debug!(target: component, "[run {}] {}", self.run_id, message.as_ref());
    }

    /// Logs and records a warning
    pub fn warn(&self, component: &str, message: impl Into<String>) {
        let message = message.into();
        log::warn!(target: component, "[run {}] {}", self.run_id, message);
        if let Ok(mut warnings) = self.warnings.lock() {
            warnings.push(RunWarning {
                component: component.to_string(),
                message,
            });
        }
    }

    /// Logs an error event
    pub fn error(&self, component: &str, message: impl AsRef<str>) {
        log::error!(target: component, "[run {}] {}", self.run_id, message.as_ref());
    }

    /// Snapshot of the warnings recorded so far
    pub fn warnings(&self) -> Vec<RunWarning> {
        self.warnings.lock().map(|w| w.clone()).unwrap_or_default()
    }

    /// Number of warnings recorded so far
    pub fn warning_count(&self) -> usize {
        self.warnings.lock().map(|w| w.len()).unwrap_or(0)
    }
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new()
    }
}
