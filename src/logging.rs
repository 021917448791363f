/// Structured logging for the weather summary pipeline
///
/// Provides context-rich logging tagged with the pipeline stage and an
/// optional subject (a variable name or fact kind), with timestamps and
/// severity levels. Supports console output and an append-only log file.
///
/// Nothing is emitted until `init_logger` has been called, so library users
/// and tests stay quiet by default.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline Stages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loader,
    Analyzer,
    Planner,
    Realizer,
    System,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Loader => write!(f, "LOAD"),
            Stage::Analyzer => write!(f, "ANALYZE"),
            Stage::Planner => write!(f, "PLAN"),
            Stage::Realizer => write!(f, "REALIZE"),
            Stage::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Skip Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipSeverity {
    /// Expected gap - e.g. no phrasing is registered for this fact kind
    Expected,
    /// Unexpected gap - a template asked for data the fact did not carry
    Unexpected,
}

impl fmt::Display for SkipSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipSeverity::Expected => write!(f, "EXPECTED"),
            SkipSeverity::Unexpected => write!(f, "UNEXPECTED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    fn log(&self, level: LogLevel, stage: Stage, subject: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let subject_part = subject.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let log_entry = format_entry(&timestamp.to_string(), level, stage, subject_part.as_str(), message);

        // Summaries go to stdout, so everything but plain info goes to stderr
        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning | LogLevel::Debug => eprintln!("{}", log_entry),
                LogLevel::Info => eprintln!("   {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", stage, subject_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", stage, subject_part, message),
                LogLevel::Info => eprintln!("   {}", message),
                LogLevel::Debug => {} // Skip debug in non-timestamp mode
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

fn format_entry(timestamp: &str, level: LogLevel, stage: Stage, subject_part: &str, message: &str) -> String {
    format!("{} {} {}{}: {}", timestamp, level, stage, subject_part, message)
}

fn with_logger(level: LogLevel, stage: Stage, subject: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, stage, subject, message);
        }
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

/// Log a general informational message
pub fn info(stage: Stage, subject: Option<&str>, message: &str) {
    with_logger(LogLevel::Info, stage, subject, message);
}

/// Log a warning message
pub fn warn(stage: Stage, subject: Option<&str>, message: &str) {
    with_logger(LogLevel::Warning, stage, subject, message);
}

/// Log an error message
pub fn error(stage: Stage, subject: Option<&str>, message: &str) {
    with_logger(LogLevel::Error, stage, subject, message);
}

/// Log a debug message
pub fn debug(stage: Stage, subject: Option<&str>, message: &str) {
    with_logger(LogLevel::Debug, stage, subject, message);
}

// ---------------------------------------------------------------------------
// Structured Skip Logging
// ---------------------------------------------------------------------------

/// Log a fact the realizer dropped, at a level chosen by its severity
pub fn log_skipped_fact(fact_kind: &str, severity: SkipSeverity, reason: &str) {
    let message = format!("sentence dropped [{}]: {}", severity, reason);

    match severity {
        SkipSeverity::Expected => debug(Stage::Realizer, Some(fact_kind), &message),
        SkipSeverity::Unexpected => warn(Stage::Realizer, Some(fact_kind), &message),
    }
}

/// Log how many configured variable groups could be analyzed
pub fn log_analysis_summary(total: usize, analyzed: usize, missing: usize) {
    let message = format!(
        "Analysis complete: {}/{} variable groups analyzed, {} missing from data",
        analyzed, total, missing
    );

    if missing == 0 {
        info(Stage::Analyzer, None, &message);
    } else if analyzed == 0 {
        error(Stage::Analyzer, None, &message);
    } else {
        warn(Stage::Analyzer, None, &message);
    }
}
