//! Rolling file logs for the `clientdb` binary.
//!
//! # Responsibility
//! - Start one file logger per process under a caller-chosen directory.
//! - Mirror warnings and errors to stderr for interactive use.
//!
//! # Invariants
//! - The logger starts at most once; a later call for the same directory
//!   is a no-op, any other directory is rejected.
//! - Lines are written through immediately so a short CLI run loses nothing.
//! - Events carry ids and row counts only, never client field values.

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, LogSpecification, Logger,
    LoggerHandle, Naming, WriteMode,
};
use log::{info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "clientdb";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

#[derive(Debug)]
pub enum LoggingError {
    InvalidLevel(String),
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    Backend(FlexiLoggerError),
    AlreadyActive {
        log_dir: PathBuf,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected off|error|warn|info|debug|trace"
            ),
            Self::CreateDir { path, source } => write!(
                f,
                "failed to create log directory `{}`: {source}",
                path.display()
            ),
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
            Self::AlreadyActive { log_dir } => write!(
                f,
                "file logging already writes to `{}`",
                log_dir.display()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            Self::InvalidLevel(_) | Self::AlreadyActive { .. } => None,
        }
    }
}

/// Parses a level name such as `info` or ` WARN ` (case-insensitive).
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggingError> {
    let trimmed = level.trim();
    trimmed
        .parse::<LevelFilter>()
        .map_err(|_| LoggingError::InvalidLevel(trimmed.to_string()))
}

/// `Debug` in debug builds, `Info` in release builds.
pub fn default_log_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Starts file logging into `log_dir`, creating the directory if needed.
///
/// # Errors
/// - `AlreadyActive` when logging already runs against another directory.
/// - `CreateDir` / `Backend` when the directory or log file cannot be set up.
pub fn init_logging(level: LevelFilter, log_dir: &Path) -> Result<(), LoggingError> {
    let active = ACTIVE_LOGGER.get_or_try_init(|| start_file_logger(level, log_dir))?;
    if active.log_dir != log_dir {
        return Err(LoggingError::AlreadyActive {
            log_dir: active.log_dir.clone(),
        });
    }
    Ok(())
}

/// Directory of the running file logger, if any.
pub fn active_log_dir() -> Option<&'static Path> {
    ACTIVE_LOGGER.get().map(|active| active.log_dir.as_path())
}

fn start_file_logger(level: LevelFilter, log_dir: &Path) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDir {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let handle = Logger::with(LogSpecification::builder().default(level).build())
        .log_to_file(FileSpec::default().directory(log_dir).basename(LOG_FILE_BASENAME))
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .append()
        .write_mode(WriteMode::Direct)
        .duplicate_to_stderr(Duplicate::Warn)
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Backend)?;

    info!(
        "event=logging_init module=core status=ok level={level} log_dir={} version={}",
        log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        log_dir: log_dir.to_path_buf(),
        _handle: handle,
    })
}

#[cfg(test)]
mod tests {
    use super::{active_log_dir, init_logging, parse_level, LoggingError};
    use log::LevelFilter;
    use std::fs;
    use std::path::Path;

    fn read_log_files(dir: &Path) -> String {
        let mut content = String::new();
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            let is_log = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("clientdb"));
            if is_log {
                content.push_str(&fs::read_to_string(&path).unwrap());
            }
        }
        content
    }

    #[test]
    fn parse_level_is_case_insensitive_and_rejects_unknown() {
        assert_eq!(parse_level(" WARN ").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
        assert!(matches!(
            parse_level("loud"),
            Err(LoggingError::InvalidLevel(level)) if level == "loud"
        ));
    }

    // One test owns the process-wide logger so ordering stays deterministic.
    #[test]
    fn file_logger_writes_events_and_stays_bound_to_one_directory() {
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let err = init_logging(LevelFilter::Info, &blocker.path().join("logs")).unwrap_err();
        assert!(matches!(err, LoggingError::CreateDir { .. }));
        assert!(active_log_dir().is_none());

        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        init_logging(LevelFilter::Info, &log_dir).unwrap();
        init_logging(LevelFilter::Debug, &log_dir).unwrap();
        assert_eq!(active_log_dir(), Some(log_dir.as_path()));

        log::info!("event=client_select module=repo status=ok id=7");
        log::debug!("event=below_threshold module=test");

        let content = read_log_files(&log_dir);
        assert!(content.contains("event=logging_init module=core status=ok"));
        assert!(content.contains("event=client_select module=repo status=ok id=7"));
        assert!(!content.contains("event=below_threshold"));

        let other = tempfile::tempdir().unwrap();
        let err = init_logging(LevelFilter::Info, other.path()).unwrap_err();
        assert!(matches!(err, LoggingError::AlreadyActive { log_dir: active } if active == log_dir));
    }
}
