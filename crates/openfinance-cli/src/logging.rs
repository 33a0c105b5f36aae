//! Process-wide `tracing` subscriber.
//!
//! Logs go to stderr unless a log file is configured, so stdout only ever
//! carries command output. `RUST_LOG` controls the filter (default `info`).

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

pub const LOG_FILE_ENV: &str = "OPENFINANCE_LOG_FILE";

/// `--log-file` wins over the environment.
pub fn resolve_log_file(flag: Option<&Path>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(LOG_FILE_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
}

pub fn init(log_file: Option<&Path>) -> Result<(), CliError> {
    let filter = env_filter();
    let installed = match log_file {
        Some(path) => tracing::subscriber::set_global_default(file_subscriber(
            open_append(path)?,
            filter,
        ))
        .map_err(|error| error.to_string()),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .map_err(|error| error.to_string()),
    };
    installed.map_err(CliError::Logging)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Plain-text subscriber appending to `file`.
pub fn file_subscriber(file: File, filter: EnvFilter) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish()
}

/// Opens `path` for appending, creating it if needed.
pub fn open_append(path: &Path) -> Result<File, CliError> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn file_logging_appends_across_runs() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("openfinance.log");

        for run in ["first", "second"] {
            let subscriber =
                file_subscriber(open_append(&path).expect("open log"), EnvFilter::new("debug"));
            tracing::subscriber::with_default(subscriber, || {
                tracing::info!(run, "invocation finished");
            });
        }

        let contents = fs::read_to_string(&path).expect("read log");
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("run=\"first\""));
        assert!(contents.contains("run=\"second\""));
        assert!(!contents.contains('\u{1b}'), "no ansi escapes in files");
    }

    #[test]
    fn filter_drops_lower_levels() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let subscriber = file_subscriber(
            open_append(file.path()).expect("open log"),
            EnvFilter::new("warn"),
        );
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("hidden");
            tracing::warn!("shown");
        });

        let contents = fs::read_to_string(file.path()).expect("read log");
        assert!(contents.contains("shown"));
        assert!(!contents.contains("hidden"));
    }

    #[test]
    fn flag_takes_precedence_over_environment() {
        let flag = Path::new("/tmp/flag.log");
        assert_eq!(resolve_log_file(Some(flag)), Some(flag.to_path_buf()));
    }
}
