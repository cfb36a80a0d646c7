//! Diagnostic logging.
//!
//! The terminal belongs to the chat UI, so `tracing` output always goes to a
//! file: the `--log-file` path when given, otherwise `ollama-chat.log` in the
//! platform data directory. The filter comes from `OLLAMA_CHAT_LOG` and
//! defaults to `warn`.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_ENV: &str = "OLLAMA_CHAT_LOG";
const DEFAULT_FILTER: &str = "warn";

pub fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "ollama-chat", "ollama-chat")
        .map(|dirs| dirs.data_local_dir().join("ollama-chat.log"))
}

pub fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Returns the path being written to, or
/// `None` when no log location could be determined.
pub fn init_tracing(log_file: Option<&Path>) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None => match default_log_path() {
            Some(path) => path,
            None => return Ok(None),
        },
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let directives = std::env::var(LOG_FILTER_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(directives.as_deref()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| e.to_string())?;

    tracing::debug!(path = %path.display(), "tracing initialized");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_falls_back_to_warn() {
        assert_eq!(build_filter(None).to_string(), "warn");
        assert_eq!(build_filter(Some("ollama_chat=notalevel")).to_string(), "warn");
    }

    #[test]
    fn filter_honors_directives() {
        assert_eq!(
            build_filter(Some("ollama_chat=debug")).to_string(),
            "ollama_chat=debug"
        );
    }

    #[test]
    fn init_creates_the_log_file_and_reports_a_second_install() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs").join("chat.log");

        let installed = init_tracing(Some(&path)).unwrap();
        assert_eq!(installed.as_deref(), Some(path.as_path()));
        assert!(path.exists());

        let err = init_tracing(Some(&path)).unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
