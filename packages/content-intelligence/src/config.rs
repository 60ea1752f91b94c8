use std::path::PathBuf;

use crate::logging::{FileLogSettings, LogRotation};

const DEFAULT_LOG_DIR: &str = "./logs";

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    /// JSON input consumed by the binary; overridable by the first CLI argument.
    pub data_file: Option<PathBuf>,
    /// Set when `ENABLE_FILE_LOGS` is on.
    pub file_logs: Option<FileLogSettings>,
}

/// `true`/`1`/`yes`/`on`, case-insensitive.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn file_log_settings(
    enabled: Option<String>,
    dir: Option<String>,
    rotation: Option<String>,
) -> Option<FileLogSettings> {
    if !enabled.as_deref().is_some_and(parse_flag) {
        return None;
    }
    let dir = dir
        .and_then(non_empty)
        .unwrap_or_else(|| DEFAULT_LOG_DIR.to_string());
    let rotation = rotation
        .as_deref()
        .and_then(LogRotation::parse)
        .unwrap_or_default();
    Some(FileLogSettings {
        dir: PathBuf::from(dir),
        rotation,
    })
}

impl Config {
    pub fn from_env() -> Self {
        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let data_file = std::env::var("INTEL_DATA_FILE")
            .ok()
            .and_then(non_empty)
            .map(PathBuf::from);

        let file_logs = file_log_settings(
            std::env::var("ENABLE_FILE_LOGS").ok(),
            std::env::var("LOG_DIR").ok(),
            std::env::var("LOG_ROTATION").ok(),
        );

        Self {
            log_level,
            data_file,
            file_logs,
        }
    }
}
