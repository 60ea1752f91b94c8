use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_PREFIX: &str = "content-intelligence.log";
const FALLBACK_FILTER: &str = "info";

/// How often the file sink starts a new log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            "never" | "none" => Some(Self::Never),
            _ => None,
        }
    }

    fn to_appender(self) -> Rotation {
        match self {
            Self::Hourly => Rotation::HOURLY,
            Self::Daily => Rotation::DAILY,
            Self::Never => Rotation::NEVER,
        }
    }
}

/// Optional second sink mirroring diagnostics into rolling files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLogSettings {
    pub dir: PathBuf,
    pub rotation: LogRotation,
}

pub struct FileLogGuard {
    _guard: WorkerGuard,
    path: PathBuf,
}

impl FileLogGuard {
    pub fn dir(&self) -> &Path {
        &self.path
    }
}

/// Falls back to `info` when the directive string does not parse.
fn env_filter(log_level: &str) -> (EnvFilter, bool) {
    match EnvFilter::try_new(log_level) {
        Ok(filter) => (filter, false),
        Err(_) => (EnvFilter::new(FALLBACK_FILTER), true),
    }
}

/// Installs the global subscriber. Diagnostics always go to stderr since stdout
/// carries the JSON report. Keep the returned guard alive until exit or buffered
/// file output is lost.
pub fn init_tracing(log_level: &str, file: Option<&FileLogSettings>) -> Option<FileLogGuard> {
    let (filter, fell_back) = env_filter(log_level);
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);
    let mut filter = Some(filter);
    let mut stderr_layer = Some(stderr_layer);

    let mut file_error = None;
    let guard = match file {
        Some(settings) => match std::fs::create_dir_all(&settings.dir) {
            Ok(()) => {
                let appender = RollingFileAppender::new(
                    settings.rotation.to_appender(),
                    &settings.dir,
                    LOG_FILE_PREFIX,
                );
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let file_layer = fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true);
                tracing_subscriber::registry()
                    .with(filter.take().expect("filter unused"))
                    .with(stderr_layer.take().expect("stderr layer unused"))
                    .with(file_layer)
                    .init();
                Some(FileLogGuard {
                    _guard: guard,
                    path: settings.dir.clone(),
                })
            }
            Err(err) => {
                file_error = Some((settings.dir.clone(), err));
                None
            }
        },
        None => None,
    };

    if guard.is_none() {
        tracing_subscriber::registry()
            .with(filter.take().expect("filter unused"))
            .with(stderr_layer.take().expect("stderr layer unused"))
            .init();
    }

    if fell_back {
        tracing::warn!(value = log_level, "invalid log filter, using {FALLBACK_FILTER}");
    }
    if let Some((dir, err)) = file_error {
        tracing::warn!(dir = %dir.display(), error = %err, "file logging disabled");
    }
    if let Some(guard) = &guard {
        tracing::debug!(dir = %guard.dir().display(), "file logging enabled");
    }

    guard
}
