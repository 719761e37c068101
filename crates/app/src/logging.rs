use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

pub const LOG_FILE_NAME: &str = "arbor.log";

/// Flushes buffered log lines when dropped
#[must_use = "logs are lost if the guards are dropped early"]
pub struct LogGuards(#[allow(dead_code)] Vec<WorkerGuard>);

fn level_filter(level: tracing::Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// Daily rolling writer under `log_dir`, or `None` if the directory cannot
/// be created.
fn file_writer(log_dir: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!("Warning: logging to stderr only, cannot create {:?}: {}", log_dir, e);
        return None;
    }
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    Some(tracing_appender::non_blocking(appender))
}

/// Install the global subscriber. Logs always go to stderr, since stdout
/// carries command output, and additionally to `<log_dir>/arbor.log.<date>`
/// when a directory is given. `RUST_LOG` overrides `level`.
pub fn init_logging(level: tracing::Level, log_dir: Option<&Path>) -> LogGuards {
    let (stderr, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());
    let mut guards = vec![stderr_guard];

    let stderr_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level_filter(level));

    let file_layer = log_dir.and_then(file_writer).map(|(writer, guard)| {
        guards.push(guard);
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(level_filter(level))
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    register_panic_logger();
    LogGuards(guards)
}

/// Route panics through tracing so they reach the log file too
pub fn register_panic_logger() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));
        tracing::error!(panic = %info, location = location.as_deref(), "arbor panicked");
    }));
}
