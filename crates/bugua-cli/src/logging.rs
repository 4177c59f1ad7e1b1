//! Tracing setup for the `bugua` binary.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_FILE_PREFIX: &str = "bugua.log";

const BUGUA_TARGETS: [&str; 5] = [
    "bugua",
    "bugua_core",
    "bugua_infrastructure",
    "bugua_interaction",
    "bugua_application",
];

fn default_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "info" };
    let directives: Vec<String> = std::iter::once("warn".to_string())
        .chain(BUGUA_TARGETS.iter().map(|t| format!("{t}={level}")))
        .collect();
    EnvFilter::new(directives.join(","))
}

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides the default filter. The terminal only shows warnings
/// unless `verbose` is set; the daily file under `logs_dir` gets everything
/// the filter lets through. Keep the returned guard alive until exit so the
/// file writer flushes.
pub fn init(logs_dir: Option<&Path>, verbose: bool) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose));

    let stderr_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let stderr_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(stderr_level);

    let mut guard = None;
    let file_layer = logs_dir.and_then(|dir| match std::fs::create_dir_all(dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, file_guard) = tracing_appender::non_blocking(appender);
            guard = Some(file_guard);
            Some(fmt::layer().with_ansi(false).with_writer(writer))
        }
        Err(e) => {
            eprintln!("Cannot create log directory {}: {}", dir.display(), e);
            None
        }
    });

    if tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        eprintln!("A tracing subscriber is already installed");
    }

    guard
}
