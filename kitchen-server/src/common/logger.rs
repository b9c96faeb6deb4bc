//! Logging Infrastructure
//!
//! Structured logging for the kitchen server:
//! - Console output (pretty for development, JSON for production)
//! - Daily rotating application logs under `logs/app/` (deleted after 14 days)
//! - Permanent audit logs under `logs/audit/` (order and stock mutations)

use std::fs;
use std::path::{Path, PathBuf};
use tracing::Subscriber;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{FilterExt, filter_fn};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Target used by [`audit_log!`](crate::audit_log)
pub const AUDIT_TARGET: &str = "audit";

/// Days an application log file is kept
pub const APP_LOG_RETENTION_DAYS: i64 = 14;

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Clean up application log files older than `retention_days`
///
/// Audit logs are never touched. Returns the number of files removed.
pub fn cleanup_old_logs(log_dir: &Path, retention_days: i64) -> anyhow::Result<usize> {
    let cutoff = (chrono::Local::now() - chrono::Duration::days(retention_days)).date_naive();

    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        // app.YYYY-MM-DD.log
        let Some(date) = name
            .strip_prefix("app.")
            .and_then(|d| d.strip_suffix(".log"))
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        else {
            continue;
        };

        if date < cutoff {
            fs::remove_file(&path)?;
            removed += 1;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(removed)
}

fn rolling(dir: &Path, prefix: &str) -> anyhow::Result<RollingFileAppender> {
    fs::create_dir_all(dir)?;
    Ok(RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)?)
}

fn console_layer<S>(level: &str, json_format: bool) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .with_filter(filter)
            .boxed()
    }
}

fn file_layer<S, F>(appender: RollingFileAppender, json_format: bool, filter: F) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    F: tracing_subscriber::layer::Filter<S> + Send + Sync + 'static,
{
    let writer = std::sync::Mutex::new(appender);
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(writer)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter)
            .boxed()
    }
}

/// Initialize the logging system with daily rotating logs
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn"), overridden by `RUST_LOG`
/// * `json_format` - JSON lines instead of the pretty console format
/// * `log_dir` - Optional directory for file logging (e.g., `./work_dir/logs`)
///
/// Must be called from inside a tokio runtime when `log_dir` is set (spawns
/// the cleanup task).
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let mut layers = vec![console_layer(level, json_format)];

    if let Some(log_dir) = log_dir {
        fs::create_dir_all(log_dir)?;

        // Application logs: everything except audit events
        let app_filter = EnvFilter::new(level).and(filter_fn(|meta| meta.target() != AUDIT_TARGET));
        layers.push(file_layer(
            rolling(&log_dir.join("app"), "app")?,
            json_format,
            app_filter,
        ));

        // Audit logs: kept forever
        let audit_filter = filter_fn(|meta| meta.target() == AUDIT_TARGET);
        layers.push(file_layer(
            rolling(&log_dir.join("audit"), "audit")?,
            json_format,
            audit_filter,
        ));

        tokio::spawn(periodic_cleanup(log_dir.to_path_buf()));
    }

    tracing_subscriber::registry().with(layers).try_init()?;
    Ok(())
}

/// Initialize console-only logging
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// Periodic cleanup task - runs every hour to clean old logs
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        if let Err(e) = cleanup_old_logs(&log_dir, APP_LOG_RETENTION_DAYS) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
        sleep(Duration::from_secs(3600)).await;
    }
}

/// Audit log helper - records order and stock mutations
///
/// Audit logs are stored in `logs/audit/audit.YYYY-MM-DD.log` and never
/// deleted.
///
/// # Examples
/// ```no_run
/// kitchen_server::audit_log!("order.create", "order:8f2c", "D042 Budi");
/// kitchen_server::audit_log!("stock.set", "stock:ayam");
/// ```
#[macro_export]
macro_rules! audit_log {
    ($action:expr, $resource:expr) => {
        tracing::info!(
            target: "audit",
            action = $action,
            resource = %$resource,
            timestamp = chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
    ($action:expr, $resource:expr, $details:expr) => {
        tracing::info!(
            target: "audit",
            action = $action,
            resource = %$resource,
            details = %$details,
            timestamp = chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
}
