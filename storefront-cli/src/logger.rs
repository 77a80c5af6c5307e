//! Logging Infrastructure
//!
//! Console output goes to stderr so command output on stdout stays clean.
//! When a log directory is given, logs go to a daily rolling file instead.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "storefront=info,storefront_client=info";

/// Initialize the logger with optional file output
pub fn init_logger(log_dir: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        match std::fs::create_dir_all(dir) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(dir, "storefront");
                subscriber.with_ansi(false).with_writer(file_appender).init();
                return;
            }
            Err(e) => eprintln!("log directory {} unavailable: {e}", dir.display()),
        }
    }

    subscriber.with_writer(std::io::stderr).init();
}
