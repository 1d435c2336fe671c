//! Logging initialisation and panic reporting.
//!
//! Called once from `main` before anything else logs. Components log through
//! the global `tracing` dispatcher; there is no lazily created logger.

use anyhow::{Context, Result};
use std::backtrace::Backtrace;
use tracing_subscriber::EnvFilter;

use crate::api::middleware::recovery::panic_message;

/// Installs the global subscriber and the panic hook.
///
/// # Arguments
///
/// - `level` - `EnvFilter` directive, e.g. `info` or `blog_api=debug,tower_http=info`
/// - `format` - `text` or `json`
///
/// # Errors
///
/// Returns an error if the filter directive is invalid or a global subscriber
/// is already installed.
pub fn init(level: &str, format: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .with_context(|| format!("Invalid log filter '{}'", level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    install_panic_hook();
    Ok(())
}

/// Routes panic reports through `tracing` with the location and a backtrace.
///
/// The hook only reports; recovery into a 500 response happens in
/// [`crate::api::middleware::recovery`].
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let fault = panic_message(info.payload());
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());
        let backtrace = Backtrace::force_capture();

        tracing::error!(
            fault = %fault,
            location = %location,
            backtrace = %backtrace,
            "Panic"
        );
    }));
}
