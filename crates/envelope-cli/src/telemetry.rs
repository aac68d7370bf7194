//! Logging for the command-line front end.
//!
//! One flattened JSON object per line on stderr, so stdout carries only
//! command output. Every event is tagged with the running command through a
//! root span. Key material and plaintext never appear in any field.

use anyhow::{Context, Result};
use tracing::span::EnteredSpan;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber and enter the per-invocation span.
///
/// `RUST_LOG` wins when set; otherwise `log_level` is used. Keep the returned
/// guard alive for as long as events should carry the command tag.
///
/// # Errors
///
/// Returns an error if `log_level` is not a valid filter or the subscriber has
/// already been set.
pub fn init(log_level: &str, command: &'static str) -> Result<EnteredSpan> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(log_level)?,
    };

    tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))?;

    // Error level so the span passes any filter that lets an event through.
    Ok(tracing::error_span!("envelope-cli", command).entered())
}

fn level_filter(log_level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(log_level)
        .with_context(|| format!("ENVELOPE_LOG_LEVEL {log_level:?} is not a valid filter"))
}
