//! Telemetry and observability setup.
//!
//! Structured logging through `tracing`, with a pretty layer for local runs
//! and a JSON layer for log shipping.

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `log_level` when set.
///
/// # Examples
///
/// ```no_run
/// use leaderboard_common::telemetry::init_tracing;
///
/// init_tracing("challenge-leaderboard", false, "info")
///     .expect("Failed to initialize tracing");
/// ```
pub fn init_tracing(service_name: &str, json_format: bool, log_level: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = Registry::default().with(env_filter);

    if json_format {
        registry
            .with(json_layer())
            .try_init()
            .context("Failed to initialize tracing subscriber")?;
    } else {
        registry
            .with(pretty_layer())
            .try_init()
            .context("Failed to initialize tracing subscriber")?;
    }

    tracing::debug!(service = service_name, json = json_format, "tracing initialized");
    Ok(())
}

/// Create a JSON logging layer
fn json_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_thread_names(true)
        .with_target(true)
        .with_level(true)
}

/// Create a pretty-formatted logging layer
fn pretty_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .pretty()
        .with_thread_names(true)
        .with_target(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_fails_cleanly() {
        // Only one global subscriber per process; the second call reports an error.
        let _ = init_tracing("test-service", false, "info");
        let second = init_tracing("test-service", true, "info");
        assert!(second.is_err());
    }
}
