//! Logger setup
//!
//! Logs go to stderr. Stdout is reserved for the envelope.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "act_bridge=debug"
    } else {
        "act_bridge=info"
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logger(debug: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(true), "act_bridge=debug");
        assert_eq!(default_filter(false), "act_bridge=info");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logger(false);
        init_logger(true);
    }
}
