//! Logging initialization
//!
//! The library only emits `tracing` events. Test binaries call
//! [`init_test_logging`] to see them; the `golden` binary calls [`init_cli`].

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Variable holding an `EnvFilter` directive, e.g. `golden=debug`.
pub const LOG_ENV: &str = "GOLDEN_LOG";

const DEFAULT_DIRECTIVE: &str = "golden=warn";

// One guard per entry point. The global subscriber itself can only be set once
// per process, so whichever entry point runs first owns it and the other's
// `try_init` is a no-op.
static TEST_INIT: Once = Once::new();
static CLI_INIT: Once = Once::new();

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs a subscriber that writes through the test harness's captured output.
///
/// Safe to call from every test; only the first call has an effect.
pub fn init_test_logging() {
    TEST_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_test_writer()
            .try_init();
    });
}

/// Installs a stderr subscriber for the command-line tool.
pub fn init_cli() {
    CLI_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_test_logging();
        init_test_logging();
        init_cli();
        tracing::debug!("still alive");
    }

    #[test]
    fn each_entry_point_runs_its_own_guard() {
        init_cli();
        init_test_logging();
        assert!(TEST_INIT.is_completed());
        assert!(CLI_INIT.is_completed());
    }
}
