use std::sync::Once;

use tracing::debug;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

/// Install the test logging subscriber once per test binary.
///
/// `RUST_LOG` overrides the default `cattree=debug` filter. Output goes
/// through the test writer, so it only shows for failing tests or with
/// `--nocapture`.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cattree=debug"));

        let installed = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_test_writer()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_filter(env_filter),
            )
            .try_init();

        match installed {
            Ok(()) => debug!("test logging installed"),
            Err(e) => eprintln!("test logging not installed: {}", e),
        }
    });
}
