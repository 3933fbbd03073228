use std::sync::Once;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

pub const DEFAULT_LOG_FILTER: &str = "info,forge_test_utils=debug";

/// Installs a stdout subscriber once per process. `RUST_LOG` overrides the
/// default filter.
pub fn setup_telemetry() {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let stdout_layer = fmt::Layer::new()
            .with_writer(std::io::stdout)
            .with_ansi(true);

        // A subscriber installed by another harness wins.
        let _ = tracing_subscriber::registry()
            .with(stdout_layer)
            .with(env_filter)
            .try_init();
    });
}
