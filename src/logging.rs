use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::LogFormat;

/// Default filter when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "lte_provision=debug"
    } else {
        "lte_provision=warn"
    }
}

/// Build the stderr subscriber without installing it.
fn subscriber(verbose: bool, format: LogFormat) -> Box<dyn Subscriber + Send + Sync> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    match format {
        LogFormat::Json => Box::new(
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr)),
        ),
        LogFormat::Pretty => Box::new(
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr)),
        ),
    }
}

/// Install the global subscriber, writing to stderr so stdout carries only
/// the response. A second call is a no-op.
pub fn init(verbose: bool, format: LogFormat) {
    let _ = subscriber(verbose, format).try_init();
}
