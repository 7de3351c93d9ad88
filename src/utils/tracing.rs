use crate::utils::from_env::FromEnvVar;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

const TRACING_LOG_JSON: &str = "TRACING_LOG_JSON";

/// Init tracing with a `fmt` layer filtered by `RUST_LOG`.
///
/// ## Env Reads
///
/// - `RUST_LOG` - The filter directives for the `fmt` layer.
/// - `TRACING_LOG_JSON` - If set and non-empty, emit JSON log lines.
///
/// ## Panics
///
/// This function will panic if a global subscriber has already been set.
pub fn init_tracing() {
    let registry = tracing_subscriber::registry();
    let filter = EnvFilter::from_default_env();

    let json = bool::from_env_var(TRACING_LOG_JSON).unwrap_or(false);
    if json {
        let fmt = tracing_subscriber::fmt::layer().json().with_filter(filter);
        registry.with(fmt).init();
    } else {
        let fmt = tracing_subscriber::fmt::layer().with_filter(filter);
        registry.with(fmt).init();
    }
}
