use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the JSON stdout subscriber with `RUST_LOG` filtering. Call once
/// at service startup.
///
/// Repeated calls are no-ops; `try_init` swallows the already-set error, so
/// tests that share a process can call this freely.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json())
        .try_init();
}
