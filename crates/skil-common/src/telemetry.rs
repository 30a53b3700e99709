use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize stderr tracing for a SKIL component.
///
/// - `service_name`: identifies the component in the startup event (e.g. "skil-cli")
/// - `default_level`: filter used when `RUST_LOG` is unset or invalid
///
/// Calling this twice is harmless; the second registration is ignored.
pub fn init_tracing(service_name: &str, default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_ok()
    {
        tracing::debug!(service_name, "tracing initialized");
    }
}
