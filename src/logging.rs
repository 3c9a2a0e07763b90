use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,sqlx=warn,hyper=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
