//! # Tracing setup
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies.

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install the global fmt subscriber. Call once, at process start.
pub fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
