//! Logging initialization for kestrel-daemon.
//!
//! Configures `tracing-subscriber` from the resolved configuration:
//! the core treats `log_level` and `log_stderr` as plain values, and
//! this module is the collaborator that turns them into a global
//! subscriber.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use kestrel_core::config::KestrelConfig;

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, after configuration resolution and
/// before any tracing macros are used. `RUST_LOG` takes precedence
/// over the configured `log_level` when set.
pub fn init_tracing(config: &KestrelConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_stderr {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {}", e))?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {}", e))?;
    }

    Ok(())
}
