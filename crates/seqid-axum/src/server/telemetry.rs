//! # Telemetry
//!
//! Structured log output for the server, filtered through `RUST_LOG`
//! (defaulting to `info`). Allocation spans and events emitted by the `seqid`
//! crate flow through the same subscriber, so fallbacks and contention show up
//! next to the request that triggered them.
//!
//! ```bash
//! RUST_LOG=seqid=trace,seqid_axum=debug cargo run --bin seqid-axum-server
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber.
///
/// Fails if a subscriber has already been installed.
pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true)
                .pretty(),
        )
        .try_init()?;

    Ok(())
}
