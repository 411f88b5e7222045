//! Tracing bootstrap for binaries and tests.
//!
//! Library crates log through the `log` facade; the subscriber installed here
//! also picks those records up.

use anyhow::{Result, anyhow};
use data_runtime::configs::telemetry::{LogFormat, TelemetryCfg};

pub struct TelemetryGuard;

pub fn init_telemetry(cfg: &TelemetryCfg) -> Result<TelemetryGuard> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};
    let filter = EnvFilter::try_new(&cfg.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = match cfg.format {
        LogFormat::Json => fmt::layer().json().boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow!("install tracing subscriber: {e}"))?;
    tracing::info!(
        target: "telemetry",
        filter = %cfg.filter,
        format = ?cfg.format,
        "telemetry initialized"
    );
    Ok(TelemetryGuard)
}
