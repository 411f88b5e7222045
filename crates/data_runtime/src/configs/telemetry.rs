//! Logging setup for the session and the headless harness, loaded from
//! data/config/telemetry.toml with env overrides.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Output layer installed by `init_telemetry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Multi-line human-readable records.
    #[default]
    Pretty,
    /// One JSON object per record.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown log format '{other}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TelemetryCfg {
    /// `EnvFilter` directive, e.g. `info,skier_core=debug`.
    pub filter: String,
    pub format: LogFormat,
    /// Frames between skier progress records in headless runs; 0 disables them.
    pub progress_every: u32,
}

impl Default for TelemetryCfg {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
            progress_every: 60,
        }
    }
}

pub fn load_default() -> Result<TelemetryCfg> {
    let path = crate::loader::data_root().join("config/telemetry.toml");
    let mut cfg = if path.is_file() {
        let txt = std::fs::read_to_string(&path)
            .with_context(|| format!("read {}", path.display()))?;
        toml::from_str::<TelemetryCfg>(&txt).context("parse telemetry TOML")?
    } else {
        TelemetryCfg::default()
    };
    // Env overrides
    if let Ok(filter) = std::env::var("LOG_LEVEL") {
        cfg.filter = filter;
    }
    if let Ok(v) = std::env::var("LOG_FORMAT") {
        cfg.format = v.parse().context("LOG_FORMAT")?;
    }
    if let Some(n) = std::env::var("SIM_PROGRESS_EVERY")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        cfg.progress_every = n;
    }
    Ok(cfg)
}
