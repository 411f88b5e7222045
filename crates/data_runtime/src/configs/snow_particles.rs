//! Snow spray particle pool settings loaded from data/config/snow_particles.toml.

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SnowParticlesCfg {
    pub max_particles: u32,
    pub size: f32,
    pub life: f32,
    pub gravity: f32,
    pub grow_factor: f32,
    /// Packed 0xRRGGBB.
    pub base_color: u32,
    pub end_color: u32,
    pub base_alpha: f32,
    pub end_alpha: f32,
    pub seed: u64,
}

impl Default for SnowParticlesCfg {
    fn default() -> Self {
        Self {
            max_particles: 1200,
            size: 0.16,
            life: 3.0,
            gravity: -7.0,
            grow_factor: 3.0,
            base_color: 0x00f5_f9fc,
            end_color: 0x008a_8f94,
            base_alpha: 0.85,
            end_alpha: 0.35,
            seed: 0x5_0F7,
        }
    }
}

pub fn load_default() -> Result<SnowParticlesCfg> {
    let path = crate::loader::data_root().join("config/snow_particles.toml");
    let mut cfg = if path.is_file() {
        let txt =
            std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        toml::from_str::<SnowParticlesCfg>(&txt).context("parse snow_particles TOML")?
    } else {
        SnowParticlesCfg::default()
    };
    if let Some(n) = std::env::var("SNOW_MAX_PARTICLES")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        cfg.max_particles = n;
    }
    Ok(cfg)
}
