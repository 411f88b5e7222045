//! Trail and deformation field settings loaded from data/config/surfaces.toml.

use anyhow::{Context, Result};
use serde::Deserialize;

/// What a field does with stamps whose UV lands outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    Reject,
    Wrap,
    Clamp,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrailCfg {
    pub size: f32,
    pub resolution: u32,
    pub stamp_radius: f32,
    pub stamp_strength: f32,
    pub edge_strength: f32,
    pub policy: BoundsPolicy,
}

impl Default for TrailCfg {
    fn default() -> Self {
        Self {
            size: 120.0,
            resolution: 512,
            stamp_radius: 0.25,
            stamp_strength: 0.9,
            edge_strength: 0.3,
            policy: BoundsPolicy::Reject,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeformationCfg {
    pub size: f32,
    pub resolution: u32,
    pub depth: f32,
    pub stamp_radius: f32,
    pub stamp_strength: f32,
    pub policy: BoundsPolicy,
}

impl Default for DeformationCfg {
    fn default() -> Self {
        Self {
            size: 120.0,
            resolution: 512,
            depth: 0.15,
            stamp_radius: 0.4,
            stamp_strength: 0.4,
            policy: BoundsPolicy::Wrap,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SurfacesCfg {
    pub trail: TrailCfg,
    pub deformation: DeformationCfg,
}

pub fn load_default() -> Result<SurfacesCfg> {
    let path = crate::loader::data_root().join("config/surfaces.toml");
    let mut cfg = if path.is_file() {
        let txt =
            std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        toml::from_str::<SurfacesCfg>(&txt).context("parse surfaces TOML")?
    } else {
        SurfacesCfg::default()
    };
    if let Some(r) = std::env::var("TRAIL_RESOLUTION")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        cfg.trail.resolution = r;
    }
    if let Some(r) = std::env::var("DEFORM_RESOLUTION")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        cfg.deformation.resolution = r;
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_default_independently() {
        let cfg: SurfacesCfg = toml::from_str("[deformation]\ndepth = 0.3\npolicy = \"clamp\"")
            .expect("parse");
        assert_eq!(cfg.deformation.depth, 0.3);
        assert_eq!(cfg.deformation.policy, BoundsPolicy::Clamp);
        assert_eq!(cfg.deformation.resolution, 512);
        assert_eq!(cfg.trail, TrailCfg::default());
    }
}
