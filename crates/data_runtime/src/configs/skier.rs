//! Skier controller tuning loaded from data/config/skier.toml with env overrides
//! and clamping of values that would make the controller degenerate.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Which steering/orientation model drives the skier body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocomotionKind {
    /// Yaw is integrated directly and written into the body orientation.
    #[default]
    KinematicYaw,
    /// Steering and uprighting are applied as torques.
    TorqueUpright,
}

impl std::str::FromStr for LocomotionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kinematic_yaw" | "kinematic" => Ok(Self::KinematicYaw),
            "torque_upright" | "torque" => Ok(Self::TorqueUpright),
            other => anyhow::bail!("unknown locomotion model '{other}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SkierCfg {
    pub locomotion: LocomotionKind,
    pub steer_yaw_rate: f32,
    pub auto_downhill_yaw_rate: f32,
    pub forward_force: f32,
    pub boost_multiplier: f32,
    pub linear_drag: f32,
    pub lateral_drag: f32,
    pub turn_drag: f32,
    pub trail_stamp_interval: u32,
    pub jump_speed: f32,
    pub jump_charge_time: f32,
    pub jump_max_multiplier: f32,
    pub foot_offset: f32,
    pub ground_probe: f32,
    pub probe_radius: f32,
    pub probe_count: u32,
    pub smooth_normals: bool,
    pub visual_tilt_rate_grounded: f32,
    pub visual_tilt_rate_air: f32,
    pub visual_impact_threshold: f32,
    pub visual_impact_boost: f32,
    pub fall_impact_speed: f32,
    pub steer_torque: f32,
    pub yaw_damping: f32,
    pub upright_stiffness: f32,
    pub upright_damping: f32,
    pub seed: u64,
}

impl Default for SkierCfg {
    fn default() -> Self {
        Self {
            locomotion: LocomotionKind::KinematicYaw,
            steer_yaw_rate: 2.8,
            auto_downhill_yaw_rate: 0.1,
            forward_force: 10.0,
            boost_multiplier: 2.0,
            linear_drag: 0.4,
            lateral_drag: 6.0,
            turn_drag: 4.0,
            trail_stamp_interval: 2,
            jump_speed: 8.0,
            jump_charge_time: 0.6,
            jump_max_multiplier: 2.2,
            foot_offset: 0.95,
            ground_probe: 0.20,
            probe_radius: 0.2,
            probe_count: 6,
            smooth_normals: false,
            visual_tilt_rate_grounded: 8.0,
            visual_tilt_rate_air: 3.0,
            visual_impact_threshold: 1.5,
            visual_impact_boost: 1.2,
            fall_impact_speed: 0.8,
            steer_torque: 6.0,
            yaw_damping: 2.5,
            upright_stiffness: 40.0,
            upright_damping: 6.0,
            seed: 0x5EED_5A0B,
        }
    }
}

fn clamp(mut cfg: SkierCfg) -> SkierCfg {
    if cfg.probe_count == 0 {
        cfg.probe_count = 1;
    }
    if cfg.trail_stamp_interval == 0 {
        cfg.trail_stamp_interval = 1;
    }
    if cfg.jump_charge_time < 1e-4 {
        cfg.jump_charge_time = 1e-4;
    }
    if cfg.jump_max_multiplier < 1.0 {
        cfg.jump_max_multiplier = 1.0;
    }
    cfg.ground_probe = cfg.ground_probe.max(0.0);
    cfg.probe_radius = cfg.probe_radius.max(0.0);
    cfg
}

/// Load skier tuning from the default location, falling back to defaults when
/// the file is absent.
pub fn load_default() -> Result<SkierCfg> {
    let path = crate::loader::data_root().join("config/skier.toml");
    let mut cfg = if path.is_file() {
        let txt =
            std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        toml::from_str::<SkierCfg>(&txt).context("parse skier TOML")?
    } else {
        SkierCfg::default()
    };
    // Env overrides for quick tuning (optional)
    if let Some(v) = std::env::var("SKIER_FORWARD_FORCE")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        cfg.forward_force = v;
    }
    if let Some(v) = std::env::var("SKIER_STEER_RATE")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        cfg.steer_yaw_rate = v;
    }
    if let Ok(v) = std::env::var("SKIER_LOCOMOTION") {
        cfg.locomotion = v.parse().context("SKIER_LOCOMOTION")?;
    }
    Ok(clamp(cfg))
}
