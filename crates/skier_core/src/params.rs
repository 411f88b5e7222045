//! Controller tunables, converted from `data_runtime::configs::skier`.

use data_runtime::configs::skier::{LocomotionKind, SkierCfg};

/// How steering reaches the body orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocomotionModel {
    /// Yaw is integrated by the controller and written into the body each
    /// tick; angular velocity is zeroed. The body's own rotation integration
    /// is overridden on purpose.
    KinematicYaw,
    /// Steering and uprighting are torques; the body integrates rotation.
    TorqueUpright {
        steer_torque: f32,
        yaw_damping: f32,
        upright_stiffness: f32,
        upright_damping: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkierParams {
    pub locomotion: LocomotionModel,
    pub steer_yaw_rate: f32,
    pub auto_downhill_yaw_rate: f32,
    /// Minimum along-surface speed before yaw eases downhill.
    pub auto_align_speed_threshold: f32,
    pub forward_force: f32,
    pub boost_multiplier: f32,
    pub linear_drag: f32,
    pub lateral_drag: f32,
    pub turn_drag: f32,
    /// Stamp every Nth grounded tick.
    pub trail_stamp_interval: u32,
    pub stamp_speed_threshold: f32,
    pub jump_speed: f32,
    pub jump_charge_time: f32,
    pub jump_max_multiplier: f32,
    /// Distance from body centre to the feet.
    pub foot_offset: f32,
    /// Probe reach below the feet.
    pub ground_probe: f32,
    pub probe_radius: f32,
    pub probe_count: u32,
    pub smooth_normals: bool,
    pub normal_smoothing_rate: f32,
    pub forward_smoothing_rate: f32,
    pub penetration_epsilon: f32,
    pub max_penetration_correction: f32,
    pub visual_tilt_rate_grounded: f32,
    pub visual_tilt_rate_air: f32,
    pub visual_impact_threshold: f32,
    pub visual_impact_boost: f32,
    pub fall_impact_speed: f32,
    pub seed: u64,
}

impl Default for SkierParams {
    fn default() -> Self {
        Self::from_cfg(&SkierCfg::default())
    }
}

impl SkierParams {
    #[must_use]
    pub fn from_cfg(cfg: &SkierCfg) -> Self {
        let locomotion = match cfg.locomotion {
            LocomotionKind::KinematicYaw => LocomotionModel::KinematicYaw,
            LocomotionKind::TorqueUpright => LocomotionModel::TorqueUpright {
                steer_torque: cfg.steer_torque,
                yaw_damping: cfg.yaw_damping,
                upright_stiffness: cfg.upright_stiffness,
                upright_damping: cfg.upright_damping,
            },
        };
        Self {
            locomotion,
            steer_yaw_rate: cfg.steer_yaw_rate,
            auto_downhill_yaw_rate: cfg.auto_downhill_yaw_rate,
            auto_align_speed_threshold: 0.01,
            forward_force: cfg.forward_force,
            boost_multiplier: cfg.boost_multiplier,
            linear_drag: cfg.linear_drag,
            lateral_drag: cfg.lateral_drag,
            turn_drag: cfg.turn_drag,
            trail_stamp_interval: cfg.trail_stamp_interval.max(1),
            stamp_speed_threshold: 0.2,
            jump_speed: cfg.jump_speed,
            jump_charge_time: cfg.jump_charge_time.max(1e-4),
            jump_max_multiplier: cfg.jump_max_multiplier.max(1.0),
            foot_offset: cfg.foot_offset,
            ground_probe: cfg.ground_probe.max(0.0),
            probe_radius: cfg.probe_radius.max(0.0),
            probe_count: cfg.probe_count.max(1),
            smooth_normals: cfg.smooth_normals,
            normal_smoothing_rate: 10.0,
            forward_smoothing_rate: 8.0,
            penetration_epsilon: 1e-4,
            max_penetration_correction: 0.5,
            visual_tilt_rate_grounded: cfg.visual_tilt_rate_grounded,
            visual_tilt_rate_air: cfg.visual_tilt_rate_air,
            visual_impact_threshold: cfg.visual_impact_threshold,
            visual_impact_boost: cfg.visual_impact_boost,
            fall_impact_speed: cfg.fall_impact_speed,
            seed: cfg.seed,
        }
    }

    /// Target upward speed for a jump released after `held` seconds.
    #[must_use]
    pub fn jump_target_speed(&self, held: f32) -> f32 {
        let charge = (held / self.jump_charge_time).clamp(0.0, 1.0);
        self.jump_speed * (1.0 + (self.jump_max_multiplier - 1.0) * charge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_reference_tuning() {
        let p = SkierParams::default();
        assert_eq!(p.locomotion, LocomotionModel::KinematicYaw);
        assert_eq!(p.forward_force, 10.0);
        assert_eq!(p.trail_stamp_interval, 2);
        assert_eq!(p.probe_count, 6);
        assert_eq!(p.foot_offset, 0.95);
        assert!(p.auto_align_speed_threshold < p.stamp_speed_threshold);
    }

    #[test]
    fn torque_model_pulls_gains_from_cfg() {
        let cfg = SkierCfg {
            locomotion: LocomotionKind::TorqueUpright,
            steer_torque: 3.0,
            ..SkierCfg::default()
        };
        match SkierParams::from_cfg(&cfg).locomotion {
            LocomotionModel::TorqueUpright { steer_torque, .. } => assert_eq!(steer_torque, 3.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn jump_target_spans_base_to_max() {
        let p = SkierParams::default();
        assert_eq!(p.jump_target_speed(0.0), 8.0);
        assert!((p.jump_target_speed(0.6) - 8.0 * 2.2).abs() < 1e-4);
        assert!((p.jump_target_speed(5.0) - 8.0 * 2.2).abs() < 1e-4);
    }
}
