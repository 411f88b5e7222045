//! Ring-of-probes ground sensing.

use glam::Vec3;
use smallvec::SmallVec;

use crate::params::SkierParams;
use crate::physics::{CollisionFilter, PhysicsQuery};

/// Probes whose normal disagrees with the raw average by more than this
/// (cosine) are treated as outliers.
const NORMAL_AGREEMENT: f32 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct GroundSample {
    pub normal: Vec3,
    pub hit_points: SmallVec<[Vec3; 8]>,
}

/// Casts `probe_count` rays around the foot axis, from `foot_offset` above
/// the centre to `foot_offset + ground_probe` below it. `None` when nothing
/// on the terrain layer is hit.
pub fn probe(physics: &dyn PhysicsQuery, center: Vec3, params: &SkierParams) -> Option<GroundSample> {
    let n = params.probe_count.max(1);
    let mut points: SmallVec<[Vec3; 8]> = SmallVec::new();
    let mut normals: SmallVec<[Vec3; 8]> = SmallVec::new();
    for i in 0..n {
        let a = i as f32 / n as f32 * std::f32::consts::TAU;
        let offset = Vec3::new(a.cos() * params.probe_radius, 0.0, a.sin() * params.probe_radius);
        let from = center + offset + Vec3::Y * params.foot_offset;
        let to = center + offset - Vec3::Y * (params.foot_offset + params.ground_probe);
        if let Some(hit) = physics.raycast_closest(from, to, CollisionFilter::GROUND_PROBE) {
            points.push(hit.point);
            let nrm = hit.normal.normalize_or_zero();
            if nrm != Vec3::ZERO {
                normals.push(nrm);
            }
        }
    }
    if points.is_empty() {
        return None;
    }
    Some(GroundSample {
        normal: aggregate_normal(&normals),
        hit_points: points,
    })
}

/// Average of the normals that agree with the raw average, or of all of them
/// when none do. Falls back to +Y when the normals cancel out.
#[must_use]
pub fn aggregate_normal(normals: &[Vec3]) -> Vec3 {
    let raw = normals.iter().copied().sum::<Vec3>().normalize_or_zero();
    let agreeing: Vec3 = normals
        .iter()
        .copied()
        .filter(|n| n.dot(raw) > NORMAL_AGREEMENT)
        .sum();
    let picked = if agreeing != Vec3::ZERO {
        agreeing
    } else {
        normals.iter().copied().sum()
    };
    picked.try_normalize().unwrap_or(Vec3::Y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{NoGround, SlopePlane};
    use approx::assert_abs_diff_eq;

    #[test]
    fn outlier_normal_is_discarded() {
        let mut normals = vec![Vec3::Y; 5];
        normals.push(Vec3::X);
        let n = aggregate_normal(&normals);
        assert_abs_diff_eq!(n.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(n.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn opposing_normals_fall_back_to_up() {
        assert_eq!(aggregate_normal(&[Vec3::X, Vec3::NEG_X]), Vec3::Y);
        assert_eq!(aggregate_normal(&[]), Vec3::Y);
    }

    #[test]
    fn probes_hit_flat_ground_within_reach() {
        let params = SkierParams::default();
        let ground = SlopePlane::flat(0.0);
        let s = probe(&ground, Vec3::new(0.0, 1.0, 0.0), &params).expect("grounded");
        assert_eq!(s.hit_points.len(), 6);
        assert_abs_diff_eq!(s.normal.y, 1.0, epsilon = 1e-6);
        // Feet 0.25 above the ground: outside the 0.2 probe reach.
        assert!(probe(&ground, Vec3::new(0.0, 1.2, 0.0), &params).is_none());
        assert!(probe(&NoGround, Vec3::ZERO, &params).is_none());
    }
}
