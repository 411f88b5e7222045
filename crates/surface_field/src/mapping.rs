//! World ↔ UV ↔ texel mapping.
//!
//! The CPU stamping path and the generated shader chunks both go through this
//! module: `world_to_uv` and `world_to_uv_wgsl` encode the same affine map and
//! must be edited together.

use glam::Vec2;

/// Affine map from world XZ to field UV for a square field of side `size`
/// centred on `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvTransform {
    pub origin: Vec2,
    pub size: f32,
}

impl UvTransform {
    #[inline]
    #[must_use]
    pub fn world_to_uv(&self, x: f32, z: f32) -> Vec2 {
        let half = self.size * 0.5;
        Vec2::new(
            (x - (self.origin.x - half)) / self.size,
            (z - (self.origin.y - half)) / self.size,
        )
    }

    #[inline]
    #[must_use]
    pub fn uv_to_world(&self, uv: Vec2) -> Vec2 {
        let half = self.size * 0.5;
        Vec2::new(
            uv.x * self.size + self.origin.x - half,
            uv.y * self.size + self.origin.y - half,
        )
    }
}

/// Texel-space position of a UV. Rows are stored top-down like an image, so
/// `v = 1` is row 0.
#[inline]
#[must_use]
pub fn uv_to_texel(uv: Vec2, resolution: u32) -> Vec2 {
    let r = resolution as f32;
    Vec2::new(uv.x * r, (1.0 - uv.y) * r)
}

/// WGSL expression for [`UvTransform::world_to_uv`]. Arguments are WGSL
/// expressions for the world XZ (`vec2<f32>`), the origin (`vec2<f32>`) and the
/// size (`f32`).
#[must_use]
pub fn world_to_uv_wgsl(world_xz: &str, origin: &str, size: &str) -> String {
    format!("(({world_xz}) - (({origin}) - vec2<f32>(({size}) * 0.5))) / ({size})")
}

/// WGSL expression turning a field UV into texture coordinates matching the
/// top-down row order of [`uv_to_texel`].
#[must_use]
pub fn texel_uv_wgsl(uv: &str) -> String {
    format!("vec2<f32>(({uv}).x, 1.0 - ({uv}).y)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn origin_maps_to_centre_and_half_size_to_corner() {
        let t = UvTransform {
            origin: Vec2::new(12.0, -7.0),
            size: 40.0,
        };
        let c = t.world_to_uv(12.0, -7.0);
        assert_abs_diff_eq!(c.x, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(c.y, 0.5, epsilon = 1e-6);
        let e = t.world_to_uv(32.0, 13.0);
        assert_abs_diff_eq!(e.x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(e.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn uv_to_world_inverts() {
        let t = UvTransform {
            origin: Vec2::new(3.0, 4.0),
            size: 10.0,
        };
        let w = t.uv_to_world(t.world_to_uv(5.5, -0.25));
        assert_abs_diff_eq!(w.x, 5.5, epsilon = 1e-5);
        assert_abs_diff_eq!(w.y, -0.25, epsilon = 1e-5);
    }

    #[test]
    fn rows_are_top_down() {
        let p = uv_to_texel(Vec2::new(0.25, 1.0), 8);
        assert_abs_diff_eq!(p.x, 2.0);
        assert_abs_diff_eq!(p.y, 0.0);
    }

    #[test]
    fn wgsl_expression_matches_cpu_formula() {
        let s = world_to_uv_wgsl("p", "o", "s");
        assert_eq!(s, "((p) - ((o) - vec2<f32>((s) * 0.5))) / (s)");
    }
}
