//! Stamp brushes composited source-over into a field.

use glam::Vec2;

/// Discs narrower than this (texels) are widened so they always cover the
/// nearest texel, even when centred on a texel corner.
const MIN_RADIUS_PX: f32 = 0.71;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Brush {
    /// Paints toward 1.0 with opacity falling from `strength` at the centre to
    /// `edge_strength` at `radius`.
    RadialGradient {
        radius: f32,
        strength: f32,
        edge_strength: f32,
    },
    /// Paints toward 0.0 with uniform opacity `strength`.
    FlatDisc { radius: f32, strength: f32 },
}

impl Brush {
    /// World-space radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        match *self {
            Brush::RadialGradient { radius, .. } | Brush::FlatDisc { radius, .. } => radius,
        }
    }

    /// Opacity and target value at normalised distance `t` from the centre.
    fn sample(&self, t: f32) -> (f32, f32) {
        match *self {
            Brush::RadialGradient {
                strength,
                edge_strength,
                ..
            } => (strength + (edge_strength - strength) * t, 1.0),
            Brush::FlatDisc { strength, .. } => (strength, 0.0),
        }
    }

    /// Composite one disc centred at `center` (texel space) with radius
    /// `radius_px` texels into a `res`×`res` grid. Texels outside the grid are
    /// clipped; edge texels get partial coverage.
    pub(crate) fn paint(&self, texels: &mut [f32], res: u32, center: Vec2, radius_px: f32) {
        let r = radius_px.max(MIN_RADIUS_PX);
        let n = i64::from(res);
        let x0 = ((center.x - r - 1.0).floor() as i64).max(0);
        let x1 = ((center.x + r + 1.0).ceil() as i64).min(n - 1);
        let y0 = ((center.y - r - 1.0).floor() as i64).max(0);
        let y1 = ((center.y + r + 1.0).ceil() as i64).min(n - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = p.distance(center);
                let coverage = (r + 0.5 - d).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let t = (d / r).min(1.0);
                let (alpha, target) = self.sample(t);
                let a = (alpha * coverage).clamp(0.0, 1.0);
                let idx = (y * n + x) as usize;
                texels[idx] += (target - texels[idx]) * a;
            }
        }
    }

    /// Whether a disc at `center` could touch the grid at all.
    pub(crate) fn touches(center: Vec2, radius_px: f32, res: u32) -> bool {
        let n = res as f32;
        let r = radius_px.max(MIN_RADIUS_PX) + 1.0;
        center.x + r >= 0.0 && center.x - r <= n && center.y + r >= 0.0 && center.y - r <= n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_is_strongest_at_centre() {
        let brush = Brush::RadialGradient {
            radius: 1.0,
            strength: 0.9,
            edge_strength: 0.3,
        };
        let mut grid = vec![0.0f32; 16 * 16];
        brush.paint(&mut grid, 16, Vec2::new(8.0, 8.0), 4.0);
        let centre = grid[7 * 16 + 7];
        let rim = grid[7 * 16 + 11];
        assert!(centre > 0.75, "centre={centre}");
        assert!(rim > 0.0 && rim < centre, "rim={rim} centre={centre}");
        assert_eq!(grid[0], 0.0);
    }

    #[test]
    fn disc_darkens_toward_zero() {
        let brush = Brush::FlatDisc {
            radius: 1.0,
            strength: 0.4,
        };
        let mut grid = vec![1.0f32; 8 * 8];
        brush.paint(&mut grid, 8, Vec2::new(4.0, 4.0), 1.5);
        assert!((grid[3 * 8 + 3] - 0.6).abs() < 1e-5);
        assert_eq!(grid[0], 1.0);
    }

    #[test]
    fn painting_off_grid_is_clipped() {
        let brush = Brush::FlatDisc {
            radius: 1.0,
            strength: 1.0,
        };
        let mut grid = vec![1.0f32; 4 * 4];
        brush.paint(&mut grid, 4, Vec2::new(-20.0, 2.0), 1.0);
        assert!(grid.iter().all(|&v| v == 1.0));
    }
}
