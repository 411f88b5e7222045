//! Field configuration.

use crate::{Brush, SurfaceError};
use data_runtime::configs::surfaces::{BoundsPolicy, DeformationCfg, TrailCfg};

/// What a field does with a stamp whose UV falls outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfBoundsPolicy {
    /// Ignore the stamp.
    Reject,
    /// Paint at the toroidally wrapped location; shaders sample with `fract()`.
    Wrap,
    /// Clamp the UV onto the field edge; shaders sample with `clamp()`.
    Clamp,
}

impl From<BoundsPolicy> for OutOfBoundsPolicy {
    fn from(p: BoundsPolicy) -> Self {
        match p {
            BoundsPolicy::Reject => Self::Reject,
            BoundsPolicy::Wrap => Self::Wrap,
            BoundsPolicy::Clamp => Self::Clamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Darkening tint sampled in the fragment stage.
    Trail,
    /// Height offset sampled in the vertex stage.
    Deformation,
}

impl SurfaceKind {
    /// Prefix used for generated shader identifiers.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            SurfaceKind::Trail => "trail",
            SurfaceKind::Deformation => "deform",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceParams {
    pub kind: SurfaceKind,
    /// World-space side length of the square field.
    pub size: f32,
    /// Texels per side.
    pub resolution: u32,
    /// Value every texel is reset to on clear and on reclaimed edges.
    pub baseline: f32,
    pub brush: Brush,
    pub policy: OutOfBoundsPolicy,
    /// Vertex displacement scale; unused by the trail.
    pub depth: f32,
}

impl SurfaceParams {
    #[must_use]
    pub fn trail() -> Self {
        Self::trail_from_cfg(&TrailCfg::default())
    }

    #[must_use]
    pub fn deformation() -> Self {
        Self::deformation_from_cfg(&DeformationCfg::default())
    }

    #[must_use]
    pub fn trail_from_cfg(cfg: &TrailCfg) -> Self {
        Self {
            kind: SurfaceKind::Trail,
            size: cfg.size,
            resolution: cfg.resolution,
            baseline: 0.0,
            brush: Brush::RadialGradient {
                radius: cfg.stamp_radius,
                strength: cfg.stamp_strength,
                edge_strength: cfg.edge_strength,
            },
            policy: cfg.policy.into(),
            depth: 0.0,
        }
    }

    #[must_use]
    pub fn deformation_from_cfg(cfg: &DeformationCfg) -> Self {
        Self {
            kind: SurfaceKind::Deformation,
            size: cfg.size,
            resolution: cfg.resolution,
            baseline: 1.0,
            brush: Brush::FlatDisc {
                radius: cfg.stamp_radius,
                strength: cfg.stamp_strength,
            },
            policy: cfg.policy.into(),
            depth: cfg.depth,
        }
    }

    pub fn validate(&self) -> Result<(), SurfaceError> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(SurfaceError::NonPositiveSize(self.size));
        }
        if self.resolution == 0 {
            return Err(SurfaceError::NonPositiveResolution);
        }
        let texel = self.size / self.resolution as f32;
        if !texel.is_normal() {
            return Err(SurfaceError::DegenerateTexel(texel));
        }
        let r = self.brush.radius();
        if !r.is_finite() || r <= 0.0 {
            return Err(SurfaceError::NonPositiveBrushRadius(r));
        }
        Ok(())
    }
}
