//! surface_field: toroidally wrapped scalar canvases anchored to a moving
//! world-space origin.
//!
//! A session keeps two of these: the trail field (tints the snow where the
//! skis carved) and the deformation field (lowers the snow surface in the
//! vertex stage). Both share the same world↔UV mapping, the same
//! shift-and-reclaim logic when the followed entity moves, and the same shader
//! contract; they differ only in baseline, brush and out-of-bounds policy.

#![forbid(unsafe_code)]

pub mod brush;
pub mod field;
pub mod mapping;
pub mod params;
pub mod shader;

pub use brush::Brush;
pub use field::SurfaceField;
pub use mapping::UvTransform;
pub use params::{OutOfBoundsPolicy, SurfaceKind, SurfaceParams};
pub use shader::{ShaderStage, SurfaceBinding, SurfaceMaterial, SurfaceUniforms};

/// Rejected field configuration.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface size must be positive and finite (got {0})")]
    NonPositiveSize(f32),
    #[error("surface resolution must be positive")]
    NonPositiveResolution,
    #[error("texel size {0} is not a normal float")]
    DegenerateTexel(f32),
    #[error("brush radius must be positive (got {0})")]
    NonPositiveBrushRadius(f32),
}
