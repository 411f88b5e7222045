//! snow_fx: fixed-capacity snow spray particles.
//!
//! Particles live column-wise in a ring buffer. Emission always writes the
//! slot under the ring cursor, live or not, so memory never grows and a
//! saturated pool simply loses its oldest particles early.

#![forbid(unsafe_code)]

pub mod field;
pub mod gpu;
pub mod params;

pub use field::ParticleField;
pub use gpu::{PARTICLE_WGSL, ParticleInstance};
pub use params::ParticleParams;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ParticleError {
    #[error("particle capacity must be at least 1")]
    ZeroCapacity,
    #[error("particle life must be positive (got {0})")]
    NonPositiveLife(f32),
}
