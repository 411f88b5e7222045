//! Pool tuning.

use crate::ParticleError;
use data_runtime::configs::snow_particles::SnowParticlesCfg;
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleParams {
    pub max_particles: usize,
    /// Base point size.
    pub size: f32,
    /// Seconds a particle lives.
    pub life: f32,
    /// Vertical acceleration (negative is down).
    pub gravity: f32,
    /// Size at end of life is `size * (1 + grow_factor)`.
    pub grow_factor: f32,
    pub base_color: Vec3,
    pub end_color: Vec3,
    pub base_alpha: f32,
    pub end_alpha: f32,
    pub seed: u64,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self::from_cfg(&SnowParticlesCfg::default())
    }
}

impl ParticleParams {
    #[must_use]
    pub fn from_cfg(cfg: &SnowParticlesCfg) -> Self {
        Self {
            max_particles: cfg.max_particles as usize,
            size: cfg.size,
            life: cfg.life,
            gravity: cfg.gravity,
            grow_factor: cfg.grow_factor,
            base_color: rgb_from_hex(cfg.base_color),
            end_color: rgb_from_hex(cfg.end_color),
            base_alpha: cfg.base_alpha,
            end_alpha: cfg.end_alpha,
            seed: cfg.seed,
        }
    }

    pub fn validate(&self) -> Result<(), ParticleError> {
        if self.max_particles == 0 {
            return Err(ParticleError::ZeroCapacity);
        }
        if self.life.is_nan() || self.life <= 0.0 {
            return Err(ParticleError::NonPositiveLife(self.life));
        }
        Ok(())
    }
}

/// Unpack `0xRRGGBB` into linear-agnostic 0..1 channels.
#[must_use]
pub fn rgb_from_hex(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(r, g, b)
}
