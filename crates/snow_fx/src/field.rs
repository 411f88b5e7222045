//! Ring-buffer emitter and integrator.

use crate::{ParticleError, ParticleParams};
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Snow spray pool. Slot `i` of every column belongs to the same particle.
#[derive(Debug, Clone)]
pub struct ParticleField {
    params: ParticleParams,
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    /// Remaining life in seconds; `<= 0` marks a dead slot.
    lifetimes: Vec<f32>,
    sizes: Vec<f32>,
    colors: Vec<Vec3>,
    alphas: Vec<f32>,
    next_index: usize,
    rng: SmallRng,
    dirty: bool,
}

impl ParticleField {
    pub fn new(params: ParticleParams) -> Result<Self, ParticleError> {
        params.validate()?;
        let n = params.max_particles;
        log::debug!("snow particle pool: {n} slots");
        Ok(Self {
            positions: vec![Vec3::ZERO; n],
            velocities: vec![Vec3::ZERO; n],
            lifetimes: vec![0.0; n],
            sizes: vec![0.0; n],
            colors: vec![Vec3::ZERO; n],
            alphas: vec![0.0; n],
            next_index: 0,
            rng: SmallRng::seed_from_u64(params.seed),
            dirty: false,
            params,
        })
    }

    #[must_use]
    pub fn params(&self) -> &ParticleParams {
        &self.params
    }
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.params.max_particles
    }
    /// Slot the next emission writes.
    #[must_use]
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Emit `count` particles at `position` into consecutive slots.
    ///
    /// Velocity is `normalize(direction) * speed` plus jitter that is uniform in
    /// `[-spread/2, spread/2]` on X/Z and `[0, spread*0.6]` on Y. A degenerate
    /// direction falls back to straight up.
    pub fn emit(&mut self, position: Vec3, direction: Vec3, speed: f32, spread: f32, count: usize) {
        if count == 0 {
            return;
        }
        let dir = direction.try_normalize().unwrap_or(Vec3::Y);
        let spread = if spread.is_finite() { spread.max(0.0) } else { 0.0 };
        let speed = if speed.is_finite() { speed } else { 0.0 };
        for _ in 0..count {
            let idx = self.next_index;
            self.next_index = (self.next_index + 1) % self.params.max_particles;
            let jitter = Vec3::new(
                (self.rng.random::<f32>() - 0.5) * spread,
                self.rng.random::<f32>() * spread * 0.6,
                (self.rng.random::<f32>() - 0.5) * spread,
            );
            self.positions[idx] = position;
            self.velocities[idx] = dir * speed + jitter;
            self.lifetimes[idx] = self.params.life;
            self.sizes[idx] = self.params.size;
            self.colors[idx] = self.params.base_color;
            self.alphas[idx] = self.params.base_alpha;
        }
        self.dirty = true;
    }

    /// Age every live particle by `dt`, interpolate its look, and integrate it.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let p = self.params;
        let mut touched = false;
        for i in 0..p.max_particles {
            if self.lifetimes[i] <= 0.0 {
                if self.alphas[i] != 0.0 {
                    self.alphas[i] = 0.0;
                    touched = true;
                }
                continue;
            }
            touched = true;
            self.lifetimes[i] -= dt;
            if self.lifetimes[i] <= 0.0 {
                self.alphas[i] = 0.0;
                continue;
            }
            let t = 1.0 - self.lifetimes[i] / p.life;
            self.sizes[i] = p.size * (1.0 + t * p.grow_factor);
            self.alphas[i] = p.base_alpha + (p.end_alpha - p.base_alpha) * t;
            self.colors[i] = p.base_color.lerp(p.end_color, t);
            self.velocities[i].y += p.gravity * dt;
            self.positions[i] += self.velocities[i] * dt;
        }
        self.dirty |= touched;
    }

    #[must_use]
    pub fn is_alive(&self, slot: usize) -> bool {
        self.lifetimes[slot] > 0.0
    }
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.lifetimes.iter().filter(|&&l| l > 0.0).count()
    }
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }
    #[must_use]
    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }
    #[must_use]
    pub fn lifetimes(&self) -> &[f32] {
        &self.lifetimes
    }
    #[must_use]
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }
    #[must_use]
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }
    #[must_use]
    pub fn alphas(&self) -> &[f32] {
        &self.alphas
    }

    /// Returns whether any column changed since the last call and resets the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn pool(n: usize) -> ParticleField {
        ParticleField::new(ParticleParams {
            max_particles: n,
            life: 1.0,
            gravity: -10.0,
            ..ParticleParams::default()
        })
        .expect("pool")
    }

    #[test]
    fn emit_sets_base_attributes() {
        let mut f = pool(4);
        f.emit(Vec3::new(1.0, 2.0, 3.0), Vec3::X * 5.0, 2.0, 0.0, 1);
        assert_eq!(f.positions()[0], Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(f.velocities()[0], Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(f.lifetimes()[0], 1.0);
        assert_eq!(f.alphas()[0], f.params().base_alpha);
        assert_eq!(f.next_index(), 1);
    }

    #[test]
    fn jitter_stays_in_upward_cone() {
        let mut f = pool(256);
        f.emit(Vec3::ZERO, Vec3::Y, 0.0, 1.0, 256);
        for v in f.velocities() {
            assert!(v.x.abs() <= 0.5 && v.z.abs() <= 0.5, "{v:?}");
            assert!((0.0..=0.6).contains(&v.y), "{v:?}");
        }
    }

    #[test]
    fn zero_direction_falls_back_to_up() {
        let mut f = pool(2);
        f.emit(Vec3::ZERO, Vec3::ZERO, 3.0, 0.0, 1);
        assert_eq!(f.velocities()[0], Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn midlife_interpolates_size_alpha_and_colour() {
        let mut f = pool(1);
        f.emit(Vec3::ZERO, Vec3::Y, 0.0, 0.0, 1);
        f.update(0.5);
        let p = *f.params();
        assert_abs_diff_eq!(f.sizes()[0], p.size * (1.0 + 0.5 * p.grow_factor), epsilon = 1e-5);
        assert_abs_diff_eq!(f.alphas()[0], (p.base_alpha + p.end_alpha) * 0.5, epsilon = 1e-5);
        let mid = p.base_color.lerp(p.end_color, 0.5);
        assert_abs_diff_eq!(f.colors()[0].x, mid.x, epsilon = 1e-5);
    }

    #[test]
    fn idle_pool_stays_clean() {
        let mut f = pool(4);
        f.update(0.1);
        assert!(!f.take_dirty(), "nothing alive, nothing to upload");
        f.emit(Vec3::ZERO, Vec3::Y, 1.0, 0.0, 1);
        assert!(f.take_dirty());
        f.update(0.5);
        assert!(f.take_dirty());
        f.update(0.6);
        assert!(f.take_dirty(), "expiry clears alpha");
        f.update(0.1);
        assert!(!f.take_dirty());
    }

    #[test]
    fn gravity_bends_the_path() {
        let mut f = pool(1);
        f.emit(Vec3::ZERO, Vec3::X, 1.0, 0.0, 1);
        f.update(0.1);
        assert_abs_diff_eq!(f.velocities()[0].y, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(f.positions()[0].y, -0.1, epsilon = 1e-5);
        assert_abs_diff_eq!(f.positions()[0].x, 0.1, epsilon = 1e-5);
    }
}
