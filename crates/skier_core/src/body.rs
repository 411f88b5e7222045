//! Rigid body state as seen by the controller.
//!
//! The physics engine owns integration; the controller only reads position
//! and velocity after a step and queues forces, torques and impulses for the
//! next one. `integrate` is a small semi-implicit Euler step used by the
//! headless harness and the tests in place of a real engine.

use glam::{Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
}

#[derive(Debug, Clone)]
pub struct RigidBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
    /// Per-axis rotation lock; zero on an axis freezes rotation about it.
    pub angular_factor: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub shape: BodyShape,
    orientation: Quat,
    force: Vec3,
    torque: Vec3,
}

impl RigidBody {
    #[must_use]
    pub fn new(mass: f32, position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass,
            angular_factor: Vec3::ONE,
            linear_damping: 0.01,
            angular_damping: 0.01,
            shape: BodyShape::Sphere { radius: 0.5 },
            orientation: Quat::IDENTITY,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn with_shape(mut self, shape: BodyShape) -> Self {
        self.shape = shape;
        self
    }

    #[must_use]
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Stores `q` normalized. Degenerate or non-finite rotations are ignored.
    pub fn set_orientation(&mut self, q: Quat) {
        if q.is_finite() && q.length_squared() > 1e-12 {
            self.orientation = q.normalize();
        }
    }

    pub fn apply_force(&mut self, force: Vec3) {
        if force.is_finite() {
            self.force += force;
        }
    }

    pub fn apply_torque(&mut self, torque: Vec3) {
        if torque.is_finite() {
            self.torque += torque;
        }
    }

    /// Instant velocity change of `impulse / mass`. No-op for static bodies.
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        if self.mass > 0.0 && impulse.is_finite() {
            self.velocity += impulse / self.mass;
        }
    }

    #[must_use]
    pub fn force(&self) -> Vec3 {
        self.force
    }

    #[must_use]
    pub fn torque(&self) -> Vec3 {
        self.torque
    }

    pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    /// Semi-implicit Euler step with gravity and damping, then clears the
    /// accumulators. Rotational inertia is approximated as `mass` on every
    /// axis.
    pub fn integrate(&mut self, dt: f32, gravity: Vec3) {
        if self.mass <= 0.0 || dt <= 0.0 {
            self.clear_forces();
            return;
        }
        let inv_mass = 1.0 / self.mass;
        self.velocity += (self.force * inv_mass + gravity) * dt;
        self.velocity *= (1.0 - self.linear_damping.clamp(0.0, 1.0)).powf(dt);
        self.angular_velocity += self.torque * inv_mass * dt;
        self.angular_velocity *= self.angular_factor;
        self.angular_velocity *= (1.0 - self.angular_damping.clamp(0.0, 1.0)).powf(dt);

        self.position += self.velocity * dt;
        let spin = Quat::from_scaled_axis(self.angular_velocity * dt);
        self.set_orientation(spin * self.orientation);
        self.clear_forces();
    }
}
