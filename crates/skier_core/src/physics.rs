//! Physics-world boundary: raycasts, collision groups and contact events.

use glam::Vec3;

use crate::body::RigidBody;

/// Terrain/ground colliders.
pub const GROUP_TERRAIN: u32 = 1;
/// Skier bodies.
pub const GROUP_SKIER: u32 = 2;
/// Trees, rocks, detached boards.
pub const GROUP_OBSTACLE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionFilter {
    pub group: u32,
    pub mask: u32,
}

impl CollisionFilter {
    /// Ground probes hit terrain only, so obstacle edges never count as ground.
    pub const GROUND_PROBE: Self = Self {
        group: GROUP_SKIER,
        mask: GROUP_TERRAIN,
    };

    #[must_use]
    pub fn accepts(&self, collider_group: u32) -> bool {
        self.mask & collider_group != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub normal: Vec3,
}

pub trait PhysicsQuery {
    /// Closest hit along the segment `from -> to` among colliders the filter
    /// accepts.
    fn raycast_closest(&self, from: Vec3, to: Vec3, filter: CollisionFilter) -> Option<RayHit>;
}

/// Empty world: every raycast misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGround;

impl PhysicsQuery for NoGround {
    fn raycast_closest(&self, _from: Vec3, _to: Vec3, _filter: CollisionFilter) -> Option<RayHit> {
        None
    }
}

/// Infinite terrain plane `dot(normal, p) == offset`, one-sided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopePlane {
    normal: Vec3,
    offset: f32,
}

impl SlopePlane {
    #[must_use]
    pub fn flat(height: f32) -> Self {
        Self {
            normal: Vec3::Y,
            offset: height,
        }
    }

    /// Plane through the origin falling away toward -Z at `pitch` radians.
    #[must_use]
    pub fn inclined(pitch: f32) -> Self {
        Self {
            normal: Vec3::new(0.0, pitch.cos(), -pitch.sin()),
            offset: 0.0,
        }
    }

    #[must_use]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Plane height below/above world point (x, z).
    #[must_use]
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        if self.normal.y.abs() < 1e-6 {
            return 0.0;
        }
        (self.offset - self.normal.x * x - self.normal.z * z) / self.normal.y
    }

    /// Integrates `body` under gravity and resolves contact for a sphere of
    /// radius `foot_offset` around the body centre: the centre is kept at
    /// least `foot_offset` above the plane and inward velocity is removed.
    pub fn step(&self, body: &mut RigidBody, foot_offset: f32, gravity: Vec3, dt: f32) {
        body.integrate(dt, gravity);
        let dist = self.normal.dot(body.position) - self.offset;
        if dist < foot_offset {
            body.position += self.normal * (foot_offset - dist);
            let vn = body.velocity.dot(self.normal);
            if vn < 0.0 {
                body.velocity -= self.normal * vn;
            }
        }
    }
}

impl PhysicsQuery for SlopePlane {
    fn raycast_closest(&self, from: Vec3, to: Vec3, filter: CollisionFilter) -> Option<RayHit> {
        if !filter.accepts(GROUP_TERRAIN) {
            return None;
        }
        let dir = to - from;
        let denom = self.normal.dot(dir);
        // Back faces and parallel rays miss.
        if denom > -1e-9 {
            return None;
        }
        let t = (self.offset - self.normal.dot(from)) / denom;
        (0.0..=1.0).contains(&t).then(|| RayHit {
            point: from + dir * t,
            normal: self.normal,
        })
    }
}

/// A collision reported by the physics world against a controlled body.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactEvent {
    /// Collision group of the other collider.
    pub other_group: u32,
    /// Relative speed along the contact normal; sign is engine-defined.
    pub impact_velocity: f32,
    /// World-space contact points on each body, when the engine reports them.
    pub point_a: Option<Vec3>,
    pub point_b: Option<Vec3>,
}

impl ContactEvent {
    #[must_use]
    pub fn obstacle(impact_velocity: f32) -> Self {
        Self {
            other_group: GROUP_OBSTACLE,
            impact_velocity,
            point_a: None,
            point_b: None,
        }
    }

    #[must_use]
    pub fn hits_terrain(&self) -> bool {
        self.other_group & GROUP_TERRAIN != 0
    }

    /// Midpoint of the two contact points, or `fallback` when either is
    /// missing or non-finite.
    #[must_use]
    pub fn point_or(&self, fallback: Vec3) -> Vec3 {
        match (self.point_a, self.point_b) {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => (a + b) * 0.5,
            _ => fallback,
        }
    }
}
