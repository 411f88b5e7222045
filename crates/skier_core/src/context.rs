//! Collaborators a controller touches during one tick.

use snow_fx::ParticleField;
use surface_field::SurfaceField;

use crate::entity::EntitySink;
use crate::input::InputSnapshot;
use crate::physics::PhysicsQuery;
use crate::telemetry::TelemetrySink;

/// Optional hooks for deforming a terrain mesh alongside the field stamps.
pub trait TerrainStamper {
    fn stamp(&mut self, x: f32, z: f32, strength: f32);
    fn stamp_segment(&mut self, x0: f32, z0: f32, x1: f32, z1: f32, strength: f32);
}

/// Borrowed world for one tick. Everything but physics and input is
/// optional; a missing collaborator skips its side effects.
pub struct TickContext<'a> {
    pub physics: &'a dyn PhysicsQuery,
    pub input: InputSnapshot,
    pub trail: Option<&'a mut SurfaceField>,
    pub deformation: Option<&'a mut SurfaceField>,
    pub particles: Option<&'a mut ParticleField>,
    pub terrain: Option<&'a mut dyn TerrainStamper>,
    pub telemetry: Option<&'a mut dyn TelemetrySink>,
    pub entities: Option<&'a mut dyn EntitySink>,
}

impl<'a> TickContext<'a> {
    #[must_use]
    pub fn new(physics: &'a dyn PhysicsQuery, input: InputSnapshot) -> Self {
        Self {
            physics,
            input,
            trail: None,
            deformation: None,
            particles: None,
            terrain: None,
            telemetry: None,
            entities: None,
        }
    }

    #[must_use]
    pub fn with_fields(mut self, trail: &'a mut SurfaceField, deformation: &'a mut SurfaceField) -> Self {
        self.trail = Some(trail);
        self.deformation = Some(deformation);
        self
    }

    #[must_use]
    pub fn with_particles(mut self, particles: &'a mut ParticleField) -> Self {
        self.particles = Some(particles);
        self
    }

    #[must_use]
    pub fn with_terrain(mut self, terrain: &'a mut dyn TerrainStamper) -> Self {
        self.terrain = Some(terrain);
        self
    }

    #[must_use]
    pub fn with_telemetry(mut self, sink: &'a mut dyn TelemetrySink) -> Self {
        self.telemetry = Some(sink);
        self
    }

    #[must_use]
    pub fn with_entities(mut self, sink: &'a mut dyn EntitySink) -> Self {
        self.entities = Some(sink);
        self
    }
}
