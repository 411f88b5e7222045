//! Slope session: the shared trail/deformation fields and particle pool, the
//! skiers that write into them, and the per-frame call order.

use anyhow::{Context, Result};
use data_runtime::configs::{snow_particles, surfaces};
use skier_core::{
    ContactEvent, Entity, InputSnapshot, PhysicsQuery, SkierController, SkierError, SkierParams,
    TelemetrySink, TerrainStamper, TickContext,
};
use snow_fx::{ParticleField, ParticleParams};
use surface_field::{SurfaceField, SurfaceParams};

pub struct Skier {
    pub entity: Entity,
    pub controller: SkierController,
}

pub struct SlopeSession {
    pub trail: SurfaceField,
    pub deformation: SurfaceField,
    pub particles: ParticleField,
    skiers: Vec<Skier>,
    spawned: Vec<Entity>,
    terrain: Option<Box<dyn TerrainStamper>>,
    telemetry: Option<Box<dyn TelemetrySink>>,
}

impl SlopeSession {
    pub fn new(
        trail: SurfaceParams,
        deformation: SurfaceParams,
        particles: ParticleParams,
    ) -> Result<Self> {
        Ok(Self {
            trail: SurfaceField::new(trail).context("trail field")?,
            deformation: SurfaceField::new(deformation).context("deformation field")?,
            particles: ParticleField::new(particles).context("particle field")?,
            skiers: Vec::new(),
            spawned: Vec::new(),
            terrain: None,
            telemetry: None,
        })
    }

    pub fn from_configs(
        surfaces: &surfaces::SurfacesCfg,
        particles: &snow_particles::SnowParticlesCfg,
    ) -> Result<Self> {
        Self::new(
            SurfaceParams::trail_from_cfg(&surfaces.trail),
            SurfaceParams::deformation_from_cfg(&surfaces.deformation),
            ParticleParams::from_cfg(particles),
        )
    }

    /// Session built from `data/config/{surfaces,snow_particles}.toml`.
    pub fn load_default() -> Result<Self> {
        let surfaces = surfaces::load_default().context("load surfaces config")?;
        let particles = snow_particles::load_default().context("load snow particle config")?;
        Self::from_configs(&surfaces, &particles)
    }

    pub fn set_terrain(&mut self, terrain: Box<dyn TerrainStamper>) {
        self.terrain = Some(terrain);
    }

    /// Telemetry is published for the first skier only.
    pub fn set_telemetry(&mut self, sink: Box<dyn TelemetrySink>) {
        self.telemetry = Some(sink);
    }

    /// Attaches a controller and returns the skier's index.
    pub fn spawn_skier(&mut self, mut entity: Entity, params: SkierParams) -> Result<usize, SkierError> {
        let controller = SkierController::attach(&mut entity, params)?;
        if self.skiers.is_empty()
            && let Some(body) = entity.body.as_ref()
        {
            // Anchor the fields before the first stamp lands.
            self.trail.update_origin(body.position.x, body.position.z);
            self.deformation.update_origin(body.position.x, body.position.z);
        }
        log::debug!("skier '{}' joined the slope", entity.name);
        self.skiers.push(Skier { entity, controller });
        Ok(self.skiers.len() - 1)
    }

    #[must_use]
    pub fn skiers(&self) -> &[Skier] {
        &self.skiers
    }

    pub fn skier_mut(&mut self, index: usize) -> Option<&mut Skier> {
        self.skiers.get_mut(index)
    }

    /// Entities spawned by controllers, e.g. detached boards.
    #[must_use]
    pub fn spawned(&self) -> &[Entity] {
        &self.spawned
    }

    pub fn spawned_mut(&mut self) -> &mut Vec<Entity> {
        &mut self.spawned
    }

    /// One frame after the physics step: controllers, then both fields
    /// recentre on the first skier, then particles age.
    pub fn tick(
        &mut self,
        physics: &dyn PhysicsQuery,
        input: InputSnapshot,
        dt: f32,
    ) -> Result<(), SkierError> {
        for (i, skier) in self.skiers.iter_mut().enumerate() {
            let mut ctx = TickContext::new(physics, input)
                .with_fields(&mut self.trail, &mut self.deformation)
                .with_particles(&mut self.particles)
                .with_entities(&mut self.spawned);
            if let Some(terrain) = self.terrain.as_deref_mut() {
                ctx = ctx.with_terrain(terrain);
            }
            if i == 0
                && let Some(sink) = self.telemetry.as_deref_mut()
            {
                ctx = ctx.with_telemetry(sink);
            }
            skier.controller.update_entity(&mut skier.entity, &mut ctx, dt)?;
        }

        if let Some(body) = self.skiers.first().and_then(|s| s.entity.body.as_ref()) {
            let (x, z) = (body.position.x, body.position.z);
            self.trail.update_origin(x, z);
            self.deformation.update_origin(x, z);
        }
        self.particles.update(dt);
        Ok(())
    }

    /// Routes a physics contact to a skier's controller. Returns whether the
    /// skier fell.
    pub fn collide(&mut self, index: usize, contact: &ContactEvent) -> Result<bool, SkierError> {
        let Some(skier) = self.skiers.get_mut(index) else {
            return Ok(false);
        };
        let rig = skier.entity.rig_mut()?;
        let mut ctx = TickContext::new(&skier_core::NoGround, InputSnapshot::default())
            .with_particles(&mut self.particles)
            .with_entities(&mut self.spawned);
        Ok(skier.controller.on_collide(rig, contact, &mut ctx))
    }
}
