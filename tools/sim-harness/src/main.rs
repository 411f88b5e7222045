//! Headless slope run: one skier on an analytic incline, logged summary.
//!
//! usage: sim-harness [seconds] [pitch_degrees]

use anyhow::{Context, Result};
use data_runtime::configs::{skier, snow_particles, surfaces, telemetry};
use glam::Vec3;
use powder_run::SlopeSession;
use powder_run::skier::{
    BOARD_NODE, Entity, InputSnapshot, MeshNode, RigidBody, SkierParams, SlopePlane,
};
use std::env;

const DT: f32 = 1.0 / 60.0;
const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let seconds: f32 = match args.get(1) {
        Some(s) => s.parse().context("seconds")?,
        None => 10.0,
    };
    let pitch: f32 = match args.get(2) {
        Some(s) => s.parse().context("pitch degrees")?,
        None => 15.0,
    };

    let log_cfg = telemetry::load_default()?;
    let _guard = powder_run::telemetry::init_telemetry(&log_cfg)?;
    let params = SkierParams::from_cfg(&skier::load_default()?);
    let mut session =
        SlopeSession::from_configs(&surfaces::load_default()?, &snow_particles::load_default()?)?;

    let slope = SlopePlane::inclined(pitch.to_radians());
    let mesh = MeshNode::new("rider").with_child(
        MeshNode::new(BOARD_NODE).with_extents(Vec3::new(0.75, 0.02, 0.15)),
    );
    let body = RigidBody::new(70.0, slope.normal() * params.foot_offset);
    session.spawn_skier(Entity::new("rider", mesh, body), params)?;

    let steps = (seconds / DT).round() as u32;
    for step in 0..steps {
        // Gentle slalom so both carve edges get exercised.
        let phase = step as f32 * DT * 0.8;
        let input = InputSnapshot::steering(phase.sin() * 0.6);
        if let Some(body) = session
            .skier_mut(0)
            .and_then(|s| s.entity.body.as_mut())
        {
            slope.step(body, params.foot_offset, GRAVITY, DT);
        }
        session.tick(&slope, input, DT)?;
        if log_cfg.progress_every > 0
            && step % log_cfg.progress_every == 0
            && let Some(s) = session.skiers().first()
            && let Some(b) = s.entity.body.as_ref()
        {
            tracing::debug!(
                t = step as f32 * DT,
                x = b.position.x,
                z = b.position.z,
                speed = b.velocity.length(),
                grounded = s.controller.is_grounded(),
                "tick"
            );
        }
    }

    let skier = session.skiers().first().context("no skier")?;
    let body = skier.entity.body.as_ref().context("skier lost its body")?;
    let painted = session.trail.texels().iter().filter(|&&t| t > 0.05).count();
    tracing::info!(
        seconds,
        pitch,
        distance = body.position.length(),
        speed = body.velocity.length(),
        painted_texels = painted,
        live_particles = session.particles.alive_count(),
        fallen = skier.controller.is_fallen(),
        "slope run complete"
    );
    Ok(())
}
