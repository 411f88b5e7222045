//! Per-tick skier state machine.
//!
//! Runs after the physics step: reads body position/velocity, senses ground,
//! steers, queues forces and impulses for the next step, stamps the shared
//! surface fields, sprays snow and smooths the rendered orientation. A hard
//! hit against an obstacle moves the skier into `Fallen`, after which only the
//! mesh follows the body.

use glam::{EulerRot, Mat3, Quat, Vec3};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::body::{BodyShape, RigidBody};
use crate::context::TickContext;
use crate::entity::{BOARD_NODE, Entity, Rig};
use crate::ground;
use crate::params::{LocomotionModel, SkierParams};
use crate::physics::ContactEvent;
use crate::telemetry::{DebugArrow, DebugVector, SkierTelemetry};
use crate::SkierError;

const DEGENERATE_SQ: f32 = 1e-6;

const STAMP_FORWARD: f32 = 0.55;
const STAMP_SIDE: f32 = 0.3;
const TERRAIN_STAMP_STRENGTH: f32 = 1.0;

const SPRAY_FORWARD: f32 = 0.85;
const SPRAY_SIDE: f32 = 0.28;

const LANDING_PUFF_IMPACT: f32 = 1.5;
const LANDING_PUFF_SIDE: f32 = 0.35;
const LANDING_BOOST_DECAY: f32 = 6.0;

const BOARD_MASS: f32 = 1.2;
const BOARD_MIN_HALF_EXTENTS: Vec3 = Vec3::new(0.2, 0.05, 0.1);

const ARROW_CAP: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkierPhase {
    Riding,
    /// Terminal: locomotion is bypassed for good.
    Fallen,
}

#[derive(Debug, Clone)]
pub struct SkierState {
    pub phase: SkierPhase,
    pub grounded: bool,
    pub yaw: f32,
    pub smoothed_normal: Option<Vec3>,
    pub forward_on_plane: Option<Vec3>,
    pub visual_orientation: Option<Quat>,
    pub prev_velocity: Vec3,
    pub prev_yaw: Option<f32>,
    pub jump_held: f32,
    pub jump_was_pressed: bool,
    pub stamp_tick: u32,
    /// Left/right contact points of the previous stamp while contact holds.
    pub last_stamp: Option<(Vec3, Vec3)>,
    pub spray_timer: f32,
    pub landing_boost: f32,
    pub board_detached: bool,
}

impl Default for SkierState {
    fn default() -> Self {
        Self {
            phase: SkierPhase::Riding,
            grounded: false,
            yaw: 0.0,
            smoothed_normal: None,
            forward_on_plane: None,
            visual_orientation: None,
            prev_velocity: Vec3::ZERO,
            prev_yaw: None,
            jump_held: 0.0,
            jump_was_pressed: false,
            stamp_tick: 0,
            last_stamp: None,
            spray_timer: 0.0,
            landing_boost: 0.0,
            board_detached: false,
        }
    }
}

pub struct SkierController {
    params: SkierParams,
    state: SkierState,
    rng: SmallRng,
}

impl SkierController {
    #[must_use]
    pub fn new(params: SkierParams) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(params.seed),
            params,
            state: SkierState::default(),
        }
    }

    /// Builds a controller for `entity`, locking body rotation for the
    /// kinematic model. Fails when the entity lacks a mesh or body.
    pub fn attach(entity: &mut Entity, params: SkierParams) -> Result<Self, SkierError> {
        let rig = entity.rig_mut()?;
        let mut ctrl = Self::new(params);
        rig.body.angular_factor = match params.locomotion {
            LocomotionModel::KinematicYaw => Vec3::ZERO,
            LocomotionModel::TorqueUpright { .. } => Vec3::ONE,
        };
        ctrl.state.yaw = yaw_of(rig.body.orientation());
        ctrl.state.visual_orientation = Some(rig.mesh.orientation);
        Ok(ctrl)
    }

    #[must_use]
    pub fn params(&self) -> &SkierParams {
        &self.params
    }

    #[must_use]
    pub fn state(&self) -> &SkierState {
        &self.state
    }

    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.state.grounded
    }

    #[must_use]
    pub fn is_fallen(&self) -> bool {
        self.state.phase == SkierPhase::Fallen
    }

    pub fn update_entity(
        &mut self,
        entity: &mut Entity,
        ctx: &mut TickContext<'_>,
        dt: f32,
    ) -> Result<(), SkierError> {
        let rig = entity.rig_mut()?;
        self.update(rig, ctx, dt);
        Ok(())
    }

    /// One tick. Never fails; degenerate geometry skips the dependent step.
    pub fn update(&mut self, rig: Rig<'_>, ctx: &mut TickContext<'_>, dt: f32) {
        let Rig { mesh, body } = rig;
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if self.is_fallen() {
            mesh.position = body.position;
            mesh.orientation = body.orientation();
            return;
        }
        if !body.position.is_finite() || !body.velocity.is_finite() {
            log::warn!("skier body state is non-finite; tick skipped");
            return;
        }
        let p = self.params;
        let input = ctx.input.resolve();
        let was_grounded = self.state.grounded;

        let sample = ground::probe(ctx.physics, body.position, &p);
        let grounded = sample.is_some();
        let align = match &sample {
            Some(s) => self.smooth_normal(s.normal, dt),
            None => Vec3::Y,
        };
        if let Some(s) = &sample {
            self.correct_penetration(body, align, &s.hit_points);
        }

        let velocity = body.velocity;
        let v_plane = velocity - align * velocity.dot(align);
        let surface_speed = v_plane.length();

        let mut net_torque = Vec3::ZERO;
        let yaw = self.steer(body, align, input.steer, grounded, surface_speed, dt, &mut net_torque);
        let heading = Quat::from_rotation_y(yaw);
        let forward = heading * Vec3::NEG_Z;
        let fop = self.forward_on_plane(forward, align, dt);
        let lateral = fop.map_or(Vec3::ZERO, |f| v_plane - f * v_plane.dot(f));

        let landing_impact = if grounded && !was_grounded {
            (-self.state.prev_velocity.dot(align)).max(0.0)
        } else {
            0.0
        };

        let mut net_force = Vec3::ZERO;
        let mut drive_arrow = None;
        if grounded {
            if let Some(fop) = fop {
                let boost = if input.boost { p.boost_multiplier } else { 1.0 };
                let drive = fop * p.forward_force * boost * body.mass;
                body.apply_force(drive);
                net_force += drive;
                drive_arrow = Some(DebugArrow {
                    origin: body.position,
                    direction: fop * (drive.length() * 0.05).min(ARROW_CAP),
                });
                if surface_speed > p.stamp_speed_threshold {
                    let right = fop.cross(align).normalize_or_zero();
                    self.stamp(body.position, fop, right, ctx);
                    self.spray(body.position, align, fop, right, v_plane, surface_speed, dt, ctx);
                }
            }
            if landing_impact > LANDING_PUFF_IMPACT {
                let fwd = fop.unwrap_or(forward);
                let right = fwd.cross(align).normalize_or_zero();
                self.landing_puff(body.position, align, fwd, right, landing_impact, ctx);
            }

            let mut drag = v_plane * (-p.linear_drag * body.mass);
            drag += lateral * (-p.lateral_drag * body.mass);
            if input.steer.abs() > 0.5 {
                drag += v_plane * (-p.turn_drag * body.mass * input.steer.abs());
            }
            body.apply_force(drag);
            net_force += drag;
        }

        if input.jump {
            self.state.jump_held = (self.state.jump_held + dt).min(p.jump_charge_time);
        } else if self.state.jump_was_pressed {
            if grounded {
                let target = p.jump_target_speed(self.state.jump_held);
                let deficit = (target - body.velocity.dot(align)).max(0.0);
                if deficit > 0.0 {
                    let impulse = align * deficit * body.mass;
                    body.apply_impulse(impulse);
                    if dt > 1e-6 {
                        net_force += impulse / dt;
                    }
                }
            }
            self.state.jump_held = 0.0;
        }
        self.state.jump_was_pressed = input.jump;

        let yaw_rate = match self.state.prev_yaw {
            Some(prev) if dt > 1e-6 => wrap_angle(yaw - prev) / dt,
            _ => 0.0,
        };
        if let Some(sink) = ctx.telemetry.as_deref_mut() {
            let side = heading * Vec3::X * 0.6;
            sink.publish(&SkierTelemetry {
                grounded,
                ground_normal: DebugArrow {
                    origin: body.position,
                    direction: align,
                },
                forward_velocity: DebugArrow {
                    origin: body.position,
                    direction: forward * (velocity.length() * 0.25).clamp(0.0, ARROW_CAP),
                },
                yaw_rate,
                drive_force: drive_arrow,
                net_force: debug_vector(body.position + side + Vec3::Y * 0.2, net_force, 0.05),
                net_torque: debug_vector(body.position + side - Vec3::Y * 0.2, net_torque, 0.1),
            });
        }

        self.state.yaw = yaw;
        self.state.prev_yaw = Some(yaw);
        self.state.grounded = grounded;
        self.state.prev_velocity = body.velocity;
        if !grounded {
            self.state.last_stamp = None;
        }

        self.state.landing_boost = (self.state.landing_boost * (-LANDING_BOOST_DECAY * dt).exp())
            .max((landing_impact - p.visual_impact_threshold).max(0.0) * p.visual_impact_boost);
        let target = fop.and_then(|f| visual_basis(f, align)).unwrap_or(heading);
        let rate = if grounded {
            p.visual_tilt_rate_grounded
        } else {
            p.visual_tilt_rate_air
        } + self.state.landing_boost;
        let current = self.state.visual_orientation.unwrap_or(mesh.orientation);
        let visual = current.slerp(target, blend(rate, dt)).normalize();
        self.state.visual_orientation = Some(visual);
        mesh.position = body.position;
        mesh.orientation = visual;
    }

    /// Handles a contact reported by physics. Obstacle hits spray snow at the
    /// contact point; a hit at or above the fall speed triggers the fall.
    /// Returns whether this contact caused the fall.
    pub fn on_collide(
        &mut self,
        rig: Rig<'_>,
        contact: &ContactEvent,
        ctx: &mut TickContext<'_>,
    ) -> bool {
        if self.is_fallen() || contact.hits_terrain() {
            return false;
        }
        let impact = contact.impact_velocity.abs();
        if !impact.is_finite() {
            return false;
        }
        if let Some(particles) = ctx.particles.as_deref_mut() {
            let at = contact.point_or(rig.body.position);
            let speed = (impact * 0.45).clamp(1.6, 4.5);
            for _ in 0..3 {
                let dir = random_unit(&mut self.rng);
                particles.emit(at, dir, speed, 1.8, 14);
            }
        }
        if impact >= self.params.fall_impact_speed {
            self.trigger_fall(rig, ctx);
            return true;
        }
        false
    }

    /// Switches to `Fallen`: frees body rotation, raises damping and detaches
    /// the board into its own entity carrying the body's motion.
    pub fn trigger_fall(&mut self, rig: Rig<'_>, ctx: &mut TickContext<'_>) {
        if self.is_fallen() {
            return;
        }
        let Rig { mesh, body } = rig;
        self.state.phase = SkierPhase::Fallen;
        self.state.last_stamp = None;
        body.angular_factor = Vec3::ONE;
        body.angular_damping = 0.1;
        body.linear_damping = 0.02;

        if let Some(mut board) = mesh.take_child(BOARD_NODE) {
            board.position = mesh.position;
            board.orientation = mesh.orientation;
            let half_extents = board.half_extents.max(BOARD_MIN_HALF_EXTENTS);
            let mut board_body = RigidBody::new(BOARD_MASS, mesh.position)
                .with_shape(BodyShape::Box { half_extents });
            board_body.set_orientation(mesh.orientation);
            board_body.velocity = body.velocity;
            board_body.angular_velocity = body.angular_velocity;
            board_body.linear_damping = 0.05;
            board_body.angular_damping = 0.2;
            match ctx.entities.as_deref_mut() {
                Some(sink) => {
                    sink.add_entity(Entity::new(BOARD_NODE, board, board_body));
                    self.state.board_detached = true;
                    log::debug!("board detached at {:?}", mesh.position);
                }
                None => log::warn!("no entity sink; detached board dropped"),
            }
        }
        log::info!("skier fell at {:?}", body.position);
    }

    fn smooth_normal(&mut self, normal: Vec3, dt: f32) -> Vec3 {
        if !self.params.smooth_normals {
            return normal;
        }
        let smoothed = match self.state.smoothed_normal {
            Some(prev) => prev
                .lerp(normal, blend(self.params.normal_smoothing_rate, dt))
                .try_normalize()
                .unwrap_or(normal),
            None => normal,
        };
        self.state.smoothed_normal = Some(smoothed);
        smoothed
    }

    fn correct_penetration(&self, body: &mut RigidBody, align: Vec3, hits: &[Vec3]) {
        let foot = body.position - align * self.params.foot_offset;
        let sunk = hits
            .iter()
            .map(|h| h.dot(align) - foot.dot(align))
            .fold(f32::NEG_INFINITY, f32::max);
        if sunk > self.params.penetration_epsilon {
            body.position += align * sunk.min(self.params.max_penetration_correction);
            let inward = body.velocity.dot(align);
            if inward < 0.0 {
                body.velocity -= align * inward;
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn steer(
        &mut self,
        body: &mut RigidBody,
        align: Vec3,
        steer: f32,
        grounded: bool,
        surface_speed: f32,
        dt: f32,
        net_torque: &mut Vec3,
    ) -> f32 {
        let p = self.params;
        let mut yaw = yaw_of(body.orientation());
        match p.locomotion {
            LocomotionModel::KinematicYaw => {
                if steer != 0.0 {
                    yaw += steer * p.steer_yaw_rate * dt;
                } else if grounded && surface_speed > p.auto_align_speed_threshold {
                    let downhill = Vec3::NEG_Y + align * align.y;
                    if downhill.length_squared() > DEGENERATE_SQ {
                        let d = downhill.normalize();
                        let target = (-d.x).atan2(-d.z);
                        let max_step = p.auto_downhill_yaw_rate * dt;
                        yaw += wrap_angle(target - yaw).clamp(-max_step, max_step);
                    }
                }
                yaw = wrap_angle(yaw);
                body.set_orientation(Quat::from_rotation_y(yaw));
                body.angular_velocity = Vec3::ZERO;
            }
            LocomotionModel::TorqueUpright {
                steer_torque,
                yaw_damping,
                upright_stiffness,
                upright_damping,
            } => {
                let spin = body.angular_velocity.dot(align);
                let turn = align * (steer * steer_torque - spin * yaw_damping) * body.mass;
                let up = body.orientation() * Vec3::Y;
                let tilt_rate = body.angular_velocity - align * spin;
                let upright =
                    (up.cross(align) * upright_stiffness - tilt_rate * upright_damping) * body.mass;
                body.apply_torque(turn + upright);
                *net_torque += turn + upright;
            }
        }
        yaw
    }

    fn forward_on_plane(&mut self, forward: Vec3, align: Vec3, dt: f32) -> Option<Vec3> {
        let raw = forward - align * forward.dot(align);
        if raw.length_squared() <= DEGENERATE_SQ {
            return None;
        }
        let mut raw = raw.normalize();
        let smoothed = match self.state.forward_on_plane {
            Some(prev) => {
                if raw.dot(prev) < 0.0 {
                    raw = -raw;
                }
                prev.lerp(raw, blend(self.params.forward_smoothing_rate, dt))
                    .try_normalize()
                    .unwrap_or(raw)
            }
            None => raw,
        };
        self.state.forward_on_plane = Some(smoothed);
        Some(smoothed)
    }

    fn stamp(&mut self, center: Vec3, fop: Vec3, right: Vec3, ctx: &mut TickContext<'_>) {
        self.state.stamp_tick = self.state.stamp_tick.wrapping_add(1);
        if self.state.stamp_tick % self.params.trail_stamp_interval.max(1) != 0 {
            return;
        }
        let ahead = center + fop * STAMP_FORWARD;
        let (left, right) = (ahead - right * STAMP_SIDE, ahead + right * STAMP_SIDE);
        match self.state.last_stamp {
            Some((prev_left, prev_right)) => {
                for field in [ctx.trail.as_deref_mut(), ctx.deformation.as_deref_mut()]
                    .into_iter()
                    .flatten()
                {
                    field.stamp_segment(prev_left.x, prev_left.z, left.x, left.z);
                    field.stamp_segment(prev_right.x, prev_right.z, right.x, right.z);
                }
                if let Some(terrain) = ctx.terrain.as_deref_mut() {
                    for (a, b) in [(prev_left, left), (prev_right, right)] {
                        terrain.stamp_segment(a.x, a.z, b.x, b.z, TERRAIN_STAMP_STRENGTH);
                    }
                }
            }
            None => {
                for field in [ctx.trail.as_deref_mut(), ctx.deformation.as_deref_mut()]
                    .into_iter()
                    .flatten()
                {
                    field.stamp(left.x, left.z);
                    field.stamp(right.x, right.z);
                }
                if let Some(terrain) = ctx.terrain.as_deref_mut() {
                    terrain.stamp(left.x, left.z, TERRAIN_STAMP_STRENGTH);
                    terrain.stamp(right.x, right.z, TERRAIN_STAMP_STRENGTH);
                }
            }
        }
        self.state.last_stamp = Some((left, right));
    }

    #[allow(clippy::too_many_arguments)]
    fn spray(
        &mut self,
        center: Vec3,
        align: Vec3,
        fop: Vec3,
        right: Vec3,
        v_plane: Vec3,
        surface_speed: f32,
        dt: f32,
        ctx: &mut TickContext<'_>,
    ) {
        let pacing = (surface_speed / 10.0).clamp(0.0, 1.0);
        let moving = v_plane.try_normalize().unwrap_or(fop);
        let side = 1.0 - moving.dot(fop).abs();
        let interval = (1.0 - pacing) * lerp(0.02, 0.01, side);
        self.state.spray_timer += dt;
        if self.state.spray_timer < interval {
            return;
        }
        self.state.spray_timer = (self.state.spray_timer - interval).min(interval);
        let Some(particles) = ctx.particles.as_deref_mut() else {
            return;
        };
        let count = lerp(3.0, 10.0, side).round() as usize;
        let spread = lerp(0.5, 0.9, side);
        let speed = pacing * (surface_speed + 0.2).clamp(0.5, 4.0);
        let dir = (fop * -0.2 + align * 0.7).normalize_or(align);
        let base = center - align * (self.params.foot_offset * 0.95) + fop * SPRAY_FORWARD;
        particles.emit(base - right * SPRAY_SIDE, dir, speed, spread, count);
        particles.emit(base + right * SPRAY_SIDE, dir, speed, spread, count);
    }

    fn landing_puff(
        &mut self,
        center: Vec3,
        align: Vec3,
        forward: Vec3,
        right: Vec3,
        impact: f32,
        ctx: &mut TickContext<'_>,
    ) {
        let Some(particles) = ctx.particles.as_deref_mut() else {
            return;
        };
        let base = center - align * (self.params.foot_offset * 0.7) + forward * 0.1;
        let dir = (align * 0.8 + Vec3::Y * 0.4).normalize_or(Vec3::Y);
        let speed = (1.0 + impact * 0.6).min(4.0);
        let count = (6.0 + impact * 3.0).min(20.0).round() as usize;
        particles.emit(base - right * LANDING_PUFF_SIDE, dir, speed, 1.2, count);
        particles.emit(base + right * LANDING_PUFF_SIDE, dir, speed, 1.2, count);
        log::debug!("landing impact {impact:.2}");
    }
}

/// Rendered orientation for a rider facing `forward` on a surface with
/// normal `up`. `None` when the two are parallel.
fn visual_basis(forward: Vec3, up: Vec3) -> Option<Quat> {
    let up = up.try_normalize()?;
    let right = up.cross(-forward).try_normalize()?;
    let back = right.cross(up);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, back)).normalize())
}

fn yaw_of(q: Quat) -> f32 {
    let (yaw, _, _) = q.to_euler(EulerRot::YXZ);
    yaw
}

fn wrap_angle(a: f32) -> f32 {
    a.sin().atan2(a.cos())
}

/// Exponential approach factor for `rate` over `dt`.
fn blend(rate: f32, dt: f32) -> f32 {
    (1.0 - (-rate.max(0.0) * dt).exp()).clamp(0.0, 1.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn debug_vector(origin: Vec3, v: Vec3, scale: f32) -> DebugVector {
    let magnitude = v.length();
    DebugVector {
        arrow: DebugArrow {
            origin,
            direction: v.normalize_or_zero() * (magnitude * scale).min(ARROW_CAP),
        },
        magnitude,
    }
}

fn random_unit(rng: &mut SmallRng) -> Vec3 {
    let theta = rng.random::<f32>() * std::f32::consts::TAU;
    let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn level_basis_matches_heading() {
        let q = visual_basis(Vec3::NEG_Z, Vec3::Y).expect("basis");
        assert_abs_diff_eq!(q.dot(Quat::IDENTITY).abs(), 1.0, epsilon = 1e-5);
        let turned = visual_basis(Vec3::NEG_X, Vec3::Y).expect("basis");
        let fwd = turned * Vec3::NEG_Z;
        assert_abs_diff_eq!(fwd.x, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn basis_rejects_forward_along_normal() {
        assert!(visual_basis(Vec3::Y, Vec3::Y).is_none());
    }

    #[test]
    fn wrap_takes_short_way() {
        assert_abs_diff_eq!(wrap_angle(3.0 * std::f32::consts::PI / 2.0), -std::f32::consts::FRAC_PI_2, epsilon = 1e-5);
    }

    #[test]
    fn blend_is_zero_at_rest_and_bounded() {
        assert_eq!(blend(8.0, 0.0), 0.0);
        assert!(blend(8.0, 100.0) <= 1.0);
    }

    #[test]
    fn random_directions_are_unit() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..32 {
            assert_abs_diff_eq!(random_unit(&mut rng).length(), 1.0, epsilon = 1e-4);
        }
    }
}
