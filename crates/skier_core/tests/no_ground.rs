use glam::Vec3;
use skier_core::{
    Entity, InputSnapshot, MeshNode, NoGround, RigidBody, SkierController, SkierParams, SlopePlane,
    TickContext,
};
use snow_fx::{ParticleField, ParticleParams};
use surface_field::{SurfaceField, SurfaceParams};

fn rider(position: Vec3, velocity: Vec3) -> Entity {
    let mut body = RigidBody::new(1.0, position);
    body.velocity = velocity;
    Entity::new("rider", MeshNode::new("rider"), body)
}

#[test]
fn airborne_tick_skips_locomotion() {
    let mut e = rider(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));
    let mut ctrl = SkierController::attach(&mut e, SkierParams::default()).expect("attach");
    let mut trail = SurfaceField::new(SurfaceParams::trail()).expect("trail");
    let mut deform = SurfaceField::new(SurfaceParams::deformation()).expect("deform");
    let mut particles = ParticleField::new(ParticleParams::default()).expect("particles");

    let mut ctx = TickContext::new(&NoGround, InputSnapshot::default())
        .with_fields(&mut trail, &mut deform)
        .with_particles(&mut particles);
    ctrl.update_entity(&mut e, &mut ctx, 0.016).expect("update");

    assert!(!ctrl.is_grounded());
    let body = e.body.as_ref().expect("body");
    assert_eq!(body.force(), Vec3::ZERO, "no drive or drag while airborne");
    assert_eq!(body.velocity, Vec3::new(2.0, 0.0, 0.0));
    assert!(trail.texels().iter().all(|&t| t == 0.0), "trail untouched");
    assert!(deform.texels().iter().all(|&t| t == 1.0), "deformation untouched");
    assert_eq!(particles.alive_count(), 0);
    assert!(ctrl.state().last_stamp.is_none());
}

#[test]
fn degenerate_dt_values_keep_state_finite() {
    let flat = SlopePlane::flat(0.0);
    for dt in [0.0, 1e-9, 1e-6, 1e-3, 0.016, f32::NAN, -1.0] {
        for grounded in [false, true] {
            let mut e = rider(Vec3::new(0.0, 0.95, 0.0), Vec3::new(0.0, 0.0, -3.0));
            let mut ctrl = SkierController::attach(&mut e, SkierParams::default()).expect("attach");
            let mut particles = ParticleField::new(ParticleParams::default()).expect("particles");
            let mut input = InputSnapshot::steering(0.5);
            input.jump = true;
            let physics: &dyn skier_core::PhysicsQuery = if grounded { &flat } else { &NoGround };
            for _ in 0..3 {
                let mut ctx = TickContext::new(physics, input).with_particles(&mut particles);
                ctrl.update_entity(&mut e, &mut ctx, dt).expect("update");
            }
            let rig = e.rig_mut().expect("rig");
            assert!(rig.body.position.is_finite(), "dt={dt} grounded={grounded}");
            assert!(rig.body.force().is_finite(), "dt={dt} grounded={grounded}");
            assert!(rig.mesh.orientation.is_finite(), "dt={dt} grounded={grounded}");
            assert!(ctrl.state().yaw.is_finite());
        }
    }
}

#[test]
fn nan_steer_axis_is_ignored() {
    let mut e = rider(Vec3::ZERO, Vec3::ZERO);
    let mut ctrl = SkierController::attach(&mut e, SkierParams::default()).expect("attach");
    let mut ctx = TickContext::new(&NoGround, InputSnapshot::steering(f32::NAN));
    ctrl.update_entity(&mut e, &mut ctx, 0.016).expect("update");
    assert_eq!(ctrl.state().yaw, 0.0);
}
