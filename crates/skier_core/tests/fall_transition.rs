use glam::Vec3;
use skier_core::physics::GROUP_TERRAIN;
use skier_core::{
    BOARD_NODE, BodyShape, ContactEvent, Entity, InputSnapshot, MeshNode, RigidBody,
    SkierController, SkierParams, SlopePlane, TickContext,
};
use snow_fx::{ParticleField, ParticleParams};
use surface_field::{SurfaceField, SurfaceParams};

fn rider() -> Entity {
    let mesh = MeshNode::new("rider")
        .with_child(MeshNode::new(BOARD_NODE).with_extents(Vec3::new(0.8, 0.02, 0.15)));
    let mut body = RigidBody::new(1.0, Vec3::new(0.0, 0.95, 0.0));
    body.velocity = Vec3::new(0.5, 0.0, -6.0);
    body.angular_velocity = Vec3::new(0.0, 0.3, 0.0);
    Entity::new("rider", mesh, body)
}

#[test]
fn hard_obstacle_hit_detaches_board() {
    let flat = SlopePlane::flat(0.0);
    let mut e = rider();
    let mut ctrl = SkierController::attach(&mut e, SkierParams::default()).expect("attach");
    let mut particles = ParticleField::new(ParticleParams::default()).expect("particles");
    let mut spawned: Vec<Entity> = Vec::new();
    let mut ctx = TickContext::new(&flat, InputSnapshot::default())
        .with_particles(&mut particles)
        .with_entities(&mut spawned);

    let fell = ctrl.on_collide(e.rig_mut().expect("rig"), &ContactEvent::obstacle(-3.0), &mut ctx);
    assert!(fell);
    assert!(ctrl.is_fallen());
    assert!(ctrl.state().board_detached);
    assert_eq!(particles.alive_count(), 3 * 14, "three collision bursts");

    assert_eq!(spawned.len(), 1);
    let board = &spawned[0];
    assert_eq!(board.name, BOARD_NODE);
    let board_body = board.body.as_ref().expect("board body");
    assert_eq!(board_body.mass, 1.2);
    assert_eq!(board_body.velocity, Vec3::new(0.5, 0.0, -6.0));
    assert_eq!(board_body.angular_velocity, Vec3::new(0.0, 0.3, 0.0));
    assert_eq!(
        board_body.shape,
        BodyShape::Box {
            half_extents: Vec3::new(0.8, 0.05, 0.15)
        }
    );

    let rig = e.rig_mut().expect("rig");
    assert!(rig.mesh.find(BOARD_NODE).is_none(), "board left the rider mesh");
    assert_eq!(rig.body.angular_factor, Vec3::ONE);
    assert_eq!(rig.body.angular_damping, 0.1);
    assert_eq!(rig.body.linear_damping, 0.02);
}

#[test]
fn terrain_contacts_never_cause_a_fall() {
    let mut e = rider();
    let mut ctrl = SkierController::attach(&mut e, SkierParams::default()).expect("attach");
    let mut particles = ParticleField::new(ParticleParams::default()).expect("particles");
    let mut ctx = TickContext::new(&skier_core::NoGround, InputSnapshot::default())
        .with_particles(&mut particles);
    let contact = ContactEvent {
        other_group: GROUP_TERRAIN,
        impact_velocity: 12.0,
        point_a: None,
        point_b: None,
    };
    assert!(!ctrl.on_collide(e.rig_mut().expect("rig"), &contact, &mut ctx));
    assert!(!ctrl.is_fallen());
    assert_eq!(particles.alive_count(), 0);
}

#[test]
fn soft_hit_sprays_but_keeps_riding() {
    let mut e = rider();
    let mut ctrl = SkierController::attach(&mut e, SkierParams::default()).expect("attach");
    let mut particles = ParticleField::new(ParticleParams::default()).expect("particles");
    let mut ctx = TickContext::new(&skier_core::NoGround, InputSnapshot::default())
        .with_particles(&mut particles);
    assert!(!ctrl.on_collide(e.rig_mut().expect("rig"), &ContactEvent::obstacle(0.5), &mut ctx));
    assert!(!ctrl.is_fallen());
    assert_eq!(particles.alive_count(), 42);
}

#[test]
fn fallen_skier_never_drives_again() {
    let flat = SlopePlane::flat(0.0);
    let mut e = rider();
    let mut ctrl = SkierController::attach(&mut e, SkierParams::default()).expect("attach");
    let mut trail = SurfaceField::new(SurfaceParams::trail()).expect("trail");
    let mut deform = SurfaceField::new(SurfaceParams::deformation()).expect("deform");
    let mut spawned: Vec<Entity> = Vec::new();
    {
        let mut ctx = TickContext::new(&flat, InputSnapshot::default()).with_entities(&mut spawned);
        ctrl.trigger_fall(e.rig_mut().expect("rig"), &mut ctx);
        // Second trigger and later hits are ignored.
        ctrl.trigger_fall(e.rig_mut().expect("rig"), &mut ctx);
        assert!(!ctrl.on_collide(e.rig_mut().expect("rig"), &ContactEvent::obstacle(9.0), &mut ctx));
    }
    assert_eq!(spawned.len(), 1);
    trail.take_dirty();

    let mut input = InputSnapshot::steering(1.0);
    input.boost = true;
    for _ in 0..10 {
        let mut ctx = TickContext::new(&flat, input).with_fields(&mut trail, &mut deform);
        ctrl.update_entity(&mut e, &mut ctx, 0.016).expect("update");
        let rig = e.rig_mut().expect("rig");
        assert_eq!(rig.body.force(), Vec3::ZERO, "no locomotion forces after a fall");
        assert_eq!(rig.mesh.position, rig.body.position, "mesh follows body");
        rig.body.position.z -= 0.1;
    }
    assert!(ctrl.is_fallen());
    assert!(!trail.take_dirty(), "no stamps after a fall");
    assert!(trail.texels().iter().all(|&t| t == 0.0));
}
