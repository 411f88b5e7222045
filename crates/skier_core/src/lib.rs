//! skier_core: per-tick skier locomotion.
//!
//! The controller reads a rigid body after the physics step, senses the
//! ground with a ring of probe rays, steers, pushes forces and impulses back
//! into the body, and drives the shared trail/deformation fields and the snow
//! spray pool. Physics, rendering and input devices stay outside; they meet
//! the controller through the traits in `physics`, `context` and `telemetry`.

#![forbid(unsafe_code)]

pub mod body;
pub mod context;
pub mod controller;
pub mod entity;
pub mod ground;
pub mod input;
pub mod params;
pub mod physics;
pub mod telemetry;

pub use body::{BodyShape, RigidBody};
pub use context::{TerrainStamper, TickContext};
pub use controller::{SkierController, SkierPhase, SkierState};
pub use entity::{BOARD_NODE, Entity, EntitySink, MeshNode, Rig};
pub use input::{InputSnapshot, ResolvedInput, SkierKeys};
pub use params::{LocomotionModel, SkierParams};
pub use physics::{CollisionFilter, ContactEvent, NoGround, PhysicsQuery, RayHit, SlopePlane};
pub use telemetry::{DebugArrow, DebugVector, LastFrame, SkierTelemetry, TelemetrySink};

/// Component an entity must carry to be driven by a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Mesh,
    Body,
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Component::Mesh => f.write_str("mesh"),
            Component::Body => f.write_str("physics body"),
        }
    }
}

/// Wiring errors. These indicate a bug in entity assembly, not a runtime
/// condition, and are reported before any tick runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkierError {
    #[error("entity '{entity}' has no {component} component")]
    MissingComponent { entity: String, component: Component },
}
