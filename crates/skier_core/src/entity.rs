//! Entity container boundary: a named mesh hierarchy plus a rigid body.

use glam::{Quat, Vec3};

use crate::body::RigidBody;
use crate::{Component, SkierError};

/// Name of the child node that detaches into its own body on a fall.
pub const BOARD_NODE: &str = "snowboard";

#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub name: String,
    pub position: Vec3,
    pub orientation: Quat,
    /// Half extents of the node's own bounds.
    pub half_extents: Vec3,
    pub children: Vec<MeshNode>,
}

impl MeshNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            half_extents: Vec3::splat(0.5),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_extents(mut self, half_extents: Vec3) -> Self {
        self.half_extents = half_extents;
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: MeshNode) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first lookup by name, excluding `self`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&MeshNode> {
        self.children
            .iter()
            .find_map(|c| if c.name == name { Some(c) } else { c.find(name) })
    }

    /// Removes and returns the first descendant called `name`.
    pub fn take_child(&mut self, name: &str) -> Option<MeshNode> {
        if let Some(i) = self.children.iter().position(|c| c.name == name) {
            return Some(self.children.remove(i));
        }
        self.children.iter_mut().find_map(|c| c.take_child(name))
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub mesh: Option<MeshNode>,
    pub body: Option<RigidBody>,
}

/// Mutable view of the two components a controller drives.
pub struct Rig<'a> {
    pub mesh: &'a mut MeshNode,
    pub body: &'a mut RigidBody,
}

impl Entity {
    #[must_use]
    pub fn new(name: impl Into<String>, mesh: MeshNode, body: RigidBody) -> Self {
        Self {
            name: name.into(),
            mesh: Some(mesh),
            body: Some(body),
        }
    }

    pub fn rig_mut(&mut self) -> Result<Rig<'_>, SkierError> {
        let Some(mesh) = self.mesh.as_mut() else {
            return Err(SkierError::MissingComponent {
                entity: self.name.clone(),
                component: Component::Mesh,
            });
        };
        let Some(body) = self.body.as_mut() else {
            return Err(SkierError::MissingComponent {
                entity: self.name.clone(),
                component: Component::Body,
            });
        };
        Ok(Rig { mesh, body })
    }
}

/// Receives entities spawned during a tick (the detached board).
pub trait EntitySink {
    fn add_entity(&mut self, entity: Entity);
}

impl EntitySink for Vec<Entity> {
    fn add_entity(&mut self, entity: Entity) {
        self.push(entity);
    }
}
