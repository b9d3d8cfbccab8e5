//! Scripted [`Scene`] double for unit tests.

use std::cell::Cell;
use std::collections::HashMap;

use bevy::prelude::*;

use crate::scene::{Scene, SceneError};

/// Deterministic collaborator scene: actors, bones and camera views are
/// plain maps, and the next raycast result is scripted by the test.
pub(crate) struct MockScene {
  pub world: World,
  pub actors: HashMap<Entity, Transform>,
  pub bones: HashMap<(Entity, String), Transform>,
  pub cameras: HashMap<Entity, (Transform, f32)>,
  /// Result of the next raycast; `None` means clear.
  pub next_hit: Option<Vec3>,
  pub physics_available: bool,
  /// Number of raycasts performed, for gating assertions.
  pub casts: Cell<usize>,
}

impl Default for MockScene {
  fn default() -> Self {
    Self {
      world: World::new(),
      actors: HashMap::new(),
      bones: HashMap::new(),
      cameras: HashMap::new(),
      next_hit: None,
      physics_available: true,
      casts: Cell::new(0),
    }
  }
}

impl MockScene {
  /// Allocates a fresh entity id to use as an actor handle.
  pub fn spawn(&mut self) -> Entity {
    self.world.spawn_empty().id()
  }
}

impl Scene for MockScene {
  fn actor_transform(&self, actor: Entity) -> Option<Transform> {
    self.actors.get(&actor).copied()
  }

  fn bone_transform(&self, actor: Entity, bone: &str) -> Option<Transform> {
    self.bones.get(&(actor, bone.to_owned())).copied()
  }

  fn camera_view(&self, actor: Entity) -> Option<(Transform, f32)> {
    self.cameras.get(&actor).copied()
  }

  fn raycast(
    &self,
    _from: Vec3,
    _to: Vec3,
    _exclude: Option<Entity>,
    _mask: u32,
  ) -> Result<Option<Vec3>, SceneError> {
    if !self.physics_available {
      return Err(SceneError::MissingPhysicsContext);
    }
    self.casts.set(self.casts.get() + 1);
    Ok(self.next_hit)
  }
}
