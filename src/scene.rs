//! Collaborator contracts the compositor reads from the host world.
//!
//! The compositor never owns or mutates world state: actors, bones, other
//! cameras and the physics query pipeline all live elsewhere. [`Scene`] is
//! the capability seam — one method per hook — so the Bevy-backed
//! implementation and test doubles plug in the same way.

use bevy::prelude::*;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
  /// A line-of-sight raycast was attempted with no physics context present.
  /// This is a contract violation by the host, not a recoverable condition.
  #[error("line-of-sight raycast attempted without a physics context")]
  MissingPhysicsContext,
}

/// Read-only snapshot view of the world for one frame of compositing.
///
/// All lookups fail soft with `None` (the caller logs and keeps its previous
/// value); only [`Scene::raycast`] can fail hard, and only for a missing
/// physics context.
pub trait Scene {
  /// World transform of an actor, or `None` if it no longer exists.
  fn actor_transform(&self, actor: Entity) -> Option<Transform>;

  /// World transform of a named skeletal bone under `actor`. `None` when the
  /// actor exposes no such bone.
  fn bone_transform(&self, actor: Entity, bone: &str) -> Option<Transform>;

  /// Another camera-bearing actor's current view: world transform plus FOV
  /// in degrees.
  fn camera_view(&self, actor: Entity) -> Option<(Transform, f32)>;

  /// Synchronous segment raycast from `from` to `to`, filtered to the given
  /// collision-layer mask and ignoring `exclude`. Returns the impact point
  /// of the first hit, if any.
  fn raycast(
    &self,
    from: Vec3,
    to: Vec3,
    exclude: Option<Entity>,
    mask: u32,
  ) -> Result<Option<Vec3>, SceneError>;
}
