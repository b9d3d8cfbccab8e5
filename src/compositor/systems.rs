//! Per-frame composition system and the Bevy-backed scene implementation.

use avian3d::prelude::{LayerMask, SpatialQueryFilter, SpatialQueryPipeline};
use bevy::prelude::*;

use super::components::CameraCompositor;
use crate::scene::{Scene, SceneError};
use crate::view::CameraView;

/// [`Scene`] implementation over the live Bevy world.
///
/// Bones are resolved as descendant entities whose `Name` matches the bone
/// name — the shape glTF skeleton imports produce. Raycasts go through
/// avian's spatial query pipeline; a missing pipeline resource is reported
/// as [`SceneError::MissingPhysicsContext`].
pub struct WorldScene<'a, 'w, 's> {
  pub transforms: &'a Query<'w, 's, &'static GlobalTransform, Without<CameraCompositor>>,
  pub names: &'a Query<'w, 's, &'static Name>,
  pub children: &'a Query<'w, 's, &'static Children>,
  pub cameras:
    &'a Query<'w, 's, (&'static GlobalTransform, &'static Projection), Without<CameraCompositor>>,
  pub spatial: Option<&'a SpatialQueryPipeline>,
}

impl Scene for WorldScene<'_, '_, '_> {
  fn actor_transform(&self, actor: Entity) -> Option<Transform> {
    self
      .transforms
      .get(actor)
      .ok()
      .map(GlobalTransform::compute_transform)
  }

  fn bone_transform(&self, actor: Entity, bone: &str) -> Option<Transform> {
    self
      .children
      .iter_descendants(actor)
      .find(|entity| {
        self
          .names
          .get(*entity)
          .is_ok_and(|name| name.as_str() == bone)
      })
      .and_then(|entity| self.transforms.get(entity).ok())
      .map(GlobalTransform::compute_transform)
  }

  fn camera_view(&self, actor: Entity) -> Option<(Transform, f32)> {
    let (transform, projection) = self.cameras.get(actor).ok()?;
    let Projection::Perspective(perspective) = projection else {
      return None;
    };
    Some((transform.compute_transform(), perspective.fov.to_degrees()))
  }

  fn raycast(
    &self,
    from: Vec3,
    to: Vec3,
    exclude: Option<Entity>,
    mask: u32,
  ) -> Result<Option<Vec3>, SceneError> {
    let Some(pipeline) = self.spatial else {
      return Err(SceneError::MissingPhysicsContext);
    };
    let delta = to - from;
    let max_distance = delta.length();
    let Ok(direction) = Dir3::new(delta) else {
      return Ok(None);
    };
    let mut filter = SpatialQueryFilter::from_mask(LayerMask(mask));
    if let Some(owner) = exclude {
      filter = filter.with_excluded_entities([owner]);
    }
    Ok(
      pipeline
        .cast_ray(from, direction, max_distance, true, &filter)
        .map(|hit| from + direction * hit.distance),
    )
  }
}

/// System: composites each camera's final view from its base pose.
///
/// The camera entity's own `Transform` and perspective `Projection` are the
/// frame's base view; follow/controller systems must run **before**
/// [`CameraCompositorSet`](super::CameraCompositorSet). Cameras without a
/// perspective projection are skipped.
pub fn compose_camera_views(
  time: Res<Time>,
  mut compositors: Query<(
    Entity,
    &mut CameraCompositor,
    &mut Transform,
    &mut Projection,
  )>,
  transforms: Query<&'static GlobalTransform, Without<CameraCompositor>>,
  names: Query<&'static Name>,
  children: Query<&'static Children>,
  cameras: Query<(&'static GlobalTransform, &'static Projection), Without<CameraCompositor>>,
  spatial: Option<Res<SpatialQueryPipeline>>,
) {
  let dt = time.delta_secs();
  let scene = WorldScene {
    transforms: &transforms,
    names: &names,
    children: &children,
    cameras: &cameras,
    spatial: spatial.as_deref(),
  };

  for (entity, mut compositor, mut transform, mut projection) in compositors.iter_mut() {
    let Projection::Perspective(perspective) = projection.as_ref() else {
      continue;
    };
    let base = CameraView::new(
      transform.translation,
      transform.rotation,
      perspective.fov.to_degrees(),
    );

    match compositor.compute_view(dt, base, &scene) {
      Ok(view) => {
        transform.translation = view.location;
        transform.rotation = view.rotation;
        if let Projection::Perspective(perspective) = projection.as_mut() {
          perspective.fov = view.fov.to_radians();
        }
      }
      Err(error) => error!("camera compositor on {entity:?}: {error}"),
    }
  }
}
