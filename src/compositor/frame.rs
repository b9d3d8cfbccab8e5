//! Per-frame view composition.
//!
//! One synchronous pass per rendered frame: resolve both tracks, blend them
//! onto the base view in order, then enforce line of sight and ease back out
//! of any past occlusion. All mutable state lives on the
//! [`CameraCompositor`] itself.

use bevy::prelude::*;

use super::components::CameraCompositor;
use crate::aim::aim_location;
use crate::dolly_zoom::compute_fov_clamped;
use crate::los;
use crate::scene::{Scene, SceneError};
use crate::track::CameraTrack;
use crate::view::{CameraView, blend};

impl CameraCompositor {
  /// Produces the frame's final view from the base view.
  ///
  /// Order is a behavioral contract: primary blends onto the base, the
  /// secondary onto that already-blended result; line-of-sight relocation
  /// runs on the blended view and smooth return strictly after it.
  pub fn compute_view(
    &mut self,
    dt: f32,
    base: CameraView,
    scene: &impl Scene,
  ) -> Result<CameraView, SceneError> {
    let owner_location = self
      .owner
      .and_then(|owner| scene.actor_transform(owner))
      .map(|transform| transform.translation);

    for track in [&mut self.primary, &mut self.secondary] {
      if !track.is_active() {
        continue;
      }
      track.resolve(dt, scene);
      if track.dolly_zoom.enabled && track.dolly_zoom.live_update_reference {
        if let Some(owner) = owner_location {
          track.dolly_zoom.reference_distance = owner.distance(track.location);
        }
      }
    }

    let mut view = base;
    for track in [&self.primary, &self.secondary] {
      if !track.is_active() {
        continue;
      }
      let fov = if Self::track_fov_enabled(track) {
        dolly_adjusted_fov(track, owner_location)
      } else {
        // FOV sentinel: blend pose only, carry the incoming FOV through.
        view.fov
      };
      let to = CameraView::new(track.location, track.rotation, fov);
      view = blend(
        &view,
        &to,
        track.alpha,
        track.orbit,
        owner_location.unwrap_or(view.location),
      );
    }

    // Without a valid owner there is nothing to frame: LOS enforcement
    // silently stands down for the frame.
    if let (Some(owner), Some(owner_loc)) = (self.owner, owner_location) {
      let aim_point = aim_location(&self.primary, &self.secondary, owner_loc, scene);
      let effective_fov = self.effective_fov(view.fov);
      los::enforce(
        &mut self.los,
        &mut self.smooth_return,
        &mut view,
        aim_point,
        owner_loc,
        owner,
        effective_fov,
        scene,
      )?;
    }

    self
      .smooth_return
      .apply(&mut view, self.los.is_blocked, dt);

    Ok(view)
  }
}

/// Track FOV with per-track dolly-zoom compensation applied.
///
/// The compensated value feeds the blend only; the track's stored FOV stays
/// externally owned so compensation never compounds frame over frame.
fn dolly_adjusted_fov(track: &CameraTrack, owner_location: Option<Vec3>) -> f32 {
  if !track.dolly_zoom.enabled {
    return track.fov;
  }
  let Some(owner) = owner_location else {
    return track.fov;
  };
  compute_fov_clamped(
    track.dolly_zoom.reference_distance,
    track.fov,
    owner.distance(track.location),
  )
}
