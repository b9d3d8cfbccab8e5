//! Aim-point resolution for line-of-sight framing.

use bevy::prelude::*;

use crate::scene::Scene;
use crate::track::CameraTrack;

/// World point the camera should keep in frame.
///
/// Starts from the owner's location and folds in each track's aim target at
/// that track's blend alpha — primary first, then secondary blended onto the
/// primary result, the same sequential composition the view blender uses.
/// Tracks without a resolvable aim target leave the point unchanged, so the
/// fallback is the owner location itself.
pub fn aim_location(
  primary: &CameraTrack,
  secondary: &CameraTrack,
  owner_location: Vec3,
  scene: &impl Scene,
) -> Vec3 {
  let mut point = owner_location;
  for track in [primary, secondary] {
    if !track.is_active() {
      continue;
    }
    if let Some(target) = track.aim_point(scene) {
      point = point.lerp(target, track.alpha);
    }
  }
  point
}
