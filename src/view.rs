//! Camera view primitives and two-stage view blending.
//!
//! A [`CameraView`] is the unit the whole pipeline trades in: a world-space
//! pose plus a field of view in degrees. [`blend`] folds one view onto
//! another at a blend factor, either along a straight line or as an orbit
//! around the followed actor.

use bevy::math::FloatExt;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Tolerance for the "fully blended" / "not blended" alpha tests.
///
/// Alphas within this distance of 0 or 1 bypass interpolation entirely so
/// endpoint views come through without residual floating error.
pub const BLEND_EPSILON: f32 = 1e-4;

/// A camera pose with field of view, in world space.
///
/// `fov` is in degrees. Track state uses `0.0` as a sentinel for "FOV
/// blending disabled"; a [`CameraView`] produced by the pipeline always
/// carries a real FOV.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
  pub location: Vec3,
  pub rotation: Quat,
  pub fov: f32,
}

impl CameraView {
  pub const fn new(location: Vec3, rotation: Quat, fov: f32) -> Self {
    Self {
      location,
      rotation,
      fov,
    }
  }

  /// World-space forward axis of this view (-Z, Bevy's camera convention).
  pub fn forward(&self) -> Vec3 {
    self.rotation * Vec3::NEG_Z
  }
}

impl Default for CameraView {
  fn default() -> Self {
    Self {
      location: Vec3::ZERO,
      rotation: Quat::IDENTITY,
      fov: 90.0,
    }
  }
}

/// How a track's location approaches the view it blends onto.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitMode {
  /// Straight line between the two locations.
  #[default]
  Linear,
  /// Orbit around the owner: slerp the owner-relative direction, lerp the
  /// radius. Keeps the camera from cutting through the subject.
  Spherical,
}

pub(crate) fn nearly_zero(value: f32) -> bool {
  value.abs() < BLEND_EPSILON
}

pub(crate) fn nearly_equal(a: f32, b: f32) -> bool {
  (a - b).abs() < BLEND_EPSILON
}

/// Blends `from` toward `to` at `alpha`.
///
/// Alphas within [`BLEND_EPSILON`] of 0 or 1 return the endpoint unchanged.
/// Rotation is always slerped and FOV always lerped; only the location path
/// depends on [`OrbitMode`]. `owner_location` anchors the spherical mode and
/// is ignored for linear blends.
pub fn blend(
  from: &CameraView,
  to: &CameraView,
  alpha: f32,
  orbit: OrbitMode,
  owner_location: Vec3,
) -> CameraView {
  if nearly_zero(alpha) {
    return *from;
  }
  if nearly_equal(alpha, 1.0) {
    return *to;
  }

  let location = match orbit {
    OrbitMode::Linear => from.location.lerp(to.location, alpha),
    OrbitMode::Spherical => spherical_lerp(from.location, to.location, alpha, owner_location),
  };

  CameraView {
    location,
    rotation: from.rotation.slerp(to.rotation, alpha),
    fov: from.fov.lerp(to.fov, alpha),
  }
}

/// Owner-relative orbit interpolation: directions slerp, radii lerp exactly.
fn spherical_lerp(from: Vec3, to: Vec3, alpha: f32, owner: Vec3) -> Vec3 {
  let rel_from = from - owner;
  let rel_to = to - owner;
  let (Some(dir_from), Some(dir_to)) = (rel_from.try_normalize(), rel_to.try_normalize()) else {
    // An endpoint at the owner pivot has no direction to orbit through.
    return from.lerp(to, alpha);
  };

  let radius = rel_from.length().lerp(rel_to.length(), alpha);
  let arc_from = Quat::from_rotation_arc(Vec3::X, dir_from);
  let arc_to = Quat::from_rotation_arc(Vec3::X, dir_to);
  owner + arc_from.slerp(arc_to, alpha) * (Vec3::X * radius)
}
