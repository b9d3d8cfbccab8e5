//! Compositor component and its property-writer surface.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::los::{LosMode, LosSettings};
use crate::smooth_return::SmoothReturn;
use crate::track::{CameraTrack, TrackDriver};
use crate::view::nearly_zero;

/// Per-camera compositing state: two blendable tracks, line-of-sight
/// enforcement and post-occlusion smooth return.
///
/// Attach to a camera entity carrying `Transform` and a perspective
/// `Projection`; those are read as the frame's base view and overwritten
/// with the composited result.
#[derive(Component, Clone, Debug, Default, Serialize, Deserialize)]
pub struct CameraCompositor {
  pub primary: CameraTrack,
  pub secondary: CameraTrack,
  pub los: LosSettings,
  pub smooth_return: SmoothReturn,
  /// The followed actor. Without one, aim resolution, LOS enforcement and
  /// per-track dolly zoom degrade silently to plain blending.
  #[serde(skip)]
  pub owner: Option<Entity>,
  /// Externally supplied toggle: when set, `additive_fov_offset` widens the
  /// effective FOV used by the LOS framing test. The offset's value is owned
  /// by whoever drives the base camera; the compositor only reads it.
  pub use_additive_fov_offset: bool,
  /// Additive FOV offset in degrees, meaningful only while
  /// `use_additive_fov_offset` is set.
  pub additive_fov_offset: f32,
}

/// Convenience writers mirroring the external mutator surface. All of them
/// are plain property writes; in particular the alpha setters do NOT clamp
/// to `[0, 1]`, so out-of-range values extrapolate through the blend math.
impl CameraCompositor {
  pub fn set_primary_track(&mut self, location: Vec3, rotation: Quat, fov: f32) {
    self.primary.location = location;
    self.primary.rotation = rotation;
    self.primary.fov = fov;
  }

  pub fn set_secondary_track(&mut self, location: Vec3, rotation: Quat, fov: f32) {
    self.secondary.location = location;
    self.secondary.rotation = rotation;
    self.secondary.fov = fov;
  }

  pub fn set_primary_pose(&mut self, location: Vec3, rotation: Quat) {
    self.primary.location = location;
    self.primary.rotation = rotation;
  }

  pub fn set_secondary_pose(&mut self, location: Vec3, rotation: Quat) {
    self.secondary.location = location;
    self.secondary.rotation = rotation;
  }

  pub fn set_primary_location(&mut self, location: Vec3) {
    self.primary.location = location;
  }

  pub fn set_secondary_location(&mut self, location: Vec3) {
    self.secondary.location = location;
  }

  pub fn set_primary_rotation(&mut self, rotation: Quat) {
    self.primary.rotation = rotation;
  }

  pub fn set_secondary_rotation(&mut self, rotation: Quat) {
    self.secondary.rotation = rotation;
  }

  pub fn set_primary_alpha(&mut self, alpha: f32) {
    self.primary.alpha = alpha;
  }

  pub fn set_secondary_alpha(&mut self, alpha: f32) {
    self.secondary.alpha = alpha;
  }

  pub fn primary_alpha(&self) -> f32 {
    self.primary.alpha
  }

  pub fn secondary_alpha(&self) -> f32 {
    self.secondary.alpha
  }

  pub fn set_primary_fov(&mut self, fov: f32) {
    self.primary.fov = fov;
  }

  pub fn set_secondary_fov(&mut self, fov: f32) {
    self.secondary.fov = fov;
  }

  pub fn set_primary_driver(&mut self, driver: TrackDriver) {
    self.primary.driver = driver;
  }

  pub fn set_secondary_driver(&mut self, driver: TrackDriver) {
    self.secondary.driver = driver;
  }

  pub fn set_los_mode(&mut self, mode: LosMode) {
    self.los.mode = mode;
  }

  pub fn los_mode(&self) -> LosMode {
    self.los.mode
  }

  /// True while the primary track fully owns the view.
  pub fn is_primary_authoritative(&self) -> bool {
    self.primary.is_authoritative()
  }

  /// True while the secondary track fully owns the view.
  pub fn is_secondary_authoritative(&self) -> bool {
    self.secondary.is_authoritative()
  }

  /// FOV used by the LOS framing test: the blended FOV widened by the
  /// additive offset when that toggle is set.
  pub fn effective_fov(&self, fov: f32) -> f32 {
    if self.use_additive_fov_offset {
      fov + self.additive_fov_offset
    } else {
      fov
    }
  }

  /// FOV blending is disabled for a track carrying the `0.0` sentinel.
  pub(crate) fn track_fov_enabled(track: &CameraTrack) -> bool {
    !nearly_zero(track.fov)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn single_channel_writers_touch_only_their_channel() {
    let mut compositor = CameraCompositor::default();
    let rotation = Quat::from_rotation_y(0.9);
    compositor.set_primary_track(Vec3::new(1.0, 2.0, 3.0), rotation, 55.0);

    compositor.set_primary_location(Vec3::new(7.0, 8.0, 9.0));
    assert_eq!(compositor.primary.location, Vec3::new(7.0, 8.0, 9.0));
    assert_eq!(compositor.primary.rotation, rotation);
    assert_eq!(compositor.primary.fov, 55.0);

    let new_rotation = Quat::from_rotation_x(-0.4);
    compositor.set_primary_rotation(new_rotation);
    assert_eq!(compositor.primary.location, Vec3::new(7.0, 8.0, 9.0));
    assert_eq!(compositor.primary.rotation, new_rotation);

    compositor.set_secondary_location(Vec3::new(-1.0, 0.0, 1.0));
    compositor.set_secondary_rotation(rotation);
    assert_eq!(compositor.secondary.location, Vec3::new(-1.0, 0.0, 1.0));
    assert_eq!(compositor.secondary.rotation, rotation);
    // The secondary FOV sentinel is untouched by the pose writers.
    assert_eq!(compositor.secondary.fov, 0.0);
  }

  #[test]
  fn alpha_setters_do_not_clamp() {
    let mut compositor = CameraCompositor::default();
    compositor.set_primary_alpha(1.7);
    compositor.set_secondary_alpha(-0.3);
    assert_eq!(compositor.primary_alpha(), 1.7);
    assert_eq!(compositor.secondary_alpha(), -0.3);
  }
}
