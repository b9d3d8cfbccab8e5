//! Line-of-sight enforcement.
//!
//! Per frame: decide whether the aim point is worth checking (framing gate),
//! raycast from the aim point back to the desired camera location, and on an
//! occlusion pull the camera in to the impact point — optionally
//! dolly-zooming so the subject keeps its apparent size.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dolly_zoom;
use crate::scene::{Scene, SceneError};
use crate::smooth_return::SmoothReturn;
use crate::view::CameraView;

/// When the line-of-sight check runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LosMode {
  /// No line-of-sight handling.
  #[default]
  Ignore,
  /// Raycast only while the aim point is inside the camera's FOV cone.
  KeepLos,
  /// Raycast unconditionally.
  KeepLosNoDot,
  /// Raycast while the aim point passes a fixed dot-product limit; no FOV
  /// term.
  KeepLosWithinLimit,
}

/// Settings and per-frame state for line-of-sight enforcement.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LosSettings {
  pub mode: LosMode,
  /// Tolerance added to the framing test, in radians of dot-product slack.
  pub fov_check_offset: f32,
  /// Collision-layer mask for the LOS ray — the camera's own object channel.
  pub collision_mask: u32,
  /// Dolly-zoom the FOV on occlusion so the subject keeps its framed size.
  pub use_dolly_zoom: bool,
  /// Occlusion result of the most recent enforced frame.
  pub is_blocked: bool,
  /// FOV latched when occlusion began; the dolly-zoom-on-LOS reference.
  pub stored_fov: f32,
}

impl Default for LosSettings {
  fn default() -> Self {
    Self {
      mode: LosMode::default(),
      fov_check_offset: 0.0,
      collision_mask: u32::MAX,
      use_dolly_zoom: false,
      is_blocked: false,
      stored_fov: 0.0,
    }
  }
}

/// Runs the per-frame LOS check and relocates the view on occlusion.
///
/// `effective_fov` is the view FOV plus any externally applied additive
/// offset; it feeds the framing gate only. A frame gated out by the framing
/// test leaves `is_blocked` unchanged — no raycast ran, so there is no new
/// information. Frames that do raycast always update `is_blocked`, and latch
/// `stored_fov` only on the clear→blocked edge.
#[allow(clippy::too_many_arguments)]
pub fn enforce(
  los: &mut LosSettings,
  smooth_return: &mut SmoothReturn,
  view: &mut CameraView,
  aim_point: Vec3,
  owner_location: Vec3,
  owner: Entity,
  effective_fov: f32,
  scene: &impl Scene,
) -> Result<(), SceneError> {
  let to_aim = aim_point - view.location;
  let Some(dir_to_aim) = to_aim.try_normalize() else {
    return Ok(());
  };
  let facing = view.forward().dot(dir_to_aim);

  let should_cast = match los.mode {
    LosMode::Ignore => return Ok(()),
    LosMode::KeepLos => facing > (effective_fov.to_radians() / 2.0).cos() - los.fov_check_offset,
    LosMode::KeepLosWithinLimit => facing > los.fov_check_offset,
    LosMode::KeepLosNoDot => true,
  };
  if !should_cast {
    return Ok(());
  }

  let hit = scene.raycast(aim_point, view.location, Some(owner), los.collision_mask)?;
  if let Some(impact) = hit {
    if !los.is_blocked {
      los.stored_fov = view.fov;
    }
    if los.use_dolly_zoom {
      // The reference distance is to the pre-relocation location, so the FOV
      // must be computed before the impact point overwrites it.
      let reference = owner_location.distance(view.location);
      let current = owner_location.distance(impact);
      view.fov = dolly_zoom::compute_fov_clamped(reference, los.stored_fov, current);
    }
    view.location = impact;
    if smooth_return.enabled {
      smooth_return.was_blocked_recently = true;
      smooth_return.previous_location = impact;
    }
  }
  los.is_blocked = hit.is_some();
  Ok(())
}
