//! Dolly-zoom FOV compensation.
//!
//! Keeps the apparent framed size `S = 2·tan(θ/2)·d` constant across a
//! distance change, giving `θ' = 2·atan(tan(θ/2) · d_ref / d_cur)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest distance accepted by the dolly-zoom divisor.
///
/// Distances at or below this are degenerate; the frame path clamps to it so
/// NaN/Inf never reach the final FOV.
pub const MIN_DOLLY_DISTANCE: f32 = 1e-3;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum DollyZoomError {
  #[error("dolly-zoom current distance {0} is degenerate (below {MIN_DOLLY_DISTANCE})")]
  DegenerateDistance(f32),
}

/// Per-track dolly-zoom settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DollyZoom {
  pub enabled: bool,
  /// Refresh [`Self::reference_distance`] from the live owner↔track distance
  /// every frame. While set, compensation is a no-op; freeze the reference
  /// externally to start the zoom effect.
  pub live_update_reference: bool,
  /// Owner↔camera distance at which `fov` frames the subject as intended.
  pub reference_distance: f32,
}

/// FOV that preserves the framed size of a subject across a distance change.
///
/// Degrees in, degrees out. Fails on a degenerate `current_distance`; the
/// per-frame paths use [`compute_fov_clamped`] instead.
pub fn compute_fov(
  reference_distance: f32,
  reference_fov: f32,
  current_distance: f32,
) -> Result<f32, DollyZoomError> {
  if current_distance < MIN_DOLLY_DISTANCE {
    return Err(DollyZoomError::DegenerateDistance(current_distance));
  }
  let half_tan = (reference_fov.to_radians() / 2.0).tan();
  Ok((2.0 * (half_tan * reference_distance / current_distance).atan()).to_degrees())
}

/// [`compute_fov`] with the divisor clamped to [`MIN_DOLLY_DISTANCE`].
///
/// The frame path must always produce a usable FOV, so the degenerate case
/// clamps rather than erroring.
pub fn compute_fov_clamped(
  reference_distance: f32,
  reference_fov: f32,
  current_distance: f32,
) -> f32 {
  let clamped = current_distance.max(MIN_DOLLY_DISTANCE);
  let half_tan = (reference_fov.to_radians() / 2.0).tan();
  (2.0 * (half_tan * reference_distance / clamped).atan()).to_degrees()
}
