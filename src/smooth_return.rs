//! Post-occlusion smooth recovery of the camera location.
//!
//! While a line-of-sight block is active the camera sits at the impact
//! point. Once the block clears, snapping straight back to the live desired
//! location would pop; instead the location eases back exponentially until
//! it converges.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::view::CameraView;

/// Exponential move of `current` toward `target`, framerate-independent for
/// small steps. A non-positive `speed` snaps to the target.
pub fn interp_to(current: Vec3, target: Vec3, dt: f32, speed: f32) -> Vec3 {
  if speed <= 0.0 {
    return target;
  }
  current + (target - current) * (speed * dt).clamp(0.0, 1.0)
}

/// Settings and recovery state for the post-occlusion return.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SmoothReturn {
  pub enabled: bool,
  /// Exponential recovery rate, per second.
  pub speed: f32,
  /// Squared distance at which recovery counts as converged.
  pub completion_threshold_sq: f32,
  /// Set when a line-of-sight block begins; cleared once recovery converges.
  pub was_blocked_recently: bool,
  /// Camera location easing back toward the live desired location.
  pub previous_location: Vec3,
}

impl Default for SmoothReturn {
  fn default() -> Self {
    Self {
      enabled: false,
      speed: 5.0,
      completion_threshold_sq: 1.0,
      was_blocked_recently: false,
      previous_location: Vec3::ZERO,
    }
  }
}

impl SmoothReturn {
  /// Eases the view location back toward the live position after an
  /// occlusion clears.
  ///
  /// Runs strictly after LOS enforcement and never re-triggers from its own
  /// output: once converged, the recovery flag clears and stays clear until
  /// the next block event.
  pub fn apply(&mut self, view: &mut CameraView, is_blocked: bool, dt: f32) {
    if !self.enabled || !self.was_blocked_recently || is_blocked {
      return;
    }
    if self.previous_location.distance_squared(view.location) < self.completion_threshold_sq {
      self.was_blocked_recently = false;
      return;
    }
    self.previous_location = interp_to(self.previous_location, view.location, dt, self.speed);
    view.location = self.previous_location;
  }
}
