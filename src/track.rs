//! Virtual camera tracks and per-frame driver resolution.
//!
//! A track is one blendable camera pose. Where its location and rotation
//! come from each frame depends on [`TrackDriver`]: pushed externally,
//! copied from another camera actor, or derived from locator/aim targets
//! (actor origins or named skeletal bones).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dolly_zoom::DollyZoom;
use crate::scene::Scene;
use crate::view::{OrbitMode, nearly_equal, nearly_zero};

/// Where a track's location and rotation come from each frame.
///
/// Location and aim sub-components are independently skippable: a `Data*`
/// half leaves that channel to whatever an external caller pushed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackDriver {
  /// Legacy behavior: copy the tracked camera actor wholesale.
  #[default]
  Compat,
  /// Transform and FOV are pushed by an external caller; the resolver never
  /// touches them.
  DataDriven,
  /// Copy the tracked camera actor's transform and FOV.
  ReferenceCameraDriven,
  /// External location, look-at rotation from the aim actor.
  DataAndAim,
  /// Location from the locator actor, external rotation.
  LocationAndData,
  /// Location from the locator actor, look-at rotation from the aim actor.
  LocAndAim,
  /// Location from a named bone, look-at rotation from a named bone.
  Skeleton,
  /// Location from a named bone, look-at rotation from the aim actor.
  SkeletonLocator,
  /// Location from the locator actor, look-at rotation from a named bone.
  SkeletonAim,
  /// External location, look-at rotation from a named bone.
  DataAndSkeletalAim,
  /// Location from a named bone, external rotation.
  SkeletalLocationAndData,
}

/// Source of one resolvable sub-component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DriveSource {
  /// Externally pushed; the resolver leaves it alone.
  Data,
  /// The target actor's origin transform.
  Actor,
  /// A named skeletal bone on the target actor.
  Bone,
}

impl TrackDriver {
  /// True for modes that mirror another camera actor.
  pub fn uses_tracked_camera(self) -> bool {
    matches!(self, Self::Compat | Self::ReferenceCameraDriven)
  }

  pub(crate) fn location_source(self) -> DriveSource {
    match self {
      Self::Compat | Self::ReferenceCameraDriven | Self::DataDriven => DriveSource::Data,
      Self::DataAndAim | Self::DataAndSkeletalAim => DriveSource::Data,
      Self::LocationAndData | Self::LocAndAim | Self::SkeletonAim => DriveSource::Actor,
      Self::Skeleton | Self::SkeletonLocator | Self::SkeletalLocationAndData => DriveSource::Bone,
    }
  }

  /// `None` when rotation is externally pushed for this mode.
  pub(crate) fn aim_source(self) -> Option<DriveSource> {
    match self {
      Self::Compat
      | Self::ReferenceCameraDriven
      | Self::DataDriven
      | Self::LocationAndData
      | Self::SkeletalLocationAndData => None,
      Self::DataAndAim | Self::LocAndAim | Self::SkeletonLocator => Some(DriveSource::Actor),
      Self::Skeleton | Self::SkeletonAim | Self::DataAndSkeletalAim => Some(DriveSource::Bone),
    }
  }

  /// True for modes whose rotation looks at an aim target.
  pub fn has_aim(self) -> bool {
    self.aim_source().is_some()
  }
}

/// Non-owning reference to a locator actor, optionally a named bone on it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrackTarget {
  #[serde(skip)]
  pub actor: Option<Entity>,
  pub bone: Option<String>,
}

/// Aim target: actor or bone, plus a local-space offset applied in the
/// target's frame.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AimTarget {
  #[serde(skip)]
  pub actor: Option<Entity>,
  pub bone: Option<String>,
  pub offset: Vec3,
}

/// One virtual camera track.
///
/// Two of these (primary and secondary) live in a
/// [`CameraCompositor`](crate::CameraCompositor); the secondary blends onto
/// the already-blended primary result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CameraTrack {
  pub location: Vec3,
  pub rotation: Quat,
  /// FOV in degrees. `0.0` disables FOV blending for this track.
  pub fov: f32,
  /// Blend factor: 0 = inactive, 1 = fully authoritative. Setters do not
  /// clamp; out-of-range values extrapolate through the blend math.
  pub alpha: f32,
  pub driver: TrackDriver,
  pub orbit: OrbitMode,
  /// Camera actor mirrored by the tracked-camera driver modes.
  #[serde(skip)]
  pub tracked_camera: Option<Entity>,
  /// Leave this track untouched even in a tracked-camera driver mode.
  pub ignore_tracked_camera: bool,
  pub locator: TrackTarget,
  pub aim: AimTarget,
  /// Slerp rate for look-at smoothing, per second. `0` applies the raw
  /// look-at directly.
  pub aim_interp_speed: f32,
  /// Look-at smoothing state carried across frames.
  pub past_look_at: Quat,
  pub dolly_zoom: DollyZoom,
}

impl Default for CameraTrack {
  fn default() -> Self {
    Self {
      location: Vec3::ZERO,
      rotation: Quat::IDENTITY,
      fov: 0.0,
      alpha: 0.0,
      driver: TrackDriver::default(),
      orbit: OrbitMode::default(),
      tracked_camera: None,
      ignore_tracked_camera: false,
      locator: TrackTarget::default(),
      aim: AimTarget::default(),
      aim_interp_speed: 0.0,
      past_look_at: Quat::IDENTITY,
      dolly_zoom: DollyZoom::default(),
    }
  }
}

impl CameraTrack {
  /// True when the track participates in blending at all.
  pub fn is_active(&self) -> bool {
    !nearly_zero(self.alpha)
  }

  /// True when the track fully owns the view (`alpha ≈ 1`).
  pub fn is_authoritative(&self) -> bool {
    nearly_equal(self.alpha, 1.0)
  }

  /// Refreshes this track's transform (and FOV, for camera-driven modes)
  /// from its driver.
  ///
  /// Soft failures — missing actors, missing bones, a vanished tracked
  /// camera — log a warning and leave the previous value of that
  /// sub-component unchanged.
  pub fn resolve(&mut self, dt: f32, scene: &impl Scene) {
    if self.driver.uses_tracked_camera() {
      if self.ignore_tracked_camera {
        return;
      }
      let resolved = self.tracked_camera.and_then(|cam| scene.camera_view(cam));
      match resolved {
        Some((transform, fov)) => {
          self.location = transform.translation;
          self.rotation = transform.rotation;
          self.fov = fov;
        }
        None => warn!("tracked camera for a camera track is missing; keeping previous view"),
      }
      return;
    }

    match self.driver.location_source() {
      DriveSource::Data => {}
      DriveSource::Actor => {
        match self.locator.actor.and_then(|a| scene.actor_transform(a)) {
          Some(transform) => self.location = transform.translation,
          None => warn!("camera track locator actor is missing; keeping previous location"),
        }
      }
      DriveSource::Bone => match self.locator_bone(scene) {
        Some(transform) => self.location = transform.translation,
        None => warn!(
          "camera track locator bone {:?} did not resolve; keeping previous location",
          self.locator.bone
        ),
      },
    }

    if self.driver.has_aim() {
      match self.aim_point(scene) {
        Some(point) => {
          let raw = look_rotation(self.location, point);
          self.rotation = if self.aim_interp_speed > 0.0 {
            self.past_look_at = self
              .past_look_at
              .slerp(raw, (self.aim_interp_speed * dt).clamp(0.0, 1.0));
            self.past_look_at
          } else {
            // Keep the smoothing state live so enabling smoothing later
            // starts from the current look-at instead of a stale one.
            self.past_look_at = raw;
            raw
          };
        }
        None => warn!(
          "camera track aim target {:?} did not resolve; keeping previous rotation",
          self.aim.bone
        ),
      }
    }
  }

  /// World point this track aims at, if its driver and targets provide one.
  pub fn aim_point(&self, scene: &impl Scene) -> Option<Vec3> {
    let source = self.driver.aim_source()?;
    let actor = self.aim.actor?;
    let transform = match source {
      DriveSource::Data => return None,
      DriveSource::Actor => scene.actor_transform(actor)?,
      DriveSource::Bone => scene.bone_transform(actor, self.aim.bone.as_deref()?)?,
    };
    Some(transform.transform_point(self.aim.offset))
  }

  fn locator_bone(&self, scene: &impl Scene) -> Option<Transform> {
    let actor = self.locator.actor?;
    scene.bone_transform(actor, self.locator.bone.as_deref()?)
  }
}

/// Rotation looking from `from` toward `to`, world up.
fn look_rotation(from: Vec3, to: Vec3) -> Quat {
  Transform::from_translation(from)
    .looking_at(to, Vec3::Y)
    .rotation
}
