//! Camera view compositing plugin for Bevy.
//!
//! This crate computes, once per rendered frame, the effective camera pose
//! (world location, rotation, field of view) for an actor-following camera:
//! it blends the live base view with up to two independently driven virtual
//! tracks, keeps line of sight to the tracked subject, and recovers smoothly
//! once an obstruction clears.

pub mod aim;
pub mod compositor;
pub mod dolly_zoom;
pub mod los;
pub mod scene;
pub mod smooth_return;
pub mod track;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use aim::aim_location;
pub use compositor::{CameraCompositor, CameraCompositorPlugin, CameraCompositorSet, WorldScene};
pub use dolly_zoom::{DollyZoom, DollyZoomError, compute_fov, compute_fov_clamped};
pub use los::{LosMode, LosSettings};
pub use scene::{Scene, SceneError};
pub use smooth_return::{SmoothReturn, interp_to};
pub use track::{AimTarget, CameraTrack, TrackDriver, TrackTarget};
pub use view::{BLEND_EPSILON, CameraView, OrbitMode, blend};
