//! View compositing for actor-following cameras.
//!
//! Once per frame the compositor takes the camera's live pose as the base
//! view, blends up to two virtual tracks onto it, then enforces line of
//! sight to the tracked subject and eases back out of any past occlusion.
//!
//! # Usage
//!
//! ```ignore
//! use bevy_camera_compositor::{CameraCompositor, CameraCompositorPlugin, TrackDriver};
//!
//! app.add_plugins(CameraCompositorPlugin);
//!
//! // Attach the compositor to your game camera
//! commands.spawn((
//!     Camera3d::default(),
//!     CameraCompositor {
//!         owner: Some(player),
//!         ..default()
//!     },
//! ));
//! ```
//!
//! # Pipeline
//!
//! 1. **Track resolution**: each active track refreshes its pose from its
//!    driver (external data, another camera actor, or locator/aim targets).
//! 2. **Blending**: the primary track blends onto the base view, the
//!    secondary onto that already-blended result.
//! 3. **Line of sight**: a raycast from the aim point to the blended
//!    location pulls the camera in front of any obstruction.
//! 4. **Smooth return**: after the obstruction clears, the location eases
//!    back to the live position instead of popping.

mod components;
mod frame;
mod systems;

use bevy::prelude::*;
use bevy::transform::TransformSystems;
pub use components::CameraCompositor;
pub use systems::{WorldScene, compose_camera_views};

/// System set for camera view compositing.
///
/// Runs in `PostUpdate` after `TransformSystems::Propagate`. Schedule camera
/// follow systems to run **before** this set so the compositor sees the
/// frame's final base pose.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CameraCompositorSet;

/// Plugin wiring the compositor into the frame.
///
/// Add after `DefaultPlugins` (or `MinimalPlugins` for headless use) and
/// attach [`CameraCompositor`] to any perspective camera.
pub struct CameraCompositorPlugin;

impl Plugin for CameraCompositorPlugin {
  fn build(&self, app: &mut App) {
    app.configure_sets(
      PostUpdate,
      CameraCompositorSet.after(TransformSystems::Propagate),
    );

    app.add_systems(
      PostUpdate,
      compose_camera_views.in_set(CameraCompositorSet),
    );
  }
}
