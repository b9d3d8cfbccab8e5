//! Occlusion and recovery scenario driven frame by frame through
//! `CameraCompositor::compute_view` with a scripted scene.

use std::cell::Cell;
use std::collections::HashMap;

use bevy::prelude::*;
use bevy_camera_compositor::{
  CameraCompositor, CameraTrack, CameraView, LosMode, Scene, SceneError, TrackDriver,
};

const DT: f32 = 1.0 / 60.0;

/// Scripted collaborator scene: fixed actors, one scripted raycast result.
#[derive(Default)]
struct ScriptedScene {
  actors: HashMap<Entity, Transform>,
  next_hit: Option<Vec3>,
  casts: Cell<usize>,
}

impl Scene for ScriptedScene {
  fn actor_transform(&self, actor: Entity) -> Option<Transform> {
    self.actors.get(&actor).copied()
  }

  fn bone_transform(&self, _actor: Entity, _bone: &str) -> Option<Transform> {
    None
  }

  fn camera_view(&self, _actor: Entity) -> Option<(Transform, f32)> {
    None
  }

  fn raycast(
    &self,
    _from: Vec3,
    _to: Vec3,
    _exclude: Option<Entity>,
    _mask: u32,
  ) -> Result<Option<Vec3>, SceneError> {
    self.casts.set(self.casts.get() + 1);
    Ok(self.next_hit)
  }
}

const LIVE_LOCATION: Vec3 = Vec3::new(10.0, 0.0, 0.0);
const IMPACT: Vec3 = Vec3::new(5.0, 0.0, 0.0);

fn setup() -> (ScriptedScene, CameraCompositor) {
  let mut scene = ScriptedScene::default();
  let mut world = World::new();
  let owner = world.spawn_empty().id();
  scene.actors.insert(owner, Transform::IDENTITY);

  let mut compositor = CameraCompositor {
    owner: Some(owner),
    ..default()
  };
  compositor.primary = CameraTrack {
    driver: TrackDriver::DataDriven,
    location: LIVE_LOCATION,
    rotation: Transform::from_translation(LIVE_LOCATION)
      .looking_at(Vec3::ZERO, Vec3::Y)
      .rotation,
    fov: 70.0,
    alpha: 1.0,
    ..default()
  };
  compositor.los.mode = LosMode::KeepLosNoDot;
  compositor.smooth_return.enabled = true;
  compositor.smooth_return.speed = 6.0;
  compositor.smooth_return.completion_threshold_sq = 0.01;
  (scene, compositor)
}

fn base_view() -> CameraView {
  CameraView::new(Vec3::ZERO, Quat::IDENTITY, 90.0)
}

#[test]
fn block_relocate_clear_and_ease_back() {
  let (mut scene, mut compositor) = setup();

  // Frame 1: blocked. The camera moves to the impact point and the
  // recovery state latches there.
  scene.next_hit = Some(IMPACT);
  let view = compositor.compute_view(DT, base_view(), &scene).unwrap();
  assert_eq!(view.location, IMPACT);
  assert!(compositor.los.is_blocked);
  assert_eq!(compositor.los.stored_fov, 70.0);
  assert!(compositor.smooth_return.was_blocked_recently);
  assert_eq!(compositor.smooth_return.previous_location, IMPACT);

  // Frames 2-4: still blocked. The stored FOV must not re-latch even as the
  // live track FOV changes.
  compositor.primary.fov = 80.0;
  for _ in 0..3 {
    let view = compositor.compute_view(DT, base_view(), &scene).unwrap();
    assert_eq!(view.location, IMPACT);
    assert_eq!(compositor.los.stored_fov, 70.0);
  }

  // Obstruction clears: the camera eases back instead of popping.
  scene.next_hit = None;
  let view = compositor.compute_view(DT, base_view(), &scene).unwrap();
  assert!(!compositor.los.is_blocked);
  assert!(compositor.smooth_return.was_blocked_recently);
  assert!(view.location.x > IMPACT.x);
  assert!(view.location.x < LIVE_LOCATION.x);

  // Recovery is monotone toward the live location and eventually converges,
  // clearing the flag and handing the view back untouched.
  let mut last_x = view.location.x;
  let mut converged = false;
  for _ in 0..600 {
    let view = compositor.compute_view(DT, base_view(), &scene).unwrap();
    if !compositor.smooth_return.was_blocked_recently {
      assert_eq!(view.location, LIVE_LOCATION);
      converged = true;
      break;
    }
    assert!(view.location.x >= last_x);
    last_x = view.location.x;
  }
  assert!(converged, "smooth return never converged");
}

#[test]
fn dolly_zoom_on_los_widens_fov_while_blocked() {
  let (mut scene, mut compositor) = setup();
  compositor.los.use_dolly_zoom = true;

  scene.next_hit = Some(IMPACT);
  let view = compositor.compute_view(DT, base_view(), &scene).unwrap();

  // Reference distance 10 (owner to desired), current 5 (owner to impact):
  // moving in widens the FOV to preserve framing.
  let expected = bevy_camera_compositor::compute_fov_clamped(10.0, 70.0, 5.0);
  assert!((view.fov - expected).abs() < 1e-4);
  assert!(view.fov > 70.0);
  assert_eq!(view.location, IMPACT);
}

#[test]
fn a_new_block_interrupts_the_recovery() {
  let (mut scene, mut compositor) = setup();

  scene.next_hit = Some(IMPACT);
  compositor.compute_view(DT, base_view(), &scene).unwrap();
  scene.next_hit = None;
  compositor.compute_view(DT, base_view(), &scene).unwrap();
  assert!(compositor.smooth_return.was_blocked_recently);

  // Blocked again mid-recovery: the recovery anchor snaps to the new
  // impact point.
  let closer = Vec3::new(3.0, 0.0, 0.0);
  scene.next_hit = Some(closer);
  let view = compositor.compute_view(DT, base_view(), &scene).unwrap();
  assert_eq!(view.location, closer);
  assert!(compositor.los.is_blocked);
  assert_eq!(compositor.smooth_return.previous_location, closer);
}
