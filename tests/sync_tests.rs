//! Scroll Sync Tests
//!
//! Tests for:
//! - initialize: shared duration, one handle per clip, NoAnimations
//! - on_progress: time mapping, clamping, idempotence, reverse scrolling
//! - Short-clip policies (clamp and loop)
//! - attach / teardown lifecycle through the scroll-trigger registry
//! - apply: dirty tracking and scene writes

use std::sync::Arc;

use glam::Vec3;

use scrollstage::animation::{AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta};
use scrollstage::errors::StageError;
use scrollstage::scene::{Node, Scene, SceneHost};
use scrollstage::scroll::{ScrollRegion, ScrollTriggers, TriggerConfig};
use scrollstage::sync::{ScrollSync, ShortClipPolicy};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn assert_times(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len(), "handle count");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(approx(*a, *e), "handle {i}: expected {e}, got {a} (all: {actual:?})");
    }
}

/// Clip moving node `node` along +X by one unit per second.
fn clip(name: &str, node: &str, duration: f32) -> Arc<AnimationClip> {
    Arc::new(AnimationClip::new(
        name,
        vec![Track {
            meta: TrackMeta {
                node_name: node.to_string(),
                target: TargetPath::Translation,
            },
            data: TrackData::Vector3(KeyframeTrack::new(
                vec![0.0, duration],
                vec![Vec3::ZERO, Vec3::new(duration, 0.0, 0.0)],
                InterpolationMode::Linear,
            )),
        }],
    ))
}

fn synced(durations: &[f32]) -> ScrollSync {
    let clips: Vec<_> = durations
        .iter()
        .enumerate()
        .map(|(i, &d)| clip(&format!("clip_{i}"), "part", d))
        .collect();
    ScrollSync::initialize(&clips, ShortClipPolicy::Clamp).unwrap()
}

/// Triggers over a 4-screen page scrolled in an 800px viewport, so progress
/// equals `scroll_y / 2400`.
fn page_triggers() -> (ScrollTriggers, scrollstage::scroll::RegionKey) {
    let mut triggers = ScrollTriggers::new(800.0);
    let region = triggers.mount_region(ScrollRegion::new("page", 0.0, 3200.0));
    (triggers, region)
}

// ============================================================================
// initialize
// ============================================================================

#[test]
fn initialize_empty_fails_with_no_animations() {
    let err = ScrollSync::initialize(&[], ShortClipPolicy::Clamp).unwrap_err();
    assert!(matches!(err, StageError::NoAnimations));
    assert!(err.is_recoverable());
}

#[test]
fn initialize_uses_longest_clip() {
    let sync = synced(&[1.0, 4.0, 2.5]);
    assert!(approx(sync.shared_duration(), 4.0));
    assert_eq!(sync.handle_count(), 3);
    assert_times(&sync.applied_times(), &[0.0, 0.0, 0.0]);
}

#[test]
fn empty_state_ignores_progress() {
    let mut sync = ScrollSync::empty();
    sync.on_progress(0.7);

    assert_eq!(sync.handle_count(), 0);
    assert!(approx(sync.progress(), 0.0));
    assert!(approx(sync.shared_time(), 0.0));
}

// ============================================================================
// on_progress
// ============================================================================

#[test]
fn progress_steps_over_four_seconds() {
    let mut sync = synced(&[4.0]);
    for (progress, expected) in [(0.0, 0.0), (0.25, 1.0), (0.5, 2.0), (0.75, 3.0), (1.0, 4.0)] {
        sync.on_progress(progress);
        assert_times(&sync.applied_times(), &[expected]);
        assert!(approx(sync.shared_time(), expected));
    }
}

#[test]
fn reverse_scroll_plays_backwards() {
    let mut sync = synced(&[4.0]);
    for (progress, expected) in [(1.0, 4.0), (0.5, 2.0), (0.0, 0.0)] {
        sync.on_progress(progress);
        assert_times(&sync.applied_times(), &[expected]);
    }
}

#[test]
fn mixed_durations_clamp_short_clips() {
    let mut sync = synced(&[2.0, 4.0]);

    sync.on_progress(1.0);
    assert_times(&sync.applied_times(), &[2.0, 4.0]);

    sync.on_progress(0.25);
    assert_times(&sync.applied_times(), &[1.0, 1.0]);
}

#[test]
fn applied_time_is_min_of_shared_time_and_clip_duration() {
    let durations = [0.5, 1.0, 3.0, 6.0];
    let mut sync = synced(&durations);
    let shared = 6.0;

    for i in 0..=20 {
        let progress = i as f32 / 20.0;
        sync.on_progress(progress);
        let expected: Vec<f32> = durations
            .iter()
            .map(|&d| (progress * shared).min(d))
            .collect();
        assert_times(&sync.applied_times(), &expected);
    }
}

#[test]
fn on_progress_is_idempotent() {
    let mut sync = synced(&[2.0, 3.0]);

    sync.on_progress(0.4);
    let first = sync.applied_times();
    sync.on_progress(0.4);
    assert_eq!(first, sync.applied_times());
}

#[test]
fn progress_is_clamped_and_nan_is_zero() {
    let mut sync = synced(&[4.0]);

    sync.on_progress(1.5);
    assert!(approx(sync.progress(), 1.0));
    assert_times(&sync.applied_times(), &[4.0]);

    sync.on_progress(-0.3);
    assert!(approx(sync.progress(), 0.0));
    assert_times(&sync.applied_times(), &[0.0]);

    sync.on_progress(0.5);
    sync.on_progress(f32::NAN);
    assert!(approx(sync.progress(), 0.0));
    assert_times(&sync.applied_times(), &[0.0]);
}

#[test]
fn loop_policy_wraps_short_clips() {
    let clips = vec![clip("short", "a", 1.5), clip("long", "b", 4.0)];
    let mut sync = ScrollSync::initialize(&clips, ShortClipPolicy::Loop).unwrap();

    sync.on_progress(0.5);
    assert_times(&sync.applied_times(), &[0.5, 2.0]);

    sync.on_progress(1.0);
    assert_times(&sync.applied_times(), &[1.0, 4.0]);
}

#[test]
fn zero_length_clips_stay_at_zero() {
    let mut sync = synced(&[0.0, 0.0]);
    assert!(approx(sync.shared_duration(), 0.0));

    sync.on_progress(0.8);
    assert_times(&sync.applied_times(), &[0.0, 0.0]);
}

// ============================================================================
// attach
// ============================================================================

#[test]
fn attach_syncs_to_current_scroll_immediately() {
    let (mut triggers, region) = page_triggers();
    triggers.set_scroll(1200.0);

    let shared = synced(&[4.0]).into_shared();
    let handle = ScrollSync::attach(&shared, &mut triggers, region, TriggerConfig::default()).unwrap();

    assert!(triggers.is_registered(handle));
    let sync = shared.lock();
    assert!(sync.is_attached(&triggers));
    assert!(approx(sync.progress(), 0.5));
    assert_times(&sync.applied_times(), &[2.0]);
}

#[test]
fn attached_listener_follows_scroll_both_ways() {
    let (mut triggers, region) = page_triggers();
    let shared = synced(&[2.0, 4.0]).into_shared();
    ScrollSync::attach(&shared, &mut triggers, region, TriggerConfig::default()).unwrap();

    triggers.set_scroll(2400.0);
    assert_times(&shared.lock().applied_times(), &[2.0, 4.0]);

    triggers.set_scroll(600.0);
    assert_times(&shared.lock().applied_times(), &[1.0, 1.0]);

    triggers.set_scroll(0.0);
    assert_times(&shared.lock().applied_times(), &[0.0, 0.0]);
}

#[test]
fn attach_to_missing_region_is_retryable() {
    let (mut triggers, region) = page_triggers();
    triggers.unmount_region(region);

    let shared = synced(&[4.0]).into_shared();
    let err = ScrollSync::attach(&shared, &mut triggers, region, TriggerConfig::default()).unwrap_err();
    assert!(err.is_retryable());
    assert!(!shared.lock().is_attached(&triggers));

    let region = triggers.mount_region(ScrollRegion::new("page", 0.0, 3200.0));
    ScrollSync::attach(&shared, &mut triggers, region, TriggerConfig::default()).unwrap();
    assert!(shared.lock().is_attached(&triggers));
}

#[test]
fn unmounting_the_region_detaches_the_listener() {
    let (mut triggers, region) = page_triggers();
    let shared = synced(&[4.0]).into_shared();
    ScrollSync::attach(&shared, &mut triggers, region, TriggerConfig::default()).unwrap();
    assert!(shared.lock().is_attached(&triggers));

    assert!(triggers.unmount_region(region));
    assert!(!shared.lock().is_attached(&triggers));

    // Reattaching to a fresh region works without a teardown first.
    let region = triggers.mount_region(ScrollRegion::new("page", 0.0, 3200.0));
    ScrollSync::attach(&shared, &mut triggers, region, TriggerConfig::default()).unwrap();
    assert!(shared.lock().is_attached(&triggers));
    assert_eq!(triggers.listener_count(), 1);
}

#[test]
fn reattach_replaces_previous_listener() {
    let (mut triggers, region) = page_triggers();
    let shared = synced(&[4.0]).into_shared();

    let first = ScrollSync::attach(&shared, &mut triggers, region, TriggerConfig::default()).unwrap();
    let second = ScrollSync::attach(&shared, &mut triggers, region, TriggerConfig::default()).unwrap();

    assert!(!triggers.is_registered(first));
    assert!(triggers.is_registered(second));
    assert_eq!(triggers.listener_count(), 1);
}

#[test]
fn dropped_state_turns_listener_into_no_op() {
    let (mut triggers, region) = page_triggers();
    let shared = synced(&[4.0]).into_shared();
    ScrollSync::attach(&shared, &mut triggers, region, TriggerConfig::default()).unwrap();

    drop(shared);
    triggers.set_scroll(1800.0);
    assert_eq!(triggers.listener_count(), 1);
}

// ============================================================================
// teardown
// ============================================================================

#[test]
fn teardown_releases_listener_handles_and_model() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("model_root"));
    let part = scene.create_node(Node::new("part"));
    scene.attach(part, root);

    let (mut triggers, region) = page_triggers();
    let shared = synced(&[4.0]).into_shared();
    shared.lock().bind(&scene, root);
    let handle = ScrollSync::attach(&shared, &mut triggers, region, TriggerConfig::default()).unwrap();

    let released = shared.lock().teardown(Some(&mut triggers), &mut scene);
    assert!(released);
    assert!(!triggers.is_registered(handle));
    assert!(!scene.contains(root));
    assert!(!scene.contains(part));

    let sync = shared.lock();
    assert_eq!(sync.handle_count(), 0);
    assert!(!sync.is_attached(&triggers));
    assert!(sync.model_root().is_none());
}

#[test]
fn double_teardown_is_safe_and_later_scroll_mutates_nothing() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("model_root"));
    let bystander = scene.add_node(Node::new("camera"));

    let (mut triggers, region) = page_triggers();
    let shared = synced(&[4.0]).into_shared();
    shared.lock().bind(&scene, root);
    ScrollSync::attach(&shared, &mut triggers, region, TriggerConfig::default()).unwrap();

    assert!(shared.lock().teardown(Some(&mut triggers), &mut scene));
    assert!(!shared.lock().teardown(Some(&mut triggers), &mut scene));

    triggers.set_scroll(2000.0);
    shared.lock().on_progress(0.9);

    let sync = shared.lock();
    assert!(sync.applied_times().is_empty());
    assert!(approx(sync.shared_time(), 0.0));
    assert!(approx(sync.progress(), 0.0));
    assert!(scene.contains(bystander));
    assert_eq!(scene.roots(), &[bystander]);
}

#[test]
fn teardown_without_registry_still_releases_model() {
    struct CountingHost {
        removed: usize,
    }
    impl SceneHost for CountingHost {
        fn add_object(&mut self, _root: scrollstage::scene::NodeHandle) -> bool {
            true
        }
        fn remove_object(&mut self, _root: scrollstage::scene::NodeHandle) -> bool {
            self.removed += 1;
            true
        }
    }

    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("model_root"));
    let mut sync = synced(&[1.0]);
    sync.bind(&scene, root);

    let mut host = CountingHost { removed: 0 };
    assert!(sync.teardown(None, &mut host));
    assert!(!sync.teardown(None, &mut host));
    assert_eq!(host.removed, 1);
}

// ============================================================================
// bind / apply
// ============================================================================

#[test]
fn apply_writes_pose_only_when_progress_moves() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("model_root"));
    let part = scene.create_node(Node::new("part"));
    scene.attach(part, root);

    let mut sync = synced(&[4.0]);
    assert_eq!(sync.bind(&scene, root), 1);

    // First apply poses the model at t = 0.
    assert!(sync.apply(&mut scene));
    assert!(!sync.apply(&mut scene));

    sync.on_progress(0.5);
    assert!(sync.apply(&mut scene));
    let x = scene.get_node(part).unwrap().transform.position.x;
    assert!(approx(x, 2.0), "got {x}");

    sync.on_progress(0.5);
    assert!(!sync.apply(&mut scene));
}
