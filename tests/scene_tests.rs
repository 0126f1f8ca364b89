//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: add/create/remove nodes, attach hierarchy, cycle rejection
//! - Traversal order and name lookup
//! - World matrices and world-space bounds
//! - SceneHost add_object / remove_object contract
//! - BoundingBox and Transform helpers

use glam::{Affine3A, Quat, Vec3};

use scrollstage::scene::{BoundingBox, Node, NodeKind, Scene, SceneHost, Transform};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

fn mesh(name: &str, size: f32) -> Node {
    Node::with_kind(
        name,
        NodeKind::Mesh {
            local_bounds: Some(BoundingBox::cube(size)),
        },
    )
}

// ============================================================================
// Node Creation & Removal
// ============================================================================

#[test]
fn add_node_becomes_root() {
    let mut scene = Scene::new();
    let handle = scene.add_node(Node::new("a"));
    assert!(scene.roots().contains(&handle));
    assert_eq!(scene.node_count(), 1);
}

#[test]
fn create_node_is_detached() {
    let mut scene = Scene::new();
    let handle = scene.create_node(Node::new("a"));
    assert!(scene.contains(handle));
    assert!(scene.roots().is_empty());
}

#[test]
fn remove_subtree_drops_descendants() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    let child = scene.create_node(Node::new("child"));
    let grandchild = scene.create_node(Node::new("grandchild"));
    scene.attach(child, root);
    scene.attach(grandchild, child);

    assert_eq!(scene.remove_subtree(root), 3);
    assert_eq!(scene.node_count(), 0);
    assert!(scene.roots().is_empty());
    assert_eq!(scene.remove_subtree(root), 0);
}

#[test]
fn remove_child_unlinks_from_parent() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    let child = scene.create_node(Node::new("child"));
    scene.attach(child, root);

    scene.remove_subtree(child);
    assert!(scene.get_node(root).unwrap().children().is_empty());
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn attach_moves_root_under_parent() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("a"));
    let b = scene.add_node(Node::new("b"));

    assert!(scene.attach(b, a));
    assert_eq!(scene.roots(), &[a]);
    assert_eq!(scene.get_node(b).unwrap().parent(), Some(a));
    assert_eq!(scene.get_node(a).unwrap().children(), &[b]);
}

#[test]
fn reattach_changes_parent() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("a"));
    let b = scene.add_node(Node::new("b"));
    let c = scene.create_node(Node::new("c"));

    scene.attach(c, a);
    scene.attach(c, b);
    assert!(scene.get_node(a).unwrap().children().is_empty());
    assert_eq!(scene.get_node(b).unwrap().children(), &[c]);
}

#[test]
fn attach_rejects_self_and_cycles() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("a"));
    let b = scene.create_node(Node::new("b"));
    scene.attach(b, a);

    assert!(!scene.attach(a, a));
    assert!(!scene.attach(a, b));
    assert_eq!(scene.get_node(a).unwrap().parent(), None);
}

#[test]
fn traverse_is_depth_first_pre_order() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    let left = scene.create_node(Node::new("left"));
    let left_leaf = scene.create_node(Node::new("left_leaf"));
    let right = scene.create_node(Node::new("right"));
    scene.attach(left, root);
    scene.attach(left_leaf, left);
    scene.attach(right, root);

    let mut names = Vec::new();
    scene.traverse(root, |_, node| names.push(node.name.clone()));
    assert_eq!(names, ["root", "left", "left_leaf", "right"]);
}

#[test]
fn find_by_name_returns_first_match() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    let first = scene.create_node(Node::new("door"));
    let second = scene.create_node(Node::new("door"));
    scene.attach(first, root);
    scene.attach(second, root);

    assert_eq!(scene.find_by_name(root, "door"), Some(first));
    assert_eq!(scene.find_by_name(root, "roof"), None);
}

// ============================================================================
// World Matrices & Bounds
// ============================================================================

#[test]
fn world_matrices_compose_parent_transforms() {
    let mut scene = Scene::new();
    let mut parent = Node::new("parent").with_position(Vec3::new(10.0, 0.0, 0.0));
    parent.transform.set_uniform_scale(2.0);
    let parent = scene.add_node(parent);
    let child = scene.create_node(Node::new("child").with_position(Vec3::new(1.0, 0.0, 0.0)));
    scene.attach(child, parent);

    scene.update_world_matrices();
    let world = scene.get_node(child).unwrap().world_matrix().translation;
    assert!(approx_vec3(world.into(), Vec3::new(12.0, 0.0, 0.0)), "got {world:?}");

    let computed = scene.compute_world_matrix(child).unwrap();
    assert!(approx_vec3(computed.translation.into(), Vec3::new(12.0, 0.0, 0.0)));
}

#[test]
fn world_bounds_union_meshes_in_world_space() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    let a = scene.create_node(mesh("a", 2.0).with_position(Vec3::new(-5.0, 0.0, 0.0)));
    let b = scene.create_node(mesh("b", 2.0).with_position(Vec3::new(5.0, 0.0, 0.0)));
    scene.attach(a, root);
    scene.attach(b, root);

    let bounds = scene.world_bounds(root);
    assert!(approx_vec3(bounds.min, Vec3::new(-6.0, -1.0, -1.0)));
    assert!(approx_vec3(bounds.max, Vec3::new(6.0, 1.0, 1.0)));
    assert!(approx(bounds.max_extent(), 12.0));
}

#[test]
fn world_bounds_of_empty_group_is_empty() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    let bounds = scene.world_bounds(root);
    assert!(bounds.is_empty());
    assert_eq!(bounds.size(), Vec3::ZERO);
}

// ============================================================================
// SceneHost
// ============================================================================

#[test]
fn host_add_object_only_accepts_detached_trees() {
    let mut scene = Scene::new();
    let model = scene.create_node(Node::new("model_root"));
    let part = scene.create_node(Node::new("part"));
    scene.attach(part, model);

    assert!(scene.add_object(model));
    assert!(!scene.add_object(model));
    assert!(!scene.add_object(part));
    assert_eq!(scene.roots(), &[model]);
}

#[test]
fn host_remove_object_is_idempotent() {
    let mut scene = Scene::new();
    let model = scene.add_node(Node::new("model_root"));

    assert!(scene.remove_object(model));
    assert!(!scene.remove_object(model));
}

// ============================================================================
// BoundingBox / Transform
// ============================================================================

#[test]
fn bounding_box_union_ignores_empty() {
    let a = BoundingBox::new(Vec3::ZERO, Vec3::ONE);
    assert_eq!(a.union(&BoundingBox::EMPTY), a);
    assert_eq!(BoundingBox::EMPTY.union(&a), a);
}

#[test]
fn bounding_box_transformed_by_rotation() {
    let b = BoundingBox::new(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
    let rotated = b.transformed(&Affine3A::from_rotation_z(std::f32::consts::FRAC_PI_2));
    assert!(approx(rotated.size().x, 1.0));
    assert!(approx(rotated.size().y, 2.0));
}

#[test]
fn look_at_points_negative_z_at_target() {
    let mut transform = Transform::from_translation(Vec3::new(20.0, 20.0, 20.0));
    transform.look_at(Vec3::ZERO, Vec3::Y);

    let forward = transform.rotation * Vec3::NEG_Z;
    let expected = (-transform.position).normalize();
    assert!(approx_vec3(forward, expected), "forward {forward:?}");
}

#[test]
fn look_at_degenerate_keeps_rotation() {
    let mut transform = Transform::from_translation(Vec3::ZERO);
    transform.look_at(Vec3::ZERO, Vec3::Y);
    assert_eq!(transform.rotation, Quat::IDENTITY);
}

#[test]
fn placeholder_has_cube_bounds() {
    let node = Node::with_kind(
        "placeholder",
        NodeKind::Placeholder {
            size: 1.0,
            color: Vec3::X,
        },
    );
    let bounds = node.local_bounds().unwrap();
    assert!(approx_vec3(bounds.size(), Vec3::ONE));
}
