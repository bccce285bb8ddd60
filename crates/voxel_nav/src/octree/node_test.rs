use glam::DVec3;

use super::*;

fn root() -> (SpatialNode, NodeIdAllocator) {
  let mut ids = NodeIdAllocator::default();
  let node = SpatialNode::new(ids.next(), Bounds::new(DVec3::ZERO, DVec3::splat(2.0)));
  (node, ids)
}

/// A fresh node is an unblocked leaf.
#[test]
fn test_new_node_is_leaf() {
  let (node, _) = root();
  assert!(node.is_leaf());
  assert!(node.children().is_none());
  assert!(!node.is_broad_phase_blocked());
  assert_eq!(node.leaf_count(), 1);
}

/// Subdivide creates 8 children with increasing ids.
#[test]
fn test_subdivide_assigns_monotonic_ids() {
  let (mut node, mut ids) = root();
  assert!(node.subdivide(&mut ids));
  assert!(!node.is_leaf());

  let children = node.children().unwrap();
  for (octant, child) in children.iter().enumerate() {
    assert_eq!(child.id(), LeafId(octant as u32 + 1), "Child {} id", octant);
    assert_eq!(*child.bounds(), node.bounds().octant(octant as u8));
  }
  assert_eq!(ids.allocated(), 9);
}

/// Subdividing twice keeps the first set of children.
#[test]
fn test_subdivide_is_idempotent() {
  let (mut node, mut ids) = root();
  assert!(node.subdivide(&mut ids));
  assert!(!node.subdivide(&mut ids));
  assert_eq!(ids.allocated(), 9);
  assert_eq!(node.leaf_count(), 8);
}

/// Leaves are visited depth-first in octant order.
#[test]
fn test_for_each_leaf_depth_first() {
  let (mut node, mut ids) = root();
  node.subdivide(&mut ids);
  node.children_mut().unwrap()[0].subdivide(&mut ids);

  let mut visited = Vec::new();
  node.for_each_leaf(&mut |leaf| visited.push(leaf.id().raw()));

  // Grandchildren of octant 0 (ids 9..=16) come before octants 1..7 (ids 2..=8)
  let expected: Vec<u32> = (9..=16).chain(2..=8).collect();
  assert_eq!(visited, expected);
  assert_eq!(node.leaf_count(), 15);
}

/// Obstacles recorded on an internal node do not make it broad-phase blocked.
#[test]
fn test_internal_node_obstacle_is_not_leaf_blocking() {
  let (mut node, mut ids) = root();
  node.subdivide(&mut ids);
  node.record_obstacle(ObstacleId(0));
  assert_eq!(node.obstacles().len(), 1);
  assert!(!node.is_broad_phase_blocked());
}
