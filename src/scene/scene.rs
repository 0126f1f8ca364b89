use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::bounds::BoundingBox;
use crate::scene::node::Node;
use crate::scene::{NodeHandle, SceneHost};

/// Scene graph: node storage plus the list of top-level nodes the host draws.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeHandle, Node>,
    root_nodes: Vec<NodeHandle>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node as a new top-level object.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Inserts a node that is neither a root nor attached yet.
    pub fn create_node(&mut self, node: Node) -> NodeHandle {
        self.nodes.insert(node)
    }

    /// Re-parents `child` under `parent`, detaching it from wherever it was.
    /// Attaching a node to itself or to one of its descendants is ignored.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) -> bool {
        if child == parent
            || !self.nodes.contains_key(child)
            || !self.nodes.contains_key(parent)
            || self.is_ancestor(child, parent)
        {
            return false;
        }

        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        true
    }

    /// Unlinks `handle` from its parent or from the root list.
    fn detach(&mut self, handle: NodeHandle) {
        let Some(node) = self.nodes.get_mut(handle) else {
            return;
        };
        match node.parent.take() {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.children.retain(|&c| c != handle);
                }
            }
            None => self.root_nodes.retain(|&r| r != handle),
        }
    }

    fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(|n| n.parent);
        }
        false
    }

    /// Removes `root` and all its descendants. Returns how many nodes were dropped.
    pub fn remove_subtree(&mut self, root: NodeHandle) -> usize {
        if !self.nodes.contains_key(root) {
            return 0;
        }
        self.detach(root);

        let mut stack = vec![root];
        let mut removed = 0;
        while let Some(handle) = stack.pop() {
            if let Some(node) = self.nodes.remove(handle) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeHandle] {
        &self.root_nodes
    }

    /// Depth-first, pre-order walk of `root` and its descendants.
    pub fn traverse<'a, F>(&'a self, root: NodeHandle, mut visit: F)
    where
        F: FnMut(NodeHandle, &'a Node),
    {
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            visit(handle, node);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// First node named `name` under `root`, in traversal order.
    #[must_use]
    pub fn find_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let mut found = None;
        self.traverse(root, |handle, node| {
            if found.is_none() && node.name == name {
                found = Some(handle);
            }
        });
        found
    }

    /// Recomputes world matrices for every tree reachable from the roots.
    pub fn update_world_matrices(&mut self) {
        let mut stack: Vec<(NodeHandle, Affine3A)> = self
            .root_nodes
            .iter()
            .map(|&root| (root, Affine3A::IDENTITY))
            .collect();

        while let Some((handle, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };
            let world = parent_world * node.transform.local_matrix();
            node.transform.world_matrix = world;
            stack.extend(node.children.iter().map(|&c| (c, world)));
        }
    }

    /// World matrix of `handle` computed from the current local transforms,
    /// without relying on the cached value.
    #[must_use]
    pub fn compute_world_matrix(&self, handle: NodeHandle) -> Option<Affine3A> {
        let mut node = self.nodes.get(handle)?;
        let mut world = node.transform.local_matrix();
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent)?;
            world = node.transform.local_matrix() * world;
        }
        Some(world)
    }

    /// World-space bounds of every geometry node under `root`.
    #[must_use]
    pub fn world_bounds(&self, root: NodeHandle) -> BoundingBox {
        let Some(root_world) = self.compute_world_matrix(root) else {
            return BoundingBox::EMPTY;
        };

        let mut bounds = BoundingBox::EMPTY;
        let mut stack = vec![(root, root_world)];
        while let Some((handle, world)) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            if let Some(local) = node.local_bounds() {
                bounds = bounds.union(&local.transformed(&world));
            }
            for &child in &node.children {
                if let Some(c) = self.nodes.get(child) {
                    stack.push((child, world * c.transform.local_matrix()));
                }
            }
        }
        bounds
    }
}

impl SceneHost for Scene {
    fn add_object(&mut self, root: NodeHandle) -> bool {
        let Some(node) = self.nodes.get(root) else {
            return false;
        };
        if node.parent.is_some() || self.root_nodes.contains(&root) {
            return false;
        }
        self.root_nodes.push(root);
        true
    }

    fn remove_object(&mut self, root: NodeHandle) -> bool {
        self.remove_subtree(root) > 0
    }
}
