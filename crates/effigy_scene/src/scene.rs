//! Scene arena and traversal

use crate::material::Material;
use crate::mesh::{Mesh, Skin};
use crate::node::SceneNode;

/// A loaded scene graph
///
/// Nodes live in a flat arena and reference each other by index. `roots`
/// lists the entry points of the hierarchy; traversal only visits nodes
/// reachable from them, so orphan nodes in the arena are ignored.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// All nodes in the file
    pub nodes: Vec<SceneNode>,
    /// Root node indices
    pub roots: Vec<usize>,
    /// All meshes, referenced by node mesh indices
    pub meshes: Vec<Mesh>,
    /// All materials, referenced by primitive material indices
    pub materials: Vec<Material>,
    /// All skins, referenced by node skin indices
    pub skins: Vec<Skin>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the arena, returning its index
    pub fn add_node(&mut self, node: SceneNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Mark an existing node as a hierarchy root
    pub fn add_root(&mut self, index: usize) {
        self.roots.push(index);
    }

    pub fn node(&self, index: usize) -> Option<&SceneNode> {
        self.nodes.get(index)
    }

    pub fn node_mut(&mut self, index: usize) -> Option<&mut SceneNode> {
        self.nodes.get_mut(index)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Visit every reachable node in pre-order (parent before children)
    pub fn traverse(&self, mut f: impl FnMut(usize, &SceneNode)) {
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            let node = match self.nodes.get(index) {
                Some(node) => node,
                None => continue,
            };
            f(index, node);
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
    }

    /// Visit every reachable node in pre-order, mutably
    pub fn traverse_mut(&mut self, mut f: impl FnMut(usize, &mut SceneNode)) {
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            let node = match self.nodes.get_mut(index) {
                Some(node) => node,
                None => continue,
            };
            f(index, node);
            for &child in self.nodes[index].children.iter().rev() {
                stack.push(child);
            }
        }
    }

    /// Find the first reachable node with the given name
    pub fn find_node(&self, name: &str) -> Option<usize> {
        let mut found = None;
        self.traverse(|index, node| {
            if found.is_none() && node.name.as_deref() == Some(name) {
                found = Some(index);
            }
        });
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scene() -> Scene {
        // root
        //  ├─ arm
        //  │   └─ hand
        //  └─ leg
        let mut scene = Scene::new();
        let root = scene.add_node(SceneNode::with_name("root"));
        let arm = scene.add_node(SceneNode::with_name("arm"));
        let hand = scene.add_node(SceneNode::with_name("hand"));
        let leg = scene.add_node(SceneNode::with_name("leg"));
        scene.nodes[root].children = vec![arm, leg];
        scene.nodes[arm].children = vec![hand];
        scene.add_root(root);
        scene
    }

    #[test]
    fn test_traverse_preorder() {
        let scene = sample_scene();
        let mut visited = Vec::new();
        scene.traverse(|_, node| visited.push(node.name.clone().unwrap()));
        assert_eq!(visited, ["root", "arm", "hand", "leg"]);
    }

    #[test]
    fn test_traverse_skips_orphans() {
        let mut scene = sample_scene();
        scene.add_node(SceneNode::with_name("orphan"));
        let mut count = 0;
        scene.traverse(|_, _| count += 1);
        assert_eq!(count, 4);
        assert_eq!(scene.node_count(), 5);
    }

    #[test]
    fn test_traverse_mut_reaches_all() {
        let mut scene = sample_scene();
        scene.traverse_mut(|_, node| node.cast_shadow = true);
        assert!(scene.nodes.iter().all(|n| n.cast_shadow));
    }

    #[test]
    fn test_find_node() {
        let scene = sample_scene();
        assert_eq!(scene.find_node("hand"), Some(2));
        assert_eq!(scene.find_node("tail"), None);
    }

    #[test]
    fn test_node_mut() {
        let mut scene = sample_scene();
        let arm = scene.find_node("arm").unwrap();

        scene.node_mut(arm).unwrap().visible = false;
        assert!(!scene.node(arm).unwrap().visible);

        assert!(scene.node_mut(99).is_none());
    }
}
