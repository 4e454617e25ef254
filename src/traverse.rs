//! Bounded breadth-first walks over host nodes.
//!
//! Every downward walk goes through [`BoundedWalk`] so node, depth and
//! fan-out caps are parameters rather than constants scattered through the
//! callers. The walk is lazy and finite; it cannot be restarted.

use crate::host::{soft, AccessibleNode};
use std::collections::{HashSet, VecDeque};

/// Caps for one walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Nodes yielded (or accepted, see [`BoundedWalk::accepting`])
    pub max_nodes: usize,
    /// Deepest level yielded; `None` is unbounded
    pub max_depth: Option<usize>,
    /// Children read per node
    pub max_siblings: usize,
}

impl Bounds {
    pub fn new(max_nodes: usize, max_depth: Option<usize>, max_siblings: usize) -> Self {
        Self {
            max_nodes,
            max_depth,
            max_siblings,
        }
    }
}

/// Lazy breadth-first iterator yielding `(node, depth)`
pub struct BoundedWalk<N: AccessibleNode, F = fn(&N) -> bool> {
    queue: VecDeque<(N, usize)>,
    seen: HashSet<N>,
    bounds: Bounds,
    counted: usize,
    accept: F,
    capped: bool,
}

fn accept_all<N>(_: &N) -> bool {
    true
}

impl<N: AccessibleNode> BoundedWalk<N> {
    /// Walk including `root` itself at depth 0
    pub fn from_root(root: &N, bounds: Bounds) -> Self {
        let mut walk = Self::empty(bounds, accept_all::<N> as fn(&N) -> bool);
        walk.push(root.clone(), 0);
        walk
    }

    /// Walk the descendants of `root`; direct children are depth 1
    pub fn descendants(root: &N, bounds: Bounds) -> Self {
        let mut walk = Self::empty(bounds, accept_all::<N> as fn(&N) -> bool);
        walk.seen.insert(root.clone());
        walk.enqueue_children(root, 0);
        walk
    }
}

impl<N: AccessibleNode, F: FnMut(&N) -> bool> BoundedWalk<N, F> {
    fn empty(bounds: Bounds, accept: F) -> Self {
        Self {
            queue: VecDeque::new(),
            seen: HashSet::new(),
            bounds,
            counted: 0,
            accept,
            capped: false,
        }
    }

    /// Descendant walk that yields and counts only nodes passing `accept`
    ///
    /// Rejected nodes are still descended into.
    pub fn accepting(root: &N, bounds: Bounds, accept: F) -> Self {
        let mut walk = Self::empty(bounds, accept);
        walk.seen.insert(root.clone());
        walk.enqueue_children(root, 0);
        walk
    }

    /// The node cap stopped the walk while an acceptable node was still pending
    pub fn limit_reached(&self) -> bool {
        self.capped
    }

    // Drain the queue until a pending node would have been yielded
    fn withheld(&mut self) -> bool {
        while let Some((node, depth)) = self.queue.pop_front() {
            if (self.accept)(&node) {
                return true;
            }
            self.enqueue_children(&node, depth);
        }
        false
    }

    fn push(&mut self, node: N, depth: usize) {
        if self.seen.insert(node.clone()) {
            self.queue.push_back((node, depth));
        }
    }

    fn enqueue_children(&mut self, node: &N, depth: usize) {
        let child_depth = depth + 1;
        if self.bounds.max_depth.is_some_and(|max| child_depth > max) {
            return;
        }
        let mut child = soft("first_child", node.first_child());
        let mut read = 0;
        while let Some(c) = child {
            if read >= self.bounds.max_siblings {
                break;
            }
            read += 1;
            child = soft("next_sibling", c.next_sibling());
            self.push(c, child_depth);
        }
    }
}

impl<N: AccessibleNode, F: FnMut(&N) -> bool> Iterator for BoundedWalk<N, F> {
    type Item = (N, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.counted >= self.bounds.max_nodes {
                self.capped = self.withheld();
                self.queue.clear();
                return None;
            }
            let (node, depth) = self.queue.pop_front()?;
            self.enqueue_children(&node, depth);
            if (self.accept)(&node) {
                self.counted += 1;
                return Some((node, depth));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::tag_of;
    use crate::host::memory::{Accessor, MemoryNode, MemoryTree, NodeSpec, TreeBuilder};

    fn wide_tree(children: usize) -> MemoryTree {
        let mut b = TreeBuilder::new();
        let root = b.root(NodeSpec::tagged("ul"));
        for i in 0..children {
            let li = b.child(root, NodeSpec::tagged("li").key(&format!("li{i}")));
            b.child(li, NodeSpec::tagged("span"));
        }
        b.build()
    }

    #[test]
    fn test_breadth_first_with_depths() {
        let tree = wide_tree(2);
        let root = tree.root().unwrap();
        let seen: Vec<(String, usize)> = BoundedWalk::from_root(&root, Bounds::new(10, None, 50))
            .map(|(n, d)| (tag_of(&n), d))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("ul".to_string(), 0),
                ("li".to_string(), 1),
                ("li".to_string(), 1),
                ("span".to_string(), 2),
                ("span".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_node_cap_sets_limit_flag() {
        let tree = wide_tree(5);
        let root = tree.root().unwrap();
        let mut walk = BoundedWalk::descendants(&root, Bounds::new(3, None, 50));
        assert_eq!(walk.by_ref().count(), 3);
        assert!(walk.limit_reached());

        let mut walk = BoundedWalk::descendants(&root, Bounds::new(100, None, 50));
        assert_eq!(walk.by_ref().count(), 10);
        assert!(!walk.limit_reached());
    }

    #[test]
    fn test_limit_flag_ignores_rejected_pending_nodes() {
        let mut b = TreeBuilder::new();
        let root = b.root(NodeSpec::tagged("ul"));
        b.child(root, NodeSpec::tagged("li"));
        b.child(root, NodeSpec::tagged("li"));
        let wrapper = b.child(root, NodeSpec::untagged());
        b.child(wrapper, NodeSpec::untagged());
        let tree = b.build();
        let root = tree.root().unwrap();
        let tagged = |n: &MemoryNode<'_>| !tag_of(n).is_empty();

        let mut walk = BoundedWalk::accepting(&root, Bounds::new(2, None, 50), tagged);
        assert_eq!(walk.by_ref().count(), 2);
        assert!(!walk.limit_reached());

        let mut b = TreeBuilder::new();
        let root = b.root(NodeSpec::tagged("ul"));
        b.child(root, NodeSpec::tagged("li"));
        b.child(root, NodeSpec::tagged("li"));
        let wrapper = b.child(root, NodeSpec::untagged());
        b.child(wrapper, NodeSpec::tagged("li"));
        let tree = b.build();
        let root = tree.root().unwrap();

        let mut walk = BoundedWalk::accepting(&root, Bounds::new(2, None, 50), tagged);
        assert_eq!(walk.by_ref().count(), 2);
        assert!(walk.limit_reached());
    }

    #[test]
    fn test_depth_and_fanout_caps() {
        let tree = wide_tree(5);
        let root = tree.root().unwrap();
        let depths: Vec<usize> = BoundedWalk::descendants(&root, Bounds::new(100, Some(1), 50))
            .map(|(_, d)| d)
            .collect();
        assert_eq!(depths, vec![1; 5]);

        let count = BoundedWalk::descendants(&root, Bounds::new(100, Some(1), 2)).count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_accepting_counts_only_matches() {
        let tree = wide_tree(4);
        let root = tree.root().unwrap();
        let is_span = |n: &MemoryNode<'_>| tag_of(n) == "span";
        let spans: Vec<_> = BoundedWalk::accepting(&root, Bounds::new(2, None, 50), is_span).collect();
        assert_eq!(spans.len(), 2);
        assert!(spans.iter().all(|(_, d)| *d == 2));
    }

    #[test]
    fn test_failing_child_accessor_stops_branch() {
        let mut b = TreeBuilder::new();
        let root = b.root(NodeSpec::tagged("div"));
        let broken = b.child(root, NodeSpec::tagged("section").fails(Accessor::FirstChild));
        b.child(broken, NodeSpec::tagged("p"));
        b.child(root, NodeSpec::tagged("aside"));
        let tree = b.build();
        let tags: Vec<String> = BoundedWalk::descendants(&tree.root().unwrap(), Bounds::new(10, None, 50))
            .map(|(n, _)| tag_of(&n))
            .collect();
        assert_eq!(tags, vec!["section", "aside"]);
    }
}
