//! Ancestry chain: the tag-bearing nodes from a start node up to the document.

use crate::attributes::tag_of;
use crate::host::{soft, AccessibleNode};

/// Tag of the root document node; chains end here
pub const DOCUMENT_TAG: &str = "#document";

/// Default cap on parent steps
pub const DEFAULT_CHAIN_DEPTH: usize = 40;

/// Walk parent links from `start`, keeping nodes that expose a tag
///
/// The walk visits at most `max_depth` nodes and stops after the first
/// `#document` node (which is included). Untagged wrappers are skipped. A
/// failing parent query ends the chain at the last node reached.
pub fn ancestry<N: AccessibleNode>(start: &N, max_depth: usize) -> Vec<N> {
    let mut chain = Vec::new();
    let mut current = Some(start.clone());

    for _ in 0..max_depth {
        let Some(node) = current.take() else {
            break;
        };
        let tag = tag_of(&node);
        if !tag.is_empty() {
            chain.push(node.clone());
            if tag == DOCUMENT_TAG {
                break;
            }
        }
        current = soft("parent", node.parent());
    }

    chain
}

/// First node in `chain` whose tag equals `tag` (case-insensitive)
pub fn nearest_with_tag<'c, N: AccessibleNode>(chain: &'c [N], tag: &str) -> Option<&'c N> {
    let tag = tag.to_lowercase();
    chain.iter().find(|node| tag_of(*node) == tag)
}

/// Tags of a chain, for logging
pub fn tags<N: AccessibleNode>(chain: &[N]) -> Vec<String> {
    chain.iter().map(tag_of).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{Accessor, NodeSpec, TreeBuilder};

    #[test]
    fn test_chain_skips_untagged_and_stops_at_document() {
        let mut b = TreeBuilder::new();
        let outer = b.root(NodeSpec::tagged("div").key("outside"));
        let doc = b.child(outer, NodeSpec::tagged("#document"));
        let body = b.child(doc, NodeSpec::tagged("body"));
        let wrapper = b.child(body, NodeSpec::untagged());
        let p = b.child(wrapper, NodeSpec::tagged("p"));
        let text = b.child(p, NodeSpec::untagged().name("hello"));
        let tree = b.build();

        let chain = ancestry(&tree.node(text).unwrap(), DEFAULT_CHAIN_DEPTH);
        assert_eq!(tags(&chain), vec!["p", "body", "#document"]);
        assert!(chain.iter().all(|n| !tag_of(n).is_empty()));
    }

    #[test]
    fn test_chain_respects_depth_cap() {
        let mut b = TreeBuilder::new();
        let mut parent = b.root(NodeSpec::tagged("#document"));
        for _ in 0..60 {
            parent = b.child(parent, NodeSpec::tagged("div"));
        }
        let tree = b.build();
        let chain = ancestry(&tree.node(parent).unwrap(), DEFAULT_CHAIN_DEPTH);
        assert_eq!(chain.len(), DEFAULT_CHAIN_DEPTH);
        assert!(!tags(&chain).contains(&"#document".to_string()));

        let chain = ancestry(&tree.node(parent).unwrap(), 3);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_broken_parent_truncates() {
        let mut b = TreeBuilder::new();
        let doc = b.root(NodeSpec::tagged("#document"));
        let section = b.child(doc, NodeSpec::tagged("section").fails(Accessor::Parent));
        let button = b.child(section, NodeSpec::tagged("button"));
        let tree = b.build();

        let chain = ancestry(&tree.node(button).unwrap(), DEFAULT_CHAIN_DEPTH);
        assert_eq!(tags(&chain), vec!["button", "section"]);
    }

    #[test]
    fn test_nearest_with_tag() {
        let mut b = TreeBuilder::new();
        let doc = b.root(NodeSpec::tagged("#document"));
        let a = b.child(doc, NodeSpec::tagged("A"));
        let img = b.child(a, NodeSpec::tagged("img"));
        let tree = b.build();
        let chain = ancestry(&tree.node(img).unwrap(), DEFAULT_CHAIN_DEPTH);
        let link = nearest_with_tag(&chain, "a").unwrap();
        assert_eq!(link.index(), a);
        assert!(nearest_with_tag(&chain, "table").is_none());
    }
}
