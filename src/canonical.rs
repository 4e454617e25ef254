//! Canonical element selection.
//!
//! The node under the cursor is often a decorative leaf (an icon inside a
//! link, a text run inside an editor). [`promote`] picks the element a user
//! would name instead, keeping the original as a nested sub-report.

use crate::attributes::{extract, tag_of};
use crate::chain;
use crate::host::{soft, AccessibleNode, Role};
use crate::model::AttrMap;

/// Id of a well-known chat editor's input host
pub const EDITOR_PLACEHOLDER_ID: &str = "prompt-textarea";

const POPUP_KINDS: [&str; 5] = ["menu", "listbox", "dialog", "tree", "grid"];

/// Node to report plus the original node when it was promoted away from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical<N> {
    pub report: N,
    pub nested: Option<N>,
}

impl<N> Canonical<N> {
    fn itself(report: N) -> Self {
        Self {
            report,
            nested: None,
        }
    }
}

/// Choose the node to report for `node` with ancestry `chain`
///
/// `container_steps` bounds the interactive-container search.
pub fn promote<N: AccessibleNode>(node: &N, chain: &[N], container_steps: usize) -> Canonical<N> {
    if chain.is_empty() {
        return Canonical::itself(prefer_interactive_container(node, container_steps));
    }

    let tag = tag_of(node);
    // Untagged leaves report their nearest tagged ancestor, which heads the chain.
    if tag.is_empty() {
        return promote(&chain[0], chain, container_steps);
    }

    if matches!(tag.as_str(), "img" | "svg") {
        if let Some(link) = chain::nearest_with_tag(chain, "a") {
            return Canonical {
                report: link.clone(),
                nested: Some(node.clone()),
            };
        }
    }

    if matches!(tag.as_str(), "p" | "span" | "br") {
        if let Some(host) = chain.iter().find(|n| is_editing_host(&extract(*n))) {
            return Canonical {
                report: prefer_interactive_container(host, container_steps),
                nested: Some(node.clone()),
            };
        }
    }

    Canonical::itself(prefer_interactive_container(node, container_steps))
}

/// Rich-text editing host: contenteditable, or an editor-shaped container
pub fn is_editing_host(attrs: &AttrMap) -> bool {
    if matches!(attrs.lower("contenteditable").as_str(), "true" | "1") {
        return true;
    }
    let editor_signal = attrs.contains("multiline")
        || attrs.contains("tabindex")
        || attrs.get("id") == Some(EDITOR_PLACEHOLDER_ID);
    editor_signal && matches!(attrs.lower("tag").as_str(), "div" | "textarea" | "section")
}

/// First button-like node among `start` and its parents
///
/// Checks at most `max_steps` nodes; falls back to `start`.
pub fn prefer_interactive_container<N: AccessibleNode>(start: &N, max_steps: usize) -> N {
    let mut current = Some(start.clone());
    for _ in 0..max_steps {
        let Some(node) = current else { break };
        if is_interactive_container(&node) {
            return node;
        }
        current = soft("parent", node.parent());
    }
    start.clone()
}

fn is_interactive_container<N: AccessibleNode>(node: &N) -> bool {
    let attrs = extract(node);
    let role = attrs.lower("role");
    let xml_roles = attrs.lower("xml-roles");

    if attrs.lower("tag") == "button" {
        return true;
    }
    if (role == "button" || xml_roles == "button") && attrs.text("tabindex") == "0" {
        return true;
    }
    if POPUP_KINDS.contains(&attrs.lower("haspopup").as_str()) {
        return true;
    }
    if attrs.lower("fsFormField") == "true" && (!role.is_empty() || !xml_roles.is_empty()) {
        return true;
    }
    soft("role", node.role()) == Role::Button
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ancestry, DEFAULT_CHAIN_DEPTH};
    use crate::host::memory::{MemoryTree, NodeSpec, TreeBuilder};

    fn promote_at(tree: &MemoryTree, index: usize) -> (usize, Option<usize>) {
        let node = tree.node(index).unwrap();
        let chain = ancestry(&node, DEFAULT_CHAIN_DEPTH);
        let c = promote(&node, &chain, 7);
        (c.report.index(), c.nested.map(|n| n.index()))
    }

    #[test]
    fn test_image_in_link_reports_link() {
        let mut b = TreeBuilder::new();
        let doc = b.root(NodeSpec::tagged("#document"));
        let a = b.child(doc, NodeSpec::tagged("a").attr("href", "https://example.com/"));
        let img = b.child(a, NodeSpec::tagged("img"));
        let lone = b.child(doc, NodeSpec::tagged("svg"));
        let tree = b.build();

        assert_eq!(promote_at(&tree, img), (a, Some(img)));
        assert_eq!(promote_at(&tree, lone), (lone, None));
    }

    #[test]
    fn test_text_run_in_editor_reports_editor() {
        let mut b = TreeBuilder::new();
        let doc = b.root(NodeSpec::tagged("#document"));
        let editor = b.child(doc, NodeSpec::tagged("div").attr("id", EDITOR_PLACEHOLDER_ID));
        let p = b.child(editor, NodeSpec::tagged("p"));
        let span = b.child(p, NodeSpec::tagged("span"));
        let tree = b.build();

        assert_eq!(promote_at(&tree, span), (editor, Some(span)));
    }

    #[test]
    fn test_untagged_leaf_reports_tagged_ancestor() {
        let mut b = TreeBuilder::new().browse_mode(true);
        let doc = b.root(NodeSpec::tagged("#document"));
        let p = b.child(doc, NodeSpec::tagged("p"));
        let leaf = b.child(p, NodeSpec::untagged());
        let a = b.child(doc, NodeSpec::tagged("a").attr("href", "https://example.com/"));
        let img = b.child(a, NodeSpec::tagged("img"));
        let glyph = b.child(img, NodeSpec::untagged());
        let tree = b.build();

        assert_eq!(promote_at(&tree, leaf), (p, None));
        assert_eq!(promote_at(&tree, glyph), (a, Some(img)));
    }

    #[test]
    fn test_editing_host_rules() {
        let host = |pairs: &[(&str, &str)]| -> bool {
            is_editing_host(&pairs.iter().copied().collect())
        };
        assert!(host(&[("tag", "p"), ("contenteditable", "true")]));
        assert!(host(&[("tag", "textarea"), ("multiline", "")]));
        assert!(host(&[("tag", "section"), ("tabindex", "-1")]));
        assert!(!host(&[("tag", "span"), ("tabindex", "0")]));
        assert!(!host(&[("tag", "div"), ("contenteditable", "false")]));
    }

    #[test]
    fn test_icon_in_button_prefers_button() {
        let mut b = TreeBuilder::new();
        let doc = b.root(NodeSpec::tagged("#document"));
        let button = b.child(doc, NodeSpec::tagged("div").attr("role", "button").attr("tabindex", "0"));
        let inner = b.child(button, NodeSpec::tagged("span"));
        let icon = b.child(inner, NodeSpec::tagged("i"));
        let menu = b.child(doc, NodeSpec::tagged("div").attr("haspopup", "menu"));
        let label = b.child(menu, NodeSpec::tagged("b"));
        let native = b.child(doc, NodeSpec::untagged().role(Role::Button));
        let glyph = b.child(native, NodeSpec::tagged("em"));
        let tree = b.build();

        assert_eq!(promote_at(&tree, icon), (button, None));
        assert_eq!(promote_at(&tree, label), (menu, None));
        assert_eq!(promote_at(&tree, glyph), (native, None));
    }

    #[test]
    fn test_container_search_is_bounded() {
        let mut b = TreeBuilder::new();
        let doc = b.root(NodeSpec::tagged("#document"));
        let button = b.child(doc, NodeSpec::tagged("button"));
        let mut leaf = button;
        for _ in 0..7 {
            leaf = b.child(leaf, NodeSpec::tagged("span"));
        }
        let tree = b.build();
        let node = tree.node(leaf).unwrap();
        assert_eq!(prefer_interactive_container(&node, 7), node);
        assert_eq!(prefer_interactive_container(&node, 8).index(), button);
    }
}
