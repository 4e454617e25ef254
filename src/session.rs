//! Inspection orchestration: pick the node under the user, gate on web
//! context, and run the pipeline over the canonical node, the nested node
//! and every ancestor.

use crate::attributes::{extract, tag_of};
use crate::canonical::{self, Canonical};
use crate::chain::{self, ancestry, DOCUMENT_TAG};
use crate::config::{InspectorConfig, Limits};
use crate::format;
use crate::host::{soft, AccessibleNode, HostContext, StateSet};
use crate::infer::{self, infer_form_attrs};
use crate::model::{AttrMap, ChildBlock, ChildrenSection, Inspection, Report, ReportBlock, ReportMode};
use crate::traverse::{BoundedWalk, Bounds};
use crate::url;

/// Keys kept for descendants in the children section
pub const CHILD_KEYS: [&str; 17] = [
    "tag",
    "id",
    "role",
    "xml-roles",
    "href",
    "src",
    "type",
    "accessible-name",
    "accessible-name-from",
    "explicit-name",
    "explicit-name-from",
    "pressed",
    "expanded",
    "selected",
    "checked",
    "value",
    "valuetext",
];

/// Context shared by every node of one inspection
#[derive(Debug)]
pub struct Scope<'a, N> {
    /// Node the inspection started from
    pub base: &'a N,
    pub focus: Option<&'a N>,
    pub limits: &'a Limits,
}

impl<'a, N> Scope<'a, N> {
    pub fn new(base: &'a N, focus: Option<&'a N>, limits: &'a Limits) -> Self {
        Self {
            base,
            focus,
            limits,
        }
    }
}

/// Node under the user: browse-mode caret, then navigator, then focus
pub fn candidate_node<C: HostContext>(ctx: &C) -> Option<C::Node> {
    let focus = soft("focus", ctx.focus());
    if let Some(f) = &focus {
        if soft("in_browse_mode", f.in_browse_mode()) {
            if let Some(caret) = soft("caret", ctx.caret()) {
                return Some(caret);
            }
        }
    }
    soft("navigator", ctx.navigator()).or(focus)
}

fn in_browse_mode<N: AccessibleNode>(node: &N) -> bool {
    soft("in_browse_mode", node.in_browse_mode())
}

fn has_document<N: AccessibleNode>(node: &N, limits: &Limits) -> bool {
    let chain = ancestry(node, limits.chain_depth);
    chain::nearest_with_tag(&chain, DOCUMENT_TAG).is_some()
        || url::document_url(node, &chain, None).is_some()
}

/// Whether inspecting `base` is meaningful
///
/// Browse mode on the base or the focus wins; otherwise a `#document` in
/// either chain or any discoverable document URL.
pub fn is_web_context<N: AccessibleNode>(base: &N, focus: Option<&N>, limits: &Limits) -> bool {
    let other_focus = focus.filter(|f| *f != base);
    if in_browse_mode(base) || other_focus.is_some_and(in_browse_mode) {
        return true;
    }
    has_document(base, limits) || other_focus.is_some_and(|f| has_document(f, limits))
}

fn only_document<N: AccessibleNode>(chain: &[N]) -> bool {
    chain.len() == 1 && tag_of(&chain[0]) == DOCUMENT_TAG
}

/// Log a node the way the debug mode wants it: tag, role, name, states, raw keys
pub fn dump_node<N: AccessibleNode>(node: &N, label: &str) {
    let attrs = extract(node);
    let states: Vec<String> = StateSet::of(node)
        .iter()
        .map(|s| s.display_name().to_string())
        .collect();
    tracing::debug!(
        label,
        tag = attrs.text("tag"),
        role = soft("role", node.role()).as_str(),
        name = ?soft("name", node.name()),
        description = ?soft("description", node.description()),
        ?states,
        keys = ?attrs.keys().collect::<Vec<_>>(),
        "node"
    );
}

/// Runs inspection commands against a host context
#[derive(Debug, Clone, Default)]
pub struct Inspector {
    config: InspectorConfig,
}

impl Inspector {
    pub fn new(config: InspectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    /// Inspect the element under the user
    ///
    /// `ReportMode::Advanced` also explores the canonical node's children.
    pub fn inspect<C: HostContext>(&self, ctx: &C, mode: ReportMode) -> Inspection {
        let limits = &self.config.limits;
        let Some(mut base) = candidate_node(ctx) else {
            return Inspection::NoElement;
        };
        let focus = soft("focus", ctx.focus());
        if !is_web_context(&base, focus.as_ref(), limits) {
            return Inspection::NotWebContext;
        }

        let mut base_chain = ancestry(&base, limits.chain_depth);
        // A stale navigator may sit on the document; try the other candidates.
        if only_document(&base_chain) {
            let alternatives = [soft("navigator", ctx.navigator()), focus.clone()];
            for alt in alternatives.into_iter().flatten() {
                if !only_document(&base_chain) {
                    break;
                }
                if alt == base {
                    continue;
                }
                let alt_chain = ancestry(&alt, limits.chain_depth);
                if alt_chain.len() > base_chain.len() {
                    base = alt;
                    base_chain = alt_chain;
                }
            }
        }

        let Canonical { report, nested } =
            canonical::promote(&base, &base_chain, limits.container_steps);
        tracing::debug!(
            chain = ?chain::tags(&base_chain),
            canonical = %tag_of(&report),
            promoted_from = ?nested.as_ref().map(tag_of),
            ?mode,
            "inspection start"
        );
        if self.config.debug {
            dump_node(&base, "base");
            dump_node(&report, "canonical");
            if let Some(n) = &nested {
                dump_node(n, "promoted-from");
            }
        }

        let scope = Scope::new(&base, focus.as_ref(), limits);
        let canonical_chain = ancestry(&report, limits.chain_depth);
        let canonical_block = self.describe(&report, &canonical_chain, &scope);

        let nested_block = nested
            .filter(|n| *n != report)
            .map(|n| self.describe(&n, &ancestry(&n, limits.chain_depth), &scope));

        let skip = usize::from(canonical_chain.first() == Some(&report));
        let ancestors = canonical_chain
            .iter()
            .skip(skip)
            .enumerate()
            .map(|(i, ancestor)| {
                if self.config.debug && i < 4 {
                    dump_node(ancestor, "ancestor");
                }
                self.describe(ancestor, &ancestry(ancestor, limits.chain_depth), &scope)
            })
            .collect();

        let children = match mode {
            ReportMode::Basic => None,
            ReportMode::Advanced => Some(self.explore_children(&report, &scope)),
        };

        Inspection::Report(Report {
            mode,
            canonical: canonical_block,
            nested: nested_block,
            ancestors,
            children,
        })
    }

    /// Full pipeline for one node
    pub fn describe<N: AccessibleNode>(&self, node: &N, chain: &[N], scope: &Scope<'_, N>) -> ReportBlock {
        let attrs = self.augmented(node, chain, scope);
        format::block(&block_tag(&attrs), &attrs)
    }

    fn augmented<N: AccessibleNode>(&self, node: &N, chain: &[N], scope: &Scope<'_, N>) -> AttrMap {
        let raw = extract(node);
        if self.config.debug {
            tracing::debug!(tag = raw.text("tag"), raw = ?raw, "raw attributes");
        }
        infer::augment(node, chain, &raw, scope)
    }

    /// Descendants of `root` with the child subset of keys
    ///
    /// Only tag-bearing nodes are listed and counted; untagged wrappers are
    /// walked through.
    pub fn explore_children<N: AccessibleNode>(&self, root: &N, scope: &Scope<'_, N>) -> ChildrenSection {
        let limits = scope.limits;
        let bounds = Bounds::new(
            limits.subtree_nodes,
            Some(limits.subtree_depth),
            limits.sibling_fanout,
        );
        let tagged = |n: &N| !tag_of(n).is_empty();
        let mut walk = BoundedWalk::accepting(root, bounds, tagged);

        let mut entries = Vec::new();
        for (node, depth) in walk.by_ref() {
            let attrs = self.augmented(&node, &ancestry(&node, limits.chain_depth), scope);
            let mut kept: AttrMap = CHILD_KEYS
                .iter()
                .filter_map(|k| attrs.get(k).map(|v| (*k, v)))
                .collect();
            infer_form_attrs(&node, &mut kept);
            entries.push(ChildBlock {
                depth,
                block: format::block(&block_tag(&attrs), &kept),
            });
        }

        let truncated = walk.limit_reached();
        tracing::debug!(count = entries.len(), truncated, "children explored");
        ChildrenSection { entries, truncated }
    }
}

fn block_tag(attrs: &AttrMap) -> String {
    match attrs.text("tag") {
        "" => "unknown".to_string(),
        tag => tag.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{Accessor, MemoryContext, MemoryTree, NodeSpec, TreeBuilder};
    use crate::host::{Role, State};

    fn link_page() -> (MemoryTree, usize, usize) {
        let mut b = TreeBuilder::new()
            .browse_mode(true)
            .document_url("https://example.com/");
        let doc = b.root(NodeSpec::tagged("#document").role(Role::Document));
        let body = b.child(doc, NodeSpec::tagged("body"));
        let a = b.child(
            body,
            NodeSpec::tagged("a")
                .attr("href", "https://example.com/")
                .role(Role::Link)
                .name("Home"),
        );
        let img = b.child(a, NodeSpec::tagged("img").attr("src", "logo.png").role(Role::Graphic));
        (b.build(), a, img)
    }

    #[test]
    fn test_untagged_caret_reports_paragraph() {
        let mut b = TreeBuilder::new().browse_mode(true);
        let doc = b.root(NodeSpec::tagged("#document").role(Role::Document));
        let p = b.child(doc, NodeSpec::tagged("p"));
        let text = b.child(p, NodeSpec::untagged().name("Hello"));
        let tree = b.build();
        let ctx = tree.context_at(Some(text));
        let inspection = Inspector::default().inspect(&ctx, ReportMode::Basic);
        let report = inspection.report().unwrap();

        assert_eq!(report.canonical.tag, "p");
        assert!(report.nested.is_none());
        let tags: Vec<&str> = report.ancestors.iter().map(|b| b.tag.as_str()).collect();
        assert_eq!(tags, vec!["#document"]);
    }

    #[test]
    fn test_image_in_link_report() {
        let (tree, _, img) = link_page();
        let ctx = tree.context_at(Some(img));
        let inspection = Inspector::default().inspect(&ctx, ReportMode::Basic);
        let report = inspection.report().unwrap();

        assert_eq!(report.canonical.tag, "a");
        assert_eq!(report.canonical.get("href"), Some("https://example.com/"));
        let nested = report.nested.as_ref().unwrap();
        assert_eq!(nested.tag, "img");
        assert_eq!(nested.get("href"), Some("https://example.com/"));
        let tags: Vec<&str> = report.ancestors.iter().map(|b| b.tag.as_str()).collect();
        assert_eq!(tags, vec!["body", "#document"]);
        assert_eq!(report.ancestors[1].get("href"), Some("https://example.com/"));

        let text = format::render_text(report);
        assert!(text.starts_with("Element Information:\n\nTag A has "));
        assert!(text.contains("\nNested element:\n\nTag IMG has "));
    }

    #[test]
    fn test_gating_messages() {
        let tree = MemoryTree::default();
        let ctx = tree.context_at(None);
        assert_eq!(Inspector::default().inspect(&ctx, ReportMode::Basic), Inspection::NoElement);

        let mut b = TreeBuilder::new();
        let app = b.root(NodeSpec::untagged().role(Role::Button).name("OK"));
        let tree = b.build();
        let ctx = tree.context_at(Some(app));
        assert_eq!(
            Inspector::default().inspect(&ctx, ReportMode::Advanced),
            Inspection::NotWebContext
        );
    }

    #[test]
    fn test_document_tag_is_web_context_without_browse_mode() {
        let mut b = TreeBuilder::new();
        let doc = b.root(NodeSpec::tagged("#document"));
        let p = b.child(doc, NodeSpec::tagged("p"));
        let tree = b.build();
        let limits = Limits::default();
        assert!(is_web_context(&tree.node(p).unwrap(), None, &limits));
    }

    #[test]
    fn test_caret_preferred_in_browse_mode() {
        let (tree, a, img) = link_page();
        let ctx = MemoryContext {
            tree: &tree,
            focus: Some(a),
            navigator: Some(a),
            caret: Some(img),
        };
        assert_eq!(candidate_node(&ctx).map(|n| n.index()), Some(img));

        let mut b = TreeBuilder::new();
        let doc = b.root(NodeSpec::tagged("#document"));
        let first = b.child(doc, NodeSpec::tagged("p"));
        let second = b.child(doc, NodeSpec::tagged("div"));
        let tree = b.build();
        let ctx = MemoryContext {
            tree: &tree,
            focus: Some(first),
            navigator: Some(second),
            caret: Some(first),
        };
        assert_eq!(candidate_node(&ctx).map(|n| n.index()), Some(second));
    }

    #[test]
    fn test_document_navigator_falls_back_to_focus() {
        let (tree, a, _) = link_page();
        let ctx = MemoryContext {
            tree: &tree,
            focus: Some(a),
            navigator: Some(0),
            caret: None,
        };
        let inspection = Inspector::default().inspect(&ctx, ReportMode::Basic);
        assert_eq!(inspection.report().unwrap().canonical.tag, "a");
    }

    #[test]
    fn test_children_section() {
        let mut b = TreeBuilder::new().browse_mode(true);
        let doc = b.root(NodeSpec::tagged("#document"));
        let list = b.child(doc, NodeSpec::tagged("ul").attr("role", "listbox").key("list"));
        let wrapper = b.child(list, NodeSpec::untagged());
        for i in 0..4 {
            let li = b.child(
                wrapper,
                NodeSpec::tagged("li")
                    .attr("role", "option")
                    .attr("class", "noise")
                    .name(&format!("Item {i}"))
                    .state(State::Selectable),
            );
            b.child(li, NodeSpec::tagged("span"));
        }
        let tree = b.build();
        let ctx = tree.context_at(Some(list));

        let config = InspectorConfig {
            limits: Limits {
                subtree_nodes: 6,
                ..Limits::default()
            },
            ..InspectorConfig::default()
        };
        let inspection = Inspector::new(config).inspect(&ctx, ReportMode::Advanced);
        let children = inspection.report().unwrap().children.clone().unwrap();

        assert_eq!(children.entries.len(), 6);
        assert!(children.truncated);
        let first = &children.entries[0];
        assert_eq!(first.depth, 2);
        assert_eq!(first.block.get("accessible-name"), Some("Item 0"));
        assert_eq!(first.block.get("selected"), Some("false"));
        assert_eq!(first.block.get("fsFormField"), Some("true"));
        assert_eq!(first.block.get("class"), None);
        assert_eq!(children.entries[4].block.tag, "span");
        assert_eq!(children.entries[4].depth, 3);
    }

    #[test]
    fn test_broken_accessors_still_report() {
        let mut b = TreeBuilder::new().browse_mode(true);
        let doc = b.root(NodeSpec::tagged("#document"));
        let div = b.child(
            doc,
            NodeSpec::tagged("div")
                .fails(Accessor::Name)
                .fails(Accessor::States)
                .fails(Accessor::Role),
        );
        let tree = b.build();
        let ctx = tree.context_at(Some(div));
        let inspection = Inspector::default().inspect(&ctx, ReportMode::Advanced);
        let report = inspection.report().unwrap();
        assert_eq!(report.canonical.tag, "div");
        assert!(report.children.as_ref().unwrap().entries.is_empty());
    }
}
