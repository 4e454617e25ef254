//! In-memory accessibility tree implementing the host traits.
//!
//! Used by the HTML host, by JSON fixtures on the command line, and by tests.
//! Individual accessors can be configured to fail so the fail-soft paths of
//! the engine can be exercised.

use super::{AccessibleNode, HostContext, RawAttributes, Role, State};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};

/// Accessor names a fixture can mark as failing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accessor {
    Parent,
    FirstChild,
    NextSibling,
    Attributes,
    Name,
    Description,
    Value,
    Role,
    States,
    Spans,
    Urls,
    BrowseMode,
}

/// Attribute source of a fixture node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FixtureAttributes {
    Map(BTreeMap<String, String>),
    Text(String),
}

impl Default for FixtureAttributes {
    fn default() -> Self {
        FixtureAttributes::Map(BTreeMap::new())
    }
}

/// Description of one node; `children` nest in fixtures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSpec {
    /// Lookup key for focus/navigator selection (not an HTML id)
    pub key: Option<String>,
    pub attributes: FixtureAttributes,
    pub name: Option<String>,
    pub description: Option<String>,
    pub value: Option<String>,
    pub role: Role,
    pub states: Vec<State>,
    pub col_span: Option<u32>,
    pub row_span: Option<u32>,
    pub legacy_url: Option<String>,
    pub failing: Vec<Accessor>,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    /// Node with a `tag` attribute
    pub fn tagged(tag: &str) -> Self {
        Self::default().attr("tag", tag)
    }

    /// Node without engine attributes (text leaves, anonymous wrappers)
    pub fn untagged() -> Self {
        Self::default()
    }

    pub fn attr(mut self, key: &str, value: &str) -> Self {
        match &mut self.attributes {
            FixtureAttributes::Map(map) => {
                map.insert(key.to_string(), value.to_string());
            }
            FixtureAttributes::Text(text) => {
                text.push_str(&format!("{key}:{value};"));
            }
        }
        self
    }

    /// Replace the attribute source with a raw `key:value;` blob
    pub fn attr_text(mut self, text: &str) -> Self {
        self.attributes = FixtureAttributes::Text(text.to_string());
        self
    }

    pub fn key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    pub fn spans(mut self, cols: u32, rows: u32) -> Self {
        self.col_span = Some(cols);
        self.row_span = Some(rows);
        self
    }

    pub fn legacy_url(mut self, url: &str) -> Self {
        self.legacy_url = Some(url.to_string());
        self
    }

    pub fn fails(mut self, accessor: Accessor) -> Self {
        self.failing.push(accessor);
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }
}

/// Whole-document fixture as read from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeFixture {
    pub document_url: Option<String>,
    pub browse_mode: bool,
    pub app_urls: BTreeMap<String, String>,
    /// Key of the focused node
    pub focus: Option<String>,
    /// Key of the navigator node (defaults to focus)
    pub navigator: Option<String>,
    pub root: NodeSpec,
}

#[derive(Debug, Clone)]
struct NodeData {
    spec: NodeSpec,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Arena-backed accessibility tree
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    nodes: Vec<NodeData>,
    keys: HashMap<String, usize>,
    document_url: Option<String>,
    browse_mode: bool,
    app_urls: BTreeMap<String, String>,
}

impl MemoryTree {
    pub fn from_fixture(fixture: TreeFixture) -> Self {
        let mut builder = TreeBuilder::new()
            .browse_mode(fixture.browse_mode)
            .app_urls(fixture.app_urls);
        if let Some(url) = fixture.document_url {
            builder = builder.document_url(&url);
        }
        builder.add_subtree(None, fixture.root);
        builder.build()
    }

    pub fn from_json(json: &str) -> Result<(Self, TreeFixture)> {
        let fixture: TreeFixture =
            serde_json::from_str(json).context("Invalid accessibility tree fixture")?;
        Ok((Self::from_fixture(fixture.clone()), fixture))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<MemoryNode<'_>> {
        self.node(0)
    }

    pub fn node(&self, index: usize) -> Option<MemoryNode<'_>> {
        (index < self.nodes.len()).then_some(MemoryNode { tree: self, index })
    }

    /// Find a node by its fixture key
    pub fn by_key(&self, key: &str) -> Option<MemoryNode<'_>> {
        self.keys.get(key).and_then(|&i| self.node(i))
    }

    /// Mark a node as focused (adds the `Focused` state)
    pub fn set_focused(&mut self, index: usize) {
        if let Some(data) = self.nodes.get_mut(index) {
            if !data.spec.states.contains(&State::Focused) {
                data.spec.states.push(State::Focused);
            }
        }
    }

    /// Host context where focus, navigator and caret all sit on `index`
    pub fn context_at(&self, index: Option<usize>) -> MemoryContext<'_> {
        MemoryContext {
            tree: self,
            focus: index,
            navigator: index,
            caret: index,
        }
    }
}

/// Incremental construction of a [`MemoryTree`]
#[derive(Debug, Default)]
pub struct TreeBuilder {
    tree: MemoryTree,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document_url(mut self, url: &str) -> Self {
        self.tree.document_url = Some(url.to_string());
        self
    }

    pub fn browse_mode(mut self, enabled: bool) -> Self {
        self.tree.browse_mode = enabled;
        self
    }

    pub fn app_urls(mut self, urls: BTreeMap<String, String>) -> Self {
        self.tree.app_urls = urls;
        self
    }

    pub fn app_url(mut self, accessor: &str, url: &str) -> Self {
        self.tree
            .app_urls
            .insert(accessor.to_string(), url.to_string());
        self
    }

    /// Add a root node; returns its index
    pub fn root(&mut self, spec: NodeSpec) -> usize {
        self.add_subtree(None, spec)
    }

    /// Add `spec` (and any nested children) under `parent`; returns its index
    pub fn child(&mut self, parent: usize, spec: NodeSpec) -> usize {
        self.add_subtree(Some(parent), spec)
    }

    fn add_subtree(&mut self, parent: Option<usize>, mut spec: NodeSpec) -> usize {
        let children = std::mem::take(&mut spec.children);
        let index = self.tree.nodes.len();
        if let Some(key) = &spec.key {
            self.tree.keys.insert(key.clone(), index);
        }
        self.tree.nodes.push(NodeData {
            spec,
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            self.tree.nodes[p].children.push(index);
        }
        for child in children {
            self.add_subtree(Some(index), child);
        }
        index
    }

    pub fn build(self) -> MemoryTree {
        self.tree
    }
}

/// Handle to one node of a [`MemoryTree`]
#[derive(Debug, Clone, Copy)]
pub struct MemoryNode<'a> {
    tree: &'a MemoryTree,
    index: usize,
}

impl<'a> MemoryNode<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    fn data(&self) -> &'a NodeData {
        &self.tree.nodes[self.index]
    }

    fn check(&self, accessor: Accessor) -> Result<()> {
        if self.data().spec.failing.contains(&accessor) {
            bail!("{:?} unavailable on node {}", accessor, self.index);
        }
        Ok(())
    }

    fn at(&self, index: usize) -> MemoryNode<'a> {
        MemoryNode {
            tree: self.tree,
            index,
        }
    }
}

impl PartialEq for MemoryNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for MemoryNode<'_> {}

impl Hash for MemoryNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.tree, state);
        self.index.hash(state);
    }
}

impl AccessibleNode for MemoryNode<'_> {
    fn parent(&self) -> Result<Option<Self>> {
        self.check(Accessor::Parent)?;
        Ok(self.data().parent.map(|p| self.at(p)))
    }

    fn first_child(&self) -> Result<Option<Self>> {
        self.check(Accessor::FirstChild)?;
        Ok(self.data().children.first().map(|&c| self.at(c)))
    }

    fn next_sibling(&self) -> Result<Option<Self>> {
        self.check(Accessor::NextSibling)?;
        let Some(parent) = self.data().parent else {
            return Ok(None);
        };
        let siblings = &self.tree.nodes[parent].children;
        let next = siblings
            .iter()
            .position(|&s| s == self.index)
            .and_then(|pos| siblings.get(pos + 1))
            .map(|&s| self.at(s));
        Ok(next)
    }

    fn raw_attributes(&self) -> Result<RawAttributes> {
        self.check(Accessor::Attributes)?;
        Ok(match &self.data().spec.attributes {
            FixtureAttributes::Map(map) if map.is_empty() => RawAttributes::Absent,
            FixtureAttributes::Map(map) => RawAttributes::Map(
                map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            ),
            FixtureAttributes::Text(text) => RawAttributes::Text(text.clone()),
        })
    }

    fn name(&self) -> Result<Option<String>> {
        self.check(Accessor::Name)?;
        Ok(self.data().spec.name.clone())
    }

    fn description(&self) -> Result<Option<String>> {
        self.check(Accessor::Description)?;
        Ok(self.data().spec.description.clone())
    }

    fn value(&self) -> Result<Option<String>> {
        self.check(Accessor::Value)?;
        Ok(self.data().spec.value.clone())
    }

    fn role(&self) -> Result<Role> {
        self.check(Accessor::Role)?;
        Ok(self.data().spec.role)
    }

    fn states(&self) -> Result<Vec<State>> {
        self.check(Accessor::States)?;
        Ok(self.data().spec.states.clone())
    }

    fn col_span(&self) -> Result<Option<u32>> {
        self.check(Accessor::Spans)?;
        Ok(self.data().spec.col_span)
    }

    fn row_span(&self) -> Result<Option<u32>> {
        self.check(Accessor::Spans)?;
        Ok(self.data().spec.row_span)
    }

    fn legacy_value_url(&self) -> Result<Option<String>> {
        self.check(Accessor::Urls)?;
        Ok(self.data().spec.legacy_url.clone())
    }

    fn tree_context_url(&self) -> Result<Option<String>> {
        self.check(Accessor::Urls)?;
        if !self.tree.browse_mode {
            return Ok(None);
        }
        Ok(self.tree.document_url.clone())
    }

    fn app_url(&self, accessor: &str) -> Result<Option<String>> {
        self.check(Accessor::Urls)?;
        Ok(self.tree.app_urls.get(accessor).cloned())
    }

    fn in_browse_mode(&self) -> Result<bool> {
        self.check(Accessor::BrowseMode)?;
        Ok(self.tree.browse_mode)
    }
}

/// [`HostContext`] over a [`MemoryTree`]
#[derive(Debug, Clone, Copy)]
pub struct MemoryContext<'a> {
    pub tree: &'a MemoryTree,
    pub focus: Option<usize>,
    pub navigator: Option<usize>,
    pub caret: Option<usize>,
}

impl<'a> MemoryContext<'a> {
    /// Context described by a fixture's `focus`/`navigator` keys
    pub fn from_fixture(tree: &'a MemoryTree, fixture: &TreeFixture) -> Result<Self> {
        let lookup = |key: &Option<String>| -> Result<Option<usize>> {
            match key {
                Some(k) => tree
                    .by_key(k)
                    .map(|n| Some(n.index()))
                    .ok_or_else(|| anyhow::anyhow!("Unknown node key: {}", k)),
                None => Ok(None),
            }
        };
        let focus = lookup(&fixture.focus)?;
        let navigator = lookup(&fixture.navigator)?.or(focus);
        Ok(Self {
            tree,
            focus,
            navigator,
            caret: navigator,
        })
    }
}

impl<'a> HostContext for MemoryContext<'a> {
    type Node = MemoryNode<'a>;

    fn focus(&self) -> Result<Option<Self::Node>> {
        Ok(self.focus.and_then(|i| self.tree.node(i)))
    }

    fn navigator(&self) -> Result<Option<Self::Node>> {
        Ok(self.navigator.and_then(|i| self.tree.node(i)))
    }

    fn caret(&self) -> Result<Option<Self::Node>> {
        Ok(self.caret.and_then(|i| self.tree.node(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryTree {
        let mut b = TreeBuilder::new();
        let doc = b.root(NodeSpec::tagged("#document"));
        let body = b.child(doc, NodeSpec::tagged("body"));
        b.child(body, NodeSpec::tagged("p").key("first"));
        b.child(body, NodeSpec::tagged("p").key("second"));
        b.build()
    }

    #[test]
    fn test_navigation_links() {
        let tree = sample();
        let first = tree.by_key("first").unwrap();
        let second = first.next_sibling().unwrap().unwrap();
        assert_eq!(second, tree.by_key("second").unwrap());
        assert!(second.next_sibling().unwrap().is_none());
        let body = first.parent().unwrap().unwrap();
        assert_eq!(body.first_child().unwrap(), Some(first));
    }

    #[test]
    fn test_failing_accessor() {
        let mut b = TreeBuilder::new();
        let root = b.root(NodeSpec::tagged("div").fails(Accessor::Parent));
        let tree = b.build();
        let node = tree.node(root).unwrap();
        assert!(node.parent().is_err());
        assert!(node.raw_attributes().is_ok());
    }

    #[test]
    fn test_fixture_from_json() {
        let json = r##"{
            "document_url": "https://example.com/",
            "browse_mode": true,
            "focus": "link",
            "root": {
                "attributes": {"tag": "#document"},
                "role": "document",
                "children": [
                    {"key": "link", "attributes": "tag:a;href:https\\://example.com/x;", "states": ["focused", "linked"]}
                ]
            }
        }"##;
        let (tree, fixture) = MemoryTree::from_json(json).unwrap();
        let ctx = MemoryContext::from_fixture(&tree, &fixture).unwrap();
        let focus = ctx.focus().unwrap().unwrap();
        assert!(matches!(focus.raw_attributes().unwrap(), RawAttributes::Text(_)));
        assert_eq!(focus.states().unwrap(), vec![State::Focused, State::Linked]);
        assert_eq!(ctx.navigator().unwrap(), Some(focus));
        assert_eq!(
            tree.root().unwrap().tree_context_url().unwrap().as_deref(),
            Some("https://example.com/")
        );
    }

    #[test]
    fn test_unknown_focus_key_is_an_error() {
        let fixture = TreeFixture {
            focus: Some("missing".to_string()),
            ..Default::default()
        };
        let tree = MemoryTree::from_fixture(fixture.clone());
        assert!(MemoryContext::from_fixture(&tree, &fixture).is_err());
    }
}
