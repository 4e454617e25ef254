//! Effective link target resolution.
//!
//! Document-location lookups are ordered lists of [`UrlSource`]s, evaluated
//! first-non-empty-wins, so precedence can be tested in isolation.

use crate::attributes;
use crate::chain::{self, DOCUMENT_TAG};
use crate::host::{soft, AccessibleNode};
use crate::model::AttrMap;
use crate::session::Scope;
use ::url::Url;

/// Candidate names of the application's current-URL accessor
pub const APP_URL_ACCESSORS: [&str; 4] = [
    "browser_url",
    "current_url",
    "current_document_url",
    "document_url",
];

/// One place a document location can come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSource {
    /// Location known to the tree-navigation context
    TreeContext,
    /// Application-provided accessor, tried under every candidate name
    AppAccessor,
    /// Legacy value-based URL of the node
    LegacyValue,
}

/// Document-location pipeline, in priority order
pub const DOCUMENT_SOURCES: [UrlSource; 3] = [
    UrlSource::TreeContext,
    UrlSource::AppAccessor,
    UrlSource::LegacyValue,
];

impl UrlSource {
    pub fn read<N: AccessibleNode>(self, node: &N) -> Option<String> {
        match self {
            UrlSource::TreeContext => web_url(soft("tree_context_url", node.tree_context_url())),
            UrlSource::AppAccessor => APP_URL_ACCESSORS
                .iter()
                .find_map(|name| web_url(soft("app_url", node.app_url(name)))),
            UrlSource::LegacyValue => legacy_url(node),
        }
    }
}

/// Absolute http(s) URL
pub fn is_web_url(value: &str) -> bool {
    let value = value.trim();
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return false;
    }
    Url::parse(value).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

fn web_url(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| is_web_url(v))
}

fn legacy_url<N: AccessibleNode>(node: &N) -> Option<String> {
    web_url(soft("legacy_value_url", node.legacy_value_url()))
}

/// First URL any source yields for `node`
pub fn first_url<N: AccessibleNode>(node: &N, sources: &[UrlSource]) -> Option<String> {
    sources.iter().find_map(|source| source.read(node))
}

/// Run the document pipeline over each candidate node in turn
pub fn document_location<N: AccessibleNode>(candidates: &[&N]) -> Option<String> {
    candidates
        .iter()
        .find_map(|node| first_url(*node, &DOCUMENT_SOURCES))
}

/// Best-known document URL for the context around `base`
///
/// Prefers the nearest `#document` node in the chain (its `href`, then its
/// own sources), then the base node, then the focus.
pub fn document_url<N: AccessibleNode>(base: &N, chain: &[N], focus: Option<&N>) -> Option<String> {
    let doc = chain::nearest_with_tag(chain, DOCUMENT_TAG);
    if let Some(doc) = doc {
        let href = attributes::extract(doc).text("href").to_string();
        if !href.is_empty() {
            return Some(href);
        }
    }
    let candidates: Vec<&N> = doc.into_iter().chain([base]).chain(focus).collect();
    document_location(&candidates)
}

/// Effective `href` of `node`, empty when none applies
///
/// `attrs` is the node's extracted mapping and `chain` its ancestry chain.
pub fn effective_href<N: AccessibleNode>(
    node: &N,
    attrs: &AttrMap,
    chain: &[N],
    scope: &Scope<'_, N>,
) -> String {
    let tag = attrs.lower("tag");
    let own = attrs.text("href");
    if !own.is_empty() {
        return own.to_string();
    }

    match tag.as_str() {
        DOCUMENT_TAG => {
            let candidates: Vec<&N> = [node, scope.base].into_iter().chain(scope.focus).collect();
            document_location(&candidates).unwrap_or_default()
        }
        "a" => legacy_url(node).unwrap_or_default(),
        // Media inside a link carries the link's target; nothing else inherits.
        "img" | "svg" => chain::nearest_with_tag(chain, "a")
            .and_then(|link| {
                let href = attributes::extract(link).text("href").to_string();
                if href.is_empty() {
                    legacy_url(link)
                } else {
                    Some(href)
                }
            })
            .unwrap_or_default(),
        _ => String::new(),
    }
}
