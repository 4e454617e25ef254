//! Inference engine: derived attributes the host does not expose directly.
//!
//! [`augment`] is additive over the extracted mapping: a present, non-empty
//! value is never replaced, apart from the documented rewrites (`pressed` and
//! `checked` normalization, tooltip labels moved to `title`, and the noise
//! keys stripped at the end). Steps run in a fixed order because later steps
//! read what earlier ones wrote.

pub mod combobox;
pub mod form;
pub mod name;
pub mod toggle;

use crate::attributes::tag_of;
use crate::host::{soft, AccessibleNode, State, StateSet};
use crate::model::AttrMap;
use crate::session::Scope;
use crate::url;

pub use form::infer_form_attrs;

/// Roles where an unselected state is worth reporting
const SELECTABLE_ROLES: [&str; 3] = ["tab", "option", "treeitem"];

/// Tags where an MSAA role hint is meaningful
pub const CONTROL_TAGS: [&str; 7] = [
    "input", "textarea", "select", "button", "option", "meter", "progress",
];

/// ARIA role or engine role (`xml-roles`) equals `role`
pub fn role_is(attrs: &AttrMap, role: &str) -> bool {
    attrs.lower("role") == role || attrs.lower("xml-roles") == role
}

/// Augment the extracted mapping `raw` of `node`
///
/// `chain` is the node's own ancestry chain; `scope` carries the inspected
/// base node, the focus and the limits.
pub fn augment<N: AccessibleNode>(
    node: &N,
    chain: &[N],
    raw: &AttrMap,
    scope: &Scope<'_, N>,
) -> AttrMap {
    let mut out = raw.clone();
    let states = StateSet::of(node);

    if out.is_blank("tag") {
        let tag = tag_of(node);
        if !tag.is_empty() {
            out.insert("tag", tag);
        }
    }
    if out.is_blank("href") {
        let href = url::effective_href(node, &out, chain, scope);
        if !href.is_empty() {
            out.insert("href", href);
        }
    }

    if !out.contains("accessible-name") {
        let name = soft("name", node.name()).unwrap_or_default();
        out.insert("accessible-name", name.trim());
    }

    name::apply_provenance(&mut out);

    if out.is_blank("expanded") {
        if states.either(&State::Collapsed, "collapsed") {
            out.insert("expanded", "false");
        } else if states.either(&State::Expanded, "expanded") {
            out.insert("expanded", "true");
        }
    }

    if out.is_blank("selected") {
        if states.either(&State::Selected, "selected") {
            out.insert("selected", "true");
        } else if SELECTABLE_ROLES.iter().any(|r| role_is(&out, r)) {
            out.insert("selected", "false");
        }
    }

    toggle::infer_checked(&states, &mut out);
    toggle::infer_pressed(node, &states, &mut out);

    let tag = out.lower("tag");
    if matches!(tag.as_str(), "td" | "th") {
        let spans = [
            ("colspan", soft("col_span", node.col_span())),
            ("rowspan", soft("row_span", node.row_span())),
        ];
        for (key, span) in spans {
            let span = span.filter(|s| *s > 0).unwrap_or(1);
            out.fill(key, span.to_string());
        }
    }
    if tag == "table" {
        out.fill("layout-guess", "false");
    }

    if out.is_blank("tabindex")
        && !form::DOCUMENT_LEVEL_TAGS.contains(&tag.as_str())
        && role_is(&out, "tab")
        && (states.either(&State::Focusable, "focusable") || states.either(&State::Focused, "focused"))
    {
        out.insert("tabindex", "0");
    }

    form::infer_form_attrs(node, &mut out);
    combobox::infer_expanded(node, chain, &mut out, scope.limits);

    let tag = out.lower("tag");
    if !CONTROL_TAGS.contains(&tag.as_str()) {
        out.remove("MSAA Role");
    }
    if tag == crate::chain::DOCUMENT_TAG {
        out.remove("readonly");
    }

    if out.lower("description-from") == "aria-describedby" {
        let description = out.text("description").to_string();
        if !description.is_empty() {
            out.fill("describedby-text", description);
        }
    }

    out
}
