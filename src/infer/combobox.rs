//! Combobox expansion from page structure.
//!
//! Comboboxes on dynamic pages often fail to expose `expanded`. The popup is
//! detected instead: a known open-suggestions class on an ancestor, or any
//! listbox reachable from the surrounding container.

use crate::attributes::{extract, tag_of};
use crate::config::Limits;
use crate::host::AccessibleNode;
use crate::model::AttrMap;
use crate::traverse::{BoundedWalk, Bounds};

/// Class of the search-suggestions container on a well-known search page
pub const SUGGEST_CONTAINER_CLASS: &str = "a8sbwf";
/// Class added to that container while suggestions are open
pub const SUGGEST_OPEN_CLASS: &str = "emcav";

pub fn is_combobox(attrs: &AttrMap) -> bool {
    attrs.lower("xml-roles").contains("combobox")
        || attrs.lower("role") == "combobox"
        || attrs.lower("haspopup") == "listbox"
}

fn class_of<N: AccessibleNode>(node: &N) -> String {
    extract(node).lower("class")
}

fn is_listbox(attrs: &AttrMap) -> bool {
    attrs.lower("xml-roles") == "listbox" || attrs.lower("role") == "listbox"
}

/// Fill `expanded` for comboboxes that do not expose it
pub fn infer_expanded<N: AccessibleNode>(node: &N, chain: &[N], attrs: &mut AttrMap, limits: &Limits) {
    if !is_combobox(attrs) || !attrs.is_blank("expanded") {
        return;
    }

    let open = chain.iter().any(|n| {
        let class = class_of(n);
        class.contains(SUGGEST_CONTAINER_CLASS) && class.contains(SUGGEST_OPEN_CLASS)
    });
    if open {
        attrs.insert("expanded", "true");
        return;
    }

    let start = chain
        .iter()
        .find(|n| tag_of(*n) == "div" && class_of(*n).contains(SUGGEST_CONTAINER_CLASS))
        .or_else(|| chain.iter().find(|n| tag_of(*n) == "div"))
        .unwrap_or(node);

    let bounds = Bounds::new(limits.combobox_scan_nodes, None, limits.sibling_fanout);
    let found = BoundedWalk::from_root(start, bounds).any(|(n, _)| is_listbox(&extract(&n)));
    tracing::trace!(found, "combobox listbox scan");
    attrs.insert("expanded", if found { "true" } else { "false" });
}
