//! Accessible-name provenance.

use crate::model::AttrMap;

const TRUTHY: [&str; 4] = ["true", "1", "yes", "on"];

/// Classify the engine's `name-from` signal against the keys actually present
///
/// Generic signals are only specialized when the evidence is exposed: a
/// `related-element` source becomes `aria-labelledby` only with a labelledby
/// key, and `attribute` becomes `aria-label` only with an aria-label key.
pub fn classify(name_from: &str, attrs: &AttrMap) -> String {
    let name_from = name_from.trim();
    match name_from {
        "related-element" => {
            if has_any(attrs, &["labelledby", "aria-labelledby"]) {
                "aria-labelledby".to_string()
            } else {
                name_from.to_string()
            }
        }
        "attribute" => {
            if has_any(attrs, &["aria-label", "aria_label"]) {
                "aria-label".to_string()
            } else {
                "attribute".to_string()
            }
        }
        "contents" | "content" => "content".to_string(),
        "label" | "label-for" | "labelfor" => "label".to_string(),
        other => other.to_string(),
    }
}

fn has_any(attrs: &AttrMap, keys: &[&str]) -> bool {
    keys.iter().any(|k| !attrs.is_blank(k))
}

/// Record `accessible-name-from` and, for explicit names, `explicit-name-from`
pub fn apply_provenance(attrs: &mut AttrMap) {
    let computed = classify(attrs.text("name-from"), attrs);
    if computed.is_empty() {
        return;
    }

    let existing = attrs.text("accessible-name-from");
    let replace = existing.is_empty() || (existing == "attribute" && computed.starts_with("aria-"));
    if replace {
        attrs.insert("accessible-name-from", computed.clone());
    }

    if TRUTHY.contains(&attrs.lower("explicit-name").as_str()) {
        attrs.fill("explicit-name-from", computed);
    }
}
