//! Form-field inference.

use super::role_is;
use crate::attributes::tag_of;
use crate::host::{soft, AccessibleNode, State, StateSet};
use crate::model::AttrMap;

const FORM_TAGS: [&str; 4] = ["input", "textarea", "select", "button"];

/// Roles that mark a node as a form field
pub const INTERACTIVE_ROLES: [&str; 14] = [
    "button",
    "checkbox",
    "radio",
    "combobox",
    "listbox",
    "textbox",
    "searchbox",
    "slider",
    "spinbutton",
    "menuitem",
    "option",
    "switch",
    "tab",
    "treeitem",
];

/// Tags that are never form fields
pub const DOCUMENT_LEVEL_TAGS: [&str; 3] = ["#document", "body", "html"];

/// Normalize a checked value; unknown variants are kept
pub fn normalize_checked(value: &str) -> Option<&'static str> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "mixed" => Some("true"),
        "0" | "false" | "no" | "off" => Some("false"),
        _ => None,
    }
}

/// Form-field marker, control flags and label routing for `node`
pub fn infer_form_attrs<N: AccessibleNode>(node: &N, attrs: &mut AttrMap) {
    if let Some(checked) = attrs.get("checked").and_then(normalize_checked) {
        attrs.insert("checked", checked);
    }

    let description_from = attrs.lower("description-from");
    if description_from == "tooltip" && attrs.contains("label") && attrs.is_blank("title") {
        if let Some(label) = attrs.remove("label") {
            attrs.insert("title", label);
        }
    }

    let tag = match attrs.lower("tag") {
        t if t.is_empty() => tag_of(node),
        t => t,
    };

    if DOCUMENT_LEVEL_TAGS.contains(&tag.as_str()) {
        attrs.remove("fsFormField");
    } else if !attrs.contains("fsFormField") {
        let interactive = FORM_TAGS.contains(&tag.as_str())
            || INTERACTIVE_ROLES.iter().any(|r| role_is(attrs, r));
        if interactive {
            attrs.insert("fsFormField", "true");
        }
    }

    if matches!(tag.as_str(), "input" | "textarea") {
        let input_type = attrs.text("text-input-type").to_string();
        if !input_type.is_empty() {
            attrs.fill("type", input_type);
        }
    }

    if matches!(tag.as_str(), "input" | "textarea" | "select") {
        let input_name = attrs.text("html-input-name").to_string();
        if !input_name.is_empty() {
            attrs.fill("name", input_name);
        }
    }

    match tag.as_str() {
        "textarea" => {
            attrs.fill("multiline", "true");
        }
        "input" => {
            attrs.fill("multiline", "false");
        }
        _ => {}
    }

    if attrs.is_blank("required") && StateSet::of(node).either(&State::Required, "required") {
        attrs.insert("required", "true");
    }

    if attrs.is_blank("label") {
        route_label(node, &description_from, attrs);
    }
}

// Own name when it came from an attribute, else the description by provenance.
fn route_label<N: AccessibleNode>(node: &N, description_from: &str, attrs: &mut AttrMap) {
    let name = soft("name", node.name()).unwrap_or_default();
    let name = name.trim();
    if !name.is_empty() && attrs.lower("name-from") == "attribute" {
        attrs.insert("label", name);
        return;
    }

    let description = soft("description", node.description()).unwrap_or_default();
    let description = description.trim();
    if description.is_empty() {
        return;
    }
    let target = match description_from {
        "aria-describedby" => "description",
        "tooltip" => "title",
        _ => "label",
    };
    attrs.fill(target, description);
}
