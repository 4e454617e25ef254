//! Checked and pressed inference for switches, checkboxes and toggle buttons.

use super::role_is;
use crate::host::{soft, AccessibleNode, Role, State, StateSet};
use crate::model::AttrMap;

/// Tags a toggle may carry; the empty tag is accepted too
const TOGGLE_TAGS: [&str; 5] = ["button", "a", "div", "span", ""];

fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// `checked` for nodes marked `checkable`; always `true` or `false`
pub fn infer_checked(states: &StateSet, attrs: &mut AttrMap) {
    if !attrs.contains("checkable") || !attrs.is_blank("checked") {
        return;
    }
    let switch = role_is(attrs, "switch");
    let mut checked = false;

    if switch {
        // "off" only confirms the default
        checked = states.has_name("on") || states.contains(&State::On);
    }
    if !checked {
        checked = states.either(&State::Checked, "checked");
    }
    if !checked && switch {
        checked = states.either(&State::Pressed, "pressed");
    }

    attrs.insert("checked", bool_text(checked));
}

/// Parse an aria-pressed style hint
pub fn pressed_hint(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "0" | "false" | "no" => Some(false),
        "1" | "true" | "yes" => Some(true),
        _ => None,
    }
}

/// Toggle-button judgement: ARIA role or host role
pub fn is_toggle<N: AccessibleNode>(node: &N, attrs: &AttrMap) -> bool {
    role_is(attrs, "togglebutton") || soft("role", node.role()) == Role::ToggleButton
}

// Links never report pressed; any other role keeps a bare aria-pressed hint
fn supports_pressed<N: AccessibleNode>(node: &N, attrs: &AttrMap) -> bool {
    !role_is(attrs, "link") && soft("role", node.role()) != Role::Link
}

/// `pressed` from toggle semantics; consumes `aria-pressed`
pub fn infer_pressed<N: AccessibleNode>(node: &N, states: &StateSet, attrs: &mut AttrMap) {
    let hint = attrs
        .remove("aria-pressed")
        .and_then(|v| pressed_hint(&v));

    if attrs.is_blank("pressed")
        && is_toggle(node, attrs)
        && TOGGLE_TAGS.contains(&attrs.lower("tag").as_str())
    {
        let pressed = states.either(&State::Pressed, "pressed")
            || states.either(&State::Checked, "checked")
            || hint.unwrap_or(false);
        attrs.insert("pressed", bool_text(pressed));
    }

    if attrs.is_blank("pressed") && role_is(attrs, "tab") && attrs.text("selected") == "true" {
        attrs.insert("pressed", "true");
    }

    if let Some(hint) = hint {
        if attrs.is_blank("pressed") && supports_pressed(node, attrs) {
            attrs.insert("pressed", bool_text(hint));
        }
    }

    if let Some(normalized) = pressed_hint(attrs.text("pressed")) {
        attrs.insert("pressed", bool_text(normalized));
    }
}
