//! Capability traits for the host accessibility runtime.
//!
//! The inspector never owns accessibility nodes. Everything it knows about a
//! node comes through [`AccessibleNode`], and everything it knows about the
//! user's position comes through [`HostContext`]. Every accessor may fail;
//! callers wrap them with [`soft`] so a broken accessor reads as absent data.

pub mod html;
pub mod memory;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Raw attribute source exposed by a node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawAttributes {
    /// Structured key/value pairs, in host order
    Map(Vec<(String, String)>),
    /// Delimited blob: `key:value;key:value;`
    Text(String),
    #[default]
    Absent,
}

/// Host role enumerator (the runtime's own role constants, not ARIA roles)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    #[default]
    Unknown,
    Document,
    Link,
    Button,
    ToggleButton,
    CheckBox,
    RadioButton,
    Switch,
    EditableText,
    ComboBox,
    List,
    ListItem,
    Graphic,
    Heading,
    Paragraph,
    Section,
    Table,
    TableRow,
    TableCell,
    TableColumnHeader,
    Tab,
    TabList,
    TreeItem,
    StaticText,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Unknown => "unknown",
            Role::Document => "document",
            Role::Link => "link",
            Role::Button => "button",
            Role::ToggleButton => "toggle-button",
            Role::CheckBox => "check-box",
            Role::RadioButton => "radio-button",
            Role::Switch => "switch",
            Role::EditableText => "editable-text",
            Role::ComboBox => "combo-box",
            Role::List => "list",
            Role::ListItem => "list-item",
            Role::Graphic => "graphic",
            Role::Heading => "heading",
            Role::Paragraph => "paragraph",
            Role::Section => "section",
            Role::Table => "table",
            Role::TableRow => "table-row",
            Role::TableCell => "table-cell",
            Role::TableColumnHeader => "table-column-header",
            Role::Tab => "tab",
            Role::TabList => "tab-list",
            Role::TreeItem => "tree-item",
            Role::StaticText => "static-text",
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" => Role::Document,
            "link" => Role::Link,
            "button" => Role::Button,
            "toggle-button" | "togglebutton" => Role::ToggleButton,
            "check-box" | "checkbox" => Role::CheckBox,
            "radio-button" | "radiobutton" => Role::RadioButton,
            "switch" => Role::Switch,
            "editable-text" | "editabletext" => Role::EditableText,
            "combo-box" | "combobox" => Role::ComboBox,
            "list" => Role::List,
            "list-item" | "listitem" => Role::ListItem,
            "graphic" => Role::Graphic,
            "heading" => Role::Heading,
            "paragraph" => Role::Paragraph,
            "section" => Role::Section,
            "table" => Role::Table,
            "table-row" | "tablerow" => Role::TableRow,
            "table-cell" | "tablecell" => Role::TableCell,
            "table-column-header" | "tablecolumnheader" => Role::TableColumnHeader,
            "tab" => Role::Tab,
            "tab-list" | "tablist" => Role::TabList,
            "tree-item" | "treeitem" => Role::TreeItem,
            "static-text" | "statictext" => Role::StaticText,
            _ => Role::Unknown,
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

/// Discrete state flag reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum State {
    Required,
    Focusable,
    Focused,
    Selected,
    Selectable,
    Expanded,
    Collapsed,
    Checkable,
    Checked,
    HalfChecked,
    Pressed,
    On,
    Off,
    ReadOnly,
    Multiline,
    Editable,
    HasPopup,
    Linked,
    Unavailable,
    /// A state this crate has no constant for, kept by display name
    Other(String),
}

impl State {
    /// Spoken display name, used for best-effort substring matching
    pub fn display_name(&self) -> &str {
        match self {
            State::Required => "required",
            State::Focusable => "focusable",
            State::Focused => "focused",
            State::Selected => "selected",
            State::Selectable => "selectable",
            State::Expanded => "expanded",
            State::Collapsed => "collapsed",
            State::Checkable => "checkable",
            State::Checked => "checked",
            State::HalfChecked => "half checked",
            State::Pressed => "pressed",
            State::On => "on",
            State::Off => "off",
            State::ReadOnly => "read only",
            State::Multiline => "multi line",
            State::Editable => "editable",
            State::HasPopup => "has popup",
            State::Linked => "linked",
            State::Unavailable => "unavailable",
            State::Other(name) => name,
        }
    }
}

impl From<String> for State {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "required" => State::Required,
            "focusable" => State::Focusable,
            "focused" => State::Focused,
            "selected" => State::Selected,
            "selectable" => State::Selectable,
            "expanded" => State::Expanded,
            "collapsed" => State::Collapsed,
            "checkable" => State::Checkable,
            "checked" => State::Checked,
            "half checked" | "half-checked" => State::HalfChecked,
            "pressed" => State::Pressed,
            "on" => State::On,
            "off" => State::Off,
            "read only" | "read-only" | "readonly" => State::ReadOnly,
            "multi line" | "multi-line" | "multiline" => State::Multiline,
            "editable" => State::Editable,
            "has popup" | "has-popup" | "haspopup" => State::HasPopup,
            "linked" => State::Linked,
            "unavailable" => State::Unavailable,
            _ => State::Other(s),
        }
    }
}

impl From<State> for String {
    fn from(state: State) -> Self {
        state.display_name().to_string()
    }
}

/// Read-only handle into the host accessibility tree
///
/// Identity (`Eq`/`Hash`) must follow the underlying host object, so two
/// handles to the same node compare equal.
pub trait AccessibleNode: Clone + Eq + Hash {
    fn parent(&self) -> Result<Option<Self>>;

    fn first_child(&self) -> Result<Option<Self>>;

    fn next_sibling(&self) -> Result<Option<Self>>;

    /// Engine-level attributes (IA2 object attributes or equivalent)
    fn raw_attributes(&self) -> Result<RawAttributes>;

    fn name(&self) -> Result<Option<String>>;

    fn description(&self) -> Result<Option<String>>;

    fn value(&self) -> Result<Option<String>>;

    fn role(&self) -> Result<Role>;

    fn states(&self) -> Result<Vec<State>>;

    /// Table cell column span, when the host exposes one
    fn col_span(&self) -> Result<Option<u32>> {
        Ok(None)
    }

    /// Table cell row span, when the host exposes one
    fn row_span(&self) -> Result<Option<u32>> {
        Ok(None)
    }

    /// Legacy value-based URL (MSAA accValue on links and documents)
    fn legacy_value_url(&self) -> Result<Option<String>> {
        Ok(None)
    }

    /// Document location known to the tree-navigation context (virtual buffer)
    fn tree_context_url(&self) -> Result<Option<String>> {
        Ok(None)
    }

    /// Application-provided current-URL accessor, looked up by name
    fn app_url(&self, _accessor: &str) -> Result<Option<String>> {
        Ok(None)
    }

    /// Whether the node sits under an interactive browse-mode text layer
    fn in_browse_mode(&self) -> Result<bool> {
        Ok(false)
    }
}

/// Where the user currently is
pub trait HostContext {
    type Node: AccessibleNode;

    fn focus(&self) -> Result<Option<Self::Node>>;

    /// Review / navigator object
    fn navigator(&self) -> Result<Option<Self::Node>>;

    /// Node at the browse-mode text cursor
    fn caret(&self) -> Result<Option<Self::Node>>;
}

/// Degrade a failing host accessor to its empty value
pub fn soft<T: Default>(accessor: &str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::trace!(accessor, error = %e, "host accessor failed");
            T::default()
        }
    }
}

/// Snapshot of a node's state flags with both lookup styles
#[derive(Debug, Clone, Default)]
pub struct StateSet(Vec<State>);

impl StateSet {
    pub fn of<N: AccessibleNode>(node: &N) -> Self {
        Self(soft("states", node.states()))
    }

    pub fn contains(&self, state: &State) -> bool {
        self.0.contains(state)
    }

    /// Substring match against display names, case-insensitive
    pub fn has_name(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.0
            .iter()
            .any(|s| s.display_name().to_lowercase().contains(&needle))
    }

    /// Typed constant or display-name match
    pub fn either(&self, state: &State, needle: &str) -> bool {
        self.contains(state) || self.has_name(needle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &State> {
        self.0.iter()
    }
}

impl FromIterator<State> for StateSet {
    fn from_iter<I: IntoIterator<Item = State>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_swallows_errors() {
        let failed: Result<Option<String>> = Err(anyhow::anyhow!("boom"));
        assert_eq!(soft("name", failed), None);
        assert_eq!(soft("role", Ok(Role::Button)), Role::Button);
        assert_eq!(soft::<Role>("role", Err(anyhow::anyhow!("gone"))), Role::Unknown);
    }

    #[test]
    fn test_state_name_matching() {
        let states: StateSet = [State::Focusable, State::Other("Switch On".to_string())]
            .into_iter()
            .collect();
        assert!(states.has_name("on"));
        assert!(states.has_name("FOCUS"));
        assert!(!states.has_name("off"));
        assert!(states.either(&State::Focusable, "nothing"));
        assert!(!states.contains(&State::Focused));
    }

    #[test]
    fn test_state_round_trips_through_names() {
        assert_eq!(State::from("read-only".to_string()), State::ReadOnly);
        assert_eq!(
            State::from("busy".to_string()),
            State::Other("busy".to_string())
        );
        assert_eq!(String::from(State::HasPopup), "has popup");
    }

    #[test]
    fn test_role_parsing_accepts_compact_names() {
        assert_eq!(Role::from("togglebutton".to_string()), Role::ToggleButton);
        assert_eq!(Role::from("Toggle-Button".to_string()), Role::ToggleButton);
        assert_eq!(Role::from("spaceship".to_string()), Role::Unknown);
    }
}
