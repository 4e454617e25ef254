//! Accessibility tree for a static HTML document.
//!
//! Lowers a `scraper` DOM into a [`MemoryTree`] shaped the way a browser
//! exposes pages to screen readers: a `#document` root, engine-style object
//! attributes (`tag`, `xml-roles`, `text-input-type`, ...), host roles and
//! state flags, accessible names and descriptions with their provenance.
//! Hidden content is left out. Layout-dependent facts are not modelled.

use super::memory::{MemoryContext, MemoryTree, NodeSpec, TreeBuilder};
use super::{Role, State};
use ::url::Url;
use anyhow::{anyhow, bail, Context, Result};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// Elements that never reach the accessibility tree
const SKIPPED_TAGS: [&str; 6] = ["head", "script", "style", "template", "noscript", "title"];

/// ARIA attributes surfaced as states or renamed keys instead of passed through
const ARIA_LOWERED: [&str; 11] = [
    "aria-hidden",
    "aria-expanded",
    "aria-selected",
    "aria-required",
    "aria-disabled",
    "aria-readonly",
    "aria-multiline",
    "aria-haspopup",
    "aria-level",
    "aria-posinset",
    "aria-setsize",
];

/// Plain attributes copied through unchanged
const COPIED_ATTRIBUTES: [&str; 8] = [
    "id",
    "class",
    "contenteditable",
    "tabindex",
    "placeholder",
    "maxlength",
    "autocomplete",
    "formcontrolname",
];

const TEXT_INPUT_TYPES: [&str; 8] = [
    "text", "search", "email", "url", "tel", "password", "number", "date",
];

const CHECKABLE_ROLES: [&str; 5] = [
    "checkbox",
    "radio",
    "switch",
    "menuitemcheckbox",
    "menuitemradio",
];

/// Tags and roles whose accessible name comes from their text
const NAME_FROM_CONTENT_TAGS: [&str; 16] = [
    "a", "button", "h1", "h2", "h3", "h4", "h5", "h6", "option", "td", "th", "label", "summary",
    "legend", "caption", "li",
];
const NAME_FROM_CONTENT_ROLES: [&str; 13] = [
    "button", "link", "tab", "option", "menuitem", "treeitem", "heading", "cell", "gridcell",
    "columnheader", "switch", "checkbox", "radio",
];

#[derive(Debug, Clone, Default)]
pub struct HtmlOptions {
    /// Document location; relative links resolve against it
    pub url: Option<String>,
    /// CSS selector of the focused element
    pub selector: Option<String>,
}

/// Lowered document plus the focused node
#[derive(Debug)]
pub struct HtmlDocument {
    tree: MemoryTree,
    focus: Option<usize>,
}

impl HtmlDocument {
    /// Parse `html` and lower it
    ///
    /// Without a selector the focus lands on the first focusable element, or
    /// on `body`.
    pub fn parse(html: &str, options: &HtmlOptions) -> Result<Self> {
        let document = Html::parse_document(html);
        let base = options
            .url
            .as_deref()
            .map(Url::parse)
            .transpose()
            .context("Invalid document URL")?;

        let lowering = Lowering::new(&document, base.as_ref());

        let target = match &options.selector {
            Some(css) => {
                let selector = Selector::parse(css)
                    .map_err(|e| anyhow!("Invalid selector: {:?}", e))?;
                let Some(element) = document.select(&selector).next() else {
                    bail!("No element matches selector: {}", css);
                };
                if !lowering.is_exposed_in_tree(element) {
                    bail!("Element matching {} is not exposed to assistive technology", css);
                }
                Some(element)
            }
            None => lowering.first_focusable(),
        };

        let (mut tree, focus) = lowering.build(target);
        if let Some(index) = focus {
            tree.set_focused(index);
        }
        Ok(Self { tree, focus })
    }

    pub fn tree(&self) -> &MemoryTree {
        &self.tree
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// Host context with focus, navigator and caret on the focused node
    pub fn context(&self) -> MemoryContext<'_> {
        self.tree.context_at(self.focus)
    }
}

struct Lowering<'a> {
    document: &'a Html,
    base: Option<&'a Url>,
    ids: HashMap<String, ElementRef<'a>>,
    labels: HashMap<String, ElementRef<'a>>,
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn text_of(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl<'a> Lowering<'a> {
    fn new(document: &'a Html, base: Option<&'a Url>) -> Self {
        let mut ids = HashMap::new();
        let mut labels = HashMap::new();
        for element in document.root_element().descendants().filter_map(ElementRef::wrap) {
            let e = element.value();
            if let Some(id) = e.attr("id") {
                ids.entry(id.to_string()).or_insert(element);
            }
            if e.name() == "label" {
                if let Some(target) = e.attr("for") {
                    labels.entry(target.to_string()).or_insert(element);
                }
            }
        }
        Self {
            document,
            base,
            ids,
            labels,
        }
    }

    fn resolve(&self, reference: &str) -> String {
        match self.base.map(|b| b.join(reference)) {
            Some(Ok(url)) => url.to_string(),
            _ => reference.to_string(),
        }
    }

    fn is_exposed(&self, element: ElementRef<'_>) -> bool {
        let e = element.value();
        let tag = e.name().to_ascii_lowercase();
        !SKIPPED_TAGS.contains(&tag.as_str())
            && e.attr("hidden").is_none()
            && e.attr("aria-hidden") != Some("true")
            && !(tag == "input" && e.attr("type").is_some_and(|t| t.eq_ignore_ascii_case("hidden")))
    }

    fn is_exposed_in_tree(&self, element: ElementRef<'_>) -> bool {
        self.is_exposed(element)
            && element
                .ancestors()
                .filter_map(ElementRef::wrap)
                .all(|a| self.is_exposed(a))
    }

    fn first_focusable(&self) -> Option<ElementRef<'a>> {
        self.document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|e| is_focusable(*e) && self.is_exposed_in_tree(*e))
    }

    /// Lower the whole document; returns the tree and the index of `target`
    /// (or of `body` when there is no target)
    fn build(&self, target: Option<ElementRef<'a>>) -> (MemoryTree, Option<usize>) {
        let mut builder = TreeBuilder::new().browse_mode(true);
        let mut doc = NodeSpec::tagged("#document").role(Role::Document);
        if let Some(url) = self.base {
            builder = builder.document_url(url.as_str());
            doc = doc.attr("href", url.as_str()).legacy_url(url.as_str());
        }
        if let Some(title) = self.title() {
            doc = doc.name(&title);
        }
        let doc_index = builder.root(doc);

        let root = self.document.root_element();
        let root_index = builder.child(doc_index, self.element_spec(root));
        let mut work = vec![(root, root_index)];
        let mut focus = None;
        let mut body = None;

        while let Some((element, index)) = work.pop() {
            if target == Some(element) {
                focus = Some(index);
            }
            if element.value().name() == "body" {
                body = Some(index);
            }
            for child in element.children() {
                if let Some(child_element) = ElementRef::wrap(child) {
                    if self.is_exposed(child_element) {
                        let child_index = builder.child(index, self.element_spec(child_element));
                        work.push((child_element, child_index));
                    }
                } else if let Some(text) = child.value().as_text() {
                    let text = collapse_whitespace(text);
                    if !text.is_empty() {
                        builder.child(index, NodeSpec::untagged().role(Role::StaticText).name(&text));
                    }
                }
            }
        }

        (builder.build(), focus.or(body))
    }

    fn title(&self) -> Option<String> {
        self.document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name() == "title")
            .map(text_of)
            .filter(|t| !t.is_empty())
    }

    fn element_spec(&self, element: ElementRef<'a>) -> NodeSpec {
        let e = element.value();
        let tag = e.name().to_ascii_lowercase();
        let aria_role = aria_role(element);
        let mut spec = NodeSpec::tagged(&tag);

        for key in COPIED_ATTRIBUTES {
            if let Some(value) = e.attr(key) {
                spec = spec.attr(key, value);
            }
        }
        if !aria_role.is_empty() {
            spec = spec.attr("xml-roles", &aria_role);
        }
        for (key, value) in e.attrs() {
            if key.starts_with("aria-") && !ARIA_LOWERED.contains(&key) {
                spec = spec.attr(key, value);
            }
        }

        if let Some(href) = e.attr("href") {
            let href = self.resolve(href);
            if tag == "a" {
                spec = spec.legacy_url(&href);
            }
            spec = spec.attr("href", &href);
        }
        if let Some(src) = e.attr("src") {
            spec = spec.attr("src", &self.resolve(src));
        }

        if tag == "input" && TEXT_INPUT_TYPES.contains(&input_type(element).as_str()) {
            spec = spec.attr("text-input-type", &input_type(element));
        }
        if matches!(tag.as_str(), "input" | "textarea" | "select") {
            if let Some(name) = non_empty(e.attr("name")) {
                spec = spec.attr("html-input-name", name);
            }
        }
        if let Some(popup) = non_empty(e.attr("aria-haspopup")).filter(|p| *p != "false") {
            spec = spec.attr("haspopup", &popup.to_ascii_lowercase());
        }
        if let Some(level) = heading_level(element) {
            spec = spec.attr("level", &level);
        }
        for (aria, key) in [("aria-posinset", "posinset"), ("aria-setsize", "setsize")] {
            if let Some(value) = non_empty(e.attr(aria)) {
                spec = spec.attr(key, value);
            }
        }
        if is_checkable(element, &aria_role) {
            spec = spec.attr("checkable", "true");
        }
        if e.attr("aria-label").is_some() || e.attr("aria-labelledby").is_some() {
            spec = spec.attr("explicit-name", "true");
        }
        if matches!(tag.as_str(), "td" | "th") {
            let span = |key| e.attr(key).and_then(|v| v.trim().parse::<u32>().ok()).unwrap_or(1);
            spec = spec.spans(span("colspan"), span("rowspan"));
        }

        let name = self.accessible_name(element, &tag, &aria_role);
        if let Some((name, from)) = &name {
            spec = spec.name(name).attr("name-from", from);
        }
        let name_from_title = name.as_ref().is_some_and(|(_, from)| *from == "title");
        if let Some((description, from)) = self.description(element, name_from_title) {
            spec = spec.description(&description).attr("description-from", from);
        }
        if let Some(value) = value_of(element, &tag) {
            spec = spec.value(&value);
        }

        spec = spec.role(host_role(element, &tag, &aria_role));
        for state in states(element, &tag, &aria_role) {
            spec = spec.state(state);
        }
        spec
    }

    fn referenced_text(&self, ids: &str) -> String {
        let parts: Vec<String> = ids
            .split_whitespace()
            .filter_map(|id| self.ids.get(id))
            .map(|e| text_of(*e))
            .filter(|t| !t.is_empty())
            .collect();
        parts.join(" ")
    }

    /// Name and its source, following the usual precedence of name sources
    fn accessible_name(
        &self,
        element: ElementRef<'a>,
        tag: &str,
        aria_role: &str,
    ) -> Option<(String, &'static str)> {
        let e = element.value();

        if let Some(ids) = e.attr("aria-labelledby") {
            let text = self.referenced_text(ids);
            if !text.is_empty() {
                return Some((text, "related-element"));
            }
        }
        if let Some(label) = non_empty(e.attr("aria-label")) {
            return Some((label.to_string(), "attribute"));
        }
        if matches!(tag, "input" | "select" | "textarea") {
            let explicit = e.attr("id").and_then(|id| self.labels.get(id)).copied();
            let wrapping = || {
                element
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .find(|a| a.value().name() == "label")
            };
            if let Some(label) = explicit.or_else(wrapping) {
                let text = text_of(label);
                if !text.is_empty() {
                    return Some((text, "related-element"));
                }
            }
        }
        if matches!(tag, "img" | "area") || (tag == "input" && input_type(element) == "image") {
            if let Some(alt) = non_empty(e.attr("alt")) {
                return Some((alt.to_string(), "attribute"));
            }
        }
        if tag == "input" && matches!(input_type(element).as_str(), "button" | "submit" | "reset") {
            if let Some(value) = non_empty(e.attr("value")) {
                return Some((value.to_string(), "attribute"));
            }
        }
        if NAME_FROM_CONTENT_TAGS.contains(&tag) || NAME_FROM_CONTENT_ROLES.contains(&aria_role) {
            let text = text_of(element);
            if !text.is_empty() {
                return Some((text, "contents"));
            }
        }
        if let Some(title) = non_empty(e.attr("title")) {
            return Some((title.to_string(), "title"));
        }
        non_empty(e.attr("placeholder")).map(|p| (p.to_string(), "placeholder"))
    }

    fn description(
        &self,
        element: ElementRef<'a>,
        name_from_title: bool,
    ) -> Option<(String, &'static str)> {
        let e = element.value();
        if let Some(ids) = e.attr("aria-describedby") {
            let text = self.referenced_text(ids);
            if !text.is_empty() {
                return Some((text, "aria-describedby"));
            }
        }
        if name_from_title {
            return None;
        }
        non_empty(e.attr("title")).map(|t| (t.to_string(), "tooltip"))
    }
}

fn aria_role(element: ElementRef<'_>) -> String {
    element
        .value()
        .attr("role")
        .and_then(|r| r.split_whitespace().next())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn input_type(element: ElementRef<'_>) -> String {
    element
        .value()
        .attr("type")
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "text".to_string())
}

fn heading_level(element: ElementRef<'_>) -> Option<String> {
    if let Some(level) = non_empty(element.value().attr("aria-level")) {
        return Some(level.to_string());
    }
    let tag = element.value().name();
    match tag.as_bytes() {
        [b'h', d @ b'1'..=b'6'] => Some(char::from(*d).to_string()),
        _ => None,
    }
}

fn is_checkable(element: ElementRef<'_>, aria_role: &str) -> bool {
    let native = element.value().name() == "input"
        && matches!(input_type(element).as_str(), "checkbox" | "radio");
    native || CHECKABLE_ROLES.contains(&aria_role)
}

fn is_focusable(element: ElementRef<'_>) -> bool {
    let e = element.value();
    if e.attr("disabled").is_some() {
        return false;
    }
    if let Some(tabindex) = e.attr("tabindex") {
        return tabindex.trim().parse::<i32>().is_ok_and(|t| t >= 0);
    }
    match e.name() {
        "a" | "area" => e.attr("href").is_some(),
        "button" | "input" | "select" | "textarea" | "summary" => true,
        _ => matches!(e.attr("contenteditable"), Some("" | "true")),
    }
}

fn value_of(element: ElementRef<'_>, tag: &str) -> Option<String> {
    let e = element.value();
    let value = match tag {
        "input" if !matches!(input_type(element).as_str(), "checkbox" | "radio") => {
            e.attr("value").map(str::to_string)
        }
        "textarea" => Some(element.text().collect::<String>()),
        "select" => {
            let options: Vec<ElementRef<'_>> = element
                .descendants()
                .filter_map(ElementRef::wrap)
                .filter(|o| o.value().name() == "option")
                .collect();
            options
                .iter()
                .find(|o| o.value().attr("selected").is_some())
                .or(options.first())
                .map(|o| text_of(*o))
        }
        "progress" | "meter" => e.attr("value").map(str::to_string),
        _ => None,
    };
    value.filter(|v| !v.trim().is_empty())
}

fn host_role(element: ElementRef<'_>, tag: &str, aria_role: &str) -> Role {
    let e = element.value();
    let pressable = e.attr("aria-pressed").is_some();
    let by_aria = match aria_role {
        "button" if pressable => Role::ToggleButton,
        "button" => Role::Button,
        "link" => Role::Link,
        "checkbox" | "menuitemcheckbox" => Role::CheckBox,
        "radio" | "menuitemradio" => Role::RadioButton,
        "switch" => Role::Switch,
        "combobox" => Role::ComboBox,
        "textbox" | "searchbox" => Role::EditableText,
        "listbox" | "list" => Role::List,
        "option" | "listitem" => Role::ListItem,
        "tab" => Role::Tab,
        "tablist" => Role::TabList,
        "treeitem" => Role::TreeItem,
        "heading" => Role::Heading,
        "img" | "image" => Role::Graphic,
        "table" | "grid" => Role::Table,
        "row" => Role::TableRow,
        "cell" | "gridcell" => Role::TableCell,
        "columnheader" => Role::TableColumnHeader,
        "region" | "group" => Role::Section,
        _ => Role::Unknown,
    };
    if by_aria != Role::Unknown {
        return by_aria;
    }

    match tag {
        "a" if e.attr("href").is_some() => Role::Link,
        "button" if pressable => Role::ToggleButton,
        "button" => Role::Button,
        "input" => match input_type(element).as_str() {
            "checkbox" => Role::CheckBox,
            "radio" => Role::RadioButton,
            "button" | "submit" | "reset" | "image" => Role::Button,
            _ => Role::EditableText,
        },
        "textarea" => Role::EditableText,
        "select" if e.attr("multiple").is_some() => Role::List,
        "select" => Role::ComboBox,
        "ul" | "ol" => Role::List,
        "li" | "option" => Role::ListItem,
        "img" | "svg" => Role::Graphic,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Role::Heading,
        "p" => Role::Paragraph,
        "div" | "section" | "article" | "main" | "nav" | "aside" | "header" | "footer" | "form" => {
            Role::Section
        }
        "table" => Role::Table,
        "tr" => Role::TableRow,
        "td" => Role::TableCell,
        "th" => Role::TableColumnHeader,
        _ => Role::Unknown,
    }
}

fn aria_true(element: ElementRef<'_>, key: &str) -> bool {
    element
        .value()
        .attr(key)
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

fn states(element: ElementRef<'_>, tag: &str, aria_role: &str) -> Vec<State> {
    let e = element.value();
    let mut states = Vec::new();
    let mut add = |cond: bool, state: State| {
        if cond {
            states.push(state);
        }
    };

    let input_type = input_type(element);
    let textual = (tag == "input" && TEXT_INPUT_TYPES.contains(&input_type.as_str()))
        || tag == "textarea"
        || matches!(aria_role, "textbox" | "searchbox");
    let editable_content = matches!(e.attr("contenteditable"), Some("" | "true"));

    add(is_focusable(element), State::Focusable);
    add(
        e.attr("disabled").is_some() || aria_true(element, "aria-disabled"),
        State::Unavailable,
    );
    add(
        e.attr("required").is_some() || aria_true(element, "aria-required"),
        State::Required,
    );
    add(
        e.attr("readonly").is_some() || aria_true(element, "aria-readonly"),
        State::ReadOnly,
    );
    add(
        tag == "textarea" || aria_true(element, "aria-multiline"),
        State::Multiline,
    );
    add(textual || editable_content, State::Editable);
    add(tag == "a" && e.attr("href").is_some(), State::Linked);

    let popup = e.attr("aria-haspopup").is_some_and(|p| p.trim() != "false");
    add(popup, State::HasPopup);

    match e.attr("aria-expanded").map(str::trim) {
        Some("true") => add(true, State::Expanded),
        Some("false") => add(true, State::Collapsed),
        _ => {}
    }

    let selectable = matches!(aria_role, "tab" | "option" | "treeitem") || tag == "option";
    add(selectable, State::Selectable);
    add(
        aria_true(element, "aria-selected") || (tag == "option" && e.attr("selected").is_some()),
        State::Selected,
    );

    if is_checkable(element, aria_role) {
        add(true, State::Checkable);
        let aria_checked = e.attr("aria-checked").map(|v| v.trim().to_ascii_lowercase());
        let checked = aria_checked.as_deref() == Some("true")
            || (aria_checked.is_none() && e.attr("checked").is_some());
        if aria_role == "switch" {
            add(true, if checked { State::On } else { State::Off });
        } else if aria_checked.as_deref() == Some("mixed") {
            add(true, State::HalfChecked);
        } else {
            add(checked, State::Checked);
        }
    }

    add(aria_true(element, "aria-pressed"), State::Pressed);
    states
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::extract;
    use crate::host::{AccessibleNode, HostContext};

    fn parse(html: &str, selector: Option<&str>) -> HtmlDocument {
        let options = HtmlOptions {
            url: Some("https://example.com/dir/page.html".to_string()),
            selector: selector.map(str::to_string),
        };
        HtmlDocument::parse(html, &options).unwrap()
    }

    #[test]
    fn test_document_root_and_links() {
        let doc = parse(
            r#"<html><head><title>Shop</title></head><body>
               <a id="home" href="/"><img src="logo.png" alt="Logo"></a>
               </body></html>"#,
            Some("img"),
        );
        let root = doc.tree().root().unwrap();
        let attrs = extract(&root);
        assert_eq!(attrs.get("tag"), Some("#document"));
        assert_eq!(attrs.get("href"), Some("https://example.com/dir/page.html"));
        assert_eq!(root.name().unwrap().as_deref(), Some("Shop"));

        let img = doc.context().focus().unwrap().unwrap();
        let img_attrs = extract(&img);
        assert_eq!(img_attrs.get("src"), Some("https://example.com/dir/logo.png"));
        assert_eq!(img.name().unwrap().as_deref(), Some("Logo"));
        assert!(img.states().unwrap().contains(&State::Focused));

        let link = img.parent().unwrap().unwrap();
        assert_eq!(extract(&link).get("href"), Some("https://example.com/"));
        assert_eq!(link.role().unwrap(), Role::Link);
        assert_eq!(
            link.legacy_value_url().unwrap().as_deref(),
            Some("https://example.com/")
        );
    }

    #[test]
    fn test_hidden_content_is_skipped() {
        let doc = parse(
            r#"<body><script>var x;</script><div hidden><button>Gone</button></div>
               <p aria-hidden="true">no</p><input type="hidden" name="csrf"><p>kept</p></body>"#,
            None,
        );
        let tags: Vec<String> = (0..doc.tree().len())
            .filter_map(|i| doc.tree().node(i))
            .map(|n| extract(&n).lower("tag"))
            .filter(|t| !t.is_empty())
            .collect();
        assert_eq!(tags, vec!["#document", "html", "body", "p"]);
    }

    #[test]
    fn test_form_control_attributes() {
        let doc = parse(
            r#"<body><form>
               <label for="email">Email address</label>
               <input id="email" type="email" name="user_email" required
                      aria-describedby="hint" value="a@b.c">
               <span id="hint">We never share it</span>
               </form></body>"#,
            Some("#email"),
        );
        let input = doc.context().focus().unwrap().unwrap();
        let attrs = extract(&input);
        assert_eq!(attrs.get("text-input-type"), Some("email"));
        assert_eq!(attrs.get("html-input-name"), Some("user_email"));
        assert_eq!(attrs.get("describedby"), Some("hint"));
        assert_eq!(attrs.get("name-from"), Some("related-element"));
        assert_eq!(attrs.get("description-from"), Some("aria-describedby"));
        assert_eq!(attrs.get("value"), Some("a@b.c"));
        assert_eq!(input.name().unwrap().as_deref(), Some("Email address"));
        assert_eq!(
            input.description().unwrap().as_deref(),
            Some("We never share it")
        );
        let states = input.states().unwrap();
        assert!(states.contains(&State::Required));
        assert!(states.contains(&State::Editable));
        assert_eq!(input.role().unwrap(), Role::EditableText);
    }

    #[test]
    fn test_aria_widgets() {
        let doc = parse(
            r#"<body>
               <button id="mute" aria-pressed="true">Mute</button>
               <div id="wifi" role="switch" aria-checked="false" tabindex="0" aria-label="Wi-Fi"></div>
               <div id="menu" role="button" aria-haspopup="menu" aria-expanded="false">Options</div>
               </body>"#,
            None,
        );
        let tree = doc.tree();
        let find = |id: &str| {
            (0..tree.len())
                .filter_map(|i| tree.node(i))
                .find(|n| extract(n).get("id") == Some(id))
                .unwrap()
        };

        let mute = find("mute");
        assert_eq!(mute.role().unwrap(), Role::ToggleButton);
        assert!(mute.states().unwrap().contains(&State::Pressed));
        assert_eq!(extract(&mute).get("aria-pressed"), Some("true"));

        let wifi = find("wifi");
        let attrs = extract(&wifi);
        assert_eq!(attrs.get("xml-roles"), Some("switch"));
        assert_eq!(attrs.get("checkable"), Some("true"));
        assert_eq!(attrs.get("explicit-name"), Some("true"));
        assert_eq!(attrs.get("name-from"), Some("attribute"));
        assert!(wifi.states().unwrap().contains(&State::Off));

        let menu = find("menu");
        let attrs = extract(&menu);
        assert_eq!(attrs.get("haspopup"), Some("menu"));
        assert!(!attrs.contains("aria-expanded"));
        assert!(menu.states().unwrap().contains(&State::Collapsed));

        // First focusable element gets the focus by default.
        assert_eq!(doc.focus(), Some(mute.index()));
    }

    #[test]
    fn test_selector_errors() {
        let options = HtmlOptions {
            url: None,
            selector: Some("#missing".to_string()),
        };
        let err = HtmlDocument::parse("<p>x</p>", &options).unwrap_err();
        assert!(err.to_string().contains("No element matches"));

        let options = HtmlOptions {
            url: None,
            selector: Some("[[".to_string()),
        };
        assert!(HtmlDocument::parse("<p>x</p>", &options).is_err());

        let options = HtmlOptions {
            url: None,
            selector: Some("div p".to_string()),
        };
        let err = HtmlDocument::parse("<body><div hidden><p>x</p></div></body>", &options)
            .unwrap_err();
        assert!(err.to_string().contains("not exposed"));
    }

    #[test]
    fn test_defaults_to_body_without_focusable() {
        let doc = parse("<body><p>Just text</p></body>", None);
        let focus = doc.context().focus().unwrap().unwrap();
        assert_eq!(extract(&focus).get("tag"), Some("body"));
    }

    #[test]
    fn test_table_spans_and_headings() {
        let doc = parse(
            r#"<body><h2>Prices</h2><table><tr><th colspan="2">Item</th></tr>
               <tr><td>a</td><td rowspan="3">b</td></tr></table></body>"#,
            Some("th"),
        );
        let th = doc.context().focus().unwrap().unwrap();
        assert_eq!(th.col_span().unwrap(), Some(2));
        assert_eq!(th.row_span().unwrap(), Some(1));

        let doc = parse(r#"<body><h2 id="t">Prices</h2></body>"#, Some("h2"));
        let h2 = doc.context().focus().unwrap().unwrap();
        assert_eq!(extract(&h2).get("level"), Some("2"));
        assert_eq!(extract(&h2).get("name-from"), Some("contents"));
    }
}
