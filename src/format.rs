//! Plain-text report formatting

use crate::model::{AttrMap, Param, Report, ReportBlock};

/// Keys in report order; anything else follows, sorted case-insensitively
pub const PREFERRED_ORDER: [&str; 52] = [
    "tag",
    "id",
    "class",
    "role",
    "xml-roles",
    "orientation",
    "MSAA Role",
    "IA2 Role",
    "href",
    "src",
    "type",
    "text-input-type",
    "name",
    "html-input-name",
    "accessible-name",
    "accessible-name-from",
    "formcontrolname",
    "value",
    "valuetext",
    "required",
    "multiline",
    "contenteditable",
    "tabindex",
    "maxlength",
    "autocomplete",
    "haspopup",
    "expanded",
    "selected",
    "checkable",
    "checked",
    "pressed",
    "label",
    "title",
    "describedby",
    "description",
    "description-from",
    "labelledby",
    "name-from",
    "explicit-name",
    "explicit-name-from",
    "level",
    "posinset",
    "setsize",
    "colspan",
    "rowspan",
    "table-cell-index",
    "readonly",
    "fsFormField",
    "display",
    "layout-guess",
    "text-align",
    "text-model",
];

/// Keys of `attrs` in report order
pub fn ordered_keys(attrs: &AttrMap) -> Vec<&str> {
    let mut keys: Vec<&str> = PREFERRED_ORDER
        .iter()
        .copied()
        .filter(|k| attrs.contains(k))
        .collect();

    let mut rest: Vec<&str> = attrs
        .keys()
        .filter(|k| !PREFERRED_ORDER.iter().any(|p| p == k))
        .collect();
    rest.sort_by_key(|k| k.to_lowercase());

    keys.extend(rest);
    keys
}

/// Block for one node; empty values are dropped
pub fn block(tag: &str, attrs: &AttrMap) -> ReportBlock {
    let params = ordered_keys(attrs)
        .into_iter()
        .filter_map(|key| {
            let value = attrs.text(key);
            (!value.is_empty()).then(|| Param {
                key: key.to_string(),
                value: value.to_string(),
            })
        })
        .collect();
    ReportBlock {
        tag: tag.to_string(),
        params,
    }
}

/// Header line of a block
pub fn header(block: &ReportBlock) -> String {
    format!(
        "Tag {} has {} parameters:",
        block.tag.to_uppercase(),
        block.params.len()
    )
}

/// Header and `key=value` lines, without the surrounding blank lines
pub fn block_body(block: &ReportBlock) -> String {
    let mut text = header(block);
    for param in &block.params {
        text.push('\n');
        text.push_str(&format!("{}={}", param.key, param.value));
    }
    text
}

/// Full block: blank line, header, pairs, blank line
pub fn render_block(block: &ReportBlock) -> String {
    format!("\n{}\n", block_body(block))
}

/// Render `attrs` of a `tag` node as a block
pub fn format_tag_block(tag: &str, attrs: &AttrMap) -> String {
    render_block(&block(tag, attrs))
}

/// Plain-text report
pub fn render_text(report: &Report) -> String {
    let mut lines: Vec<String> = vec![format!("{}:", report.mode.title())];

    lines.push(render_block(&report.canonical).trim_end().to_string());
    if let Some(nested) = &report.nested {
        lines.push("Nested element:".to_string());
        lines.push(render_block(nested).trim_end().to_string());
    }
    for ancestor in &report.ancestors {
        lines.push(render_block(ancestor).trim_end().to_string());
    }

    let mut text = lines.join("\n").trim().to_string();
    text.push('\n');
    text
}
