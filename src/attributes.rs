//! Attribute extraction: one canonical mapping out of a node's raw sources.

use crate::host::{soft, AccessibleNode, RawAttributes};
use crate::model::AttrMap;
use crate::url::is_web_url;

/// Canonical spelling for aliased attribute keys
///
/// Idempotent: `normalize_key(normalize_key(k)) == normalize_key(k)`.
pub fn normalize_key(key: &str) -> String {
    let key = key.trim();
    match key.to_ascii_lowercase().as_str() {
        "aria-describedby" | "describedby" => "describedby".to_string(),
        "aria-checked" | "checked" | "ariachecked" => "checked".to_string(),
        "formcontrolname" => "formcontrolname".to_string(),
        _ => key.to_string(),
    }
}

/// Re-key a mapping through [`normalize_key`]
pub fn normalize_aliases(attrs: &AttrMap) -> AttrMap {
    attrs
        .iter()
        .map(|(k, v)| (normalize_key(k), v.to_string()))
        .collect()
}

/// Split an object-attribute blob (`key:value;key:value;`)
///
/// Backslash escapes the delimiters, the way engines escape `:`, `;`, `,`
/// and `=` inside values.
pub fn parse_attribute_text(blob: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    for entry in split_unescaped(blob, ';') {
        let mut parts = split_unescaped(&entry, ':').into_iter();
        let Some(key) = parts.next() else { continue };
        let rest: Vec<String> = parts.collect();
        if rest.is_empty() {
            continue;
        }
        let key = unescape(&key);
        let value = unescape(&rest.join(":"));
        if !key.trim().is_empty() {
            entries.push((key.trim().to_string(), value.trim().to_string()));
        }
    }
    entries
}

// Splits on `delim` not preceded by a backslash; escapes are kept intact.
fn split_unescaped(s: &str, delim: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            current.push(c);
            if let Some(next) = chars.next() {
                current.push(next);
            }
        } else if c == delim {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    if !current.trim().is_empty() {
        parts.push(current);
    }
    parts
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Extract the normalized attribute mapping of `node`
///
/// Never fails: a broken accessor only skips what it would have contributed.
pub fn extract<N: AccessibleNode>(node: &N) -> AttrMap {
    let entries = match soft("attributes", node.raw_attributes()) {
        RawAttributes::Map(entries) => entries,
        RawAttributes::Text(blob) if !blob.trim().is_empty() => parse_attribute_text(&blob),
        RawAttributes::Text(_) | RawAttributes::Absent => Vec::new(),
    };

    let mut out = AttrMap::new();
    for (key, value) in entries {
        if key.trim().is_empty() {
            continue;
        }
        out.insert(normalize_key(&key), value.trim());
    }

    enrich(node, &mut out);
    out
}

fn enrich<N: AccessibleNode>(node: &N, out: &mut AttrMap) {
    if !out.contains("orientation") && out.contains("aria-orientation") {
        let v = out.text("aria-orientation").to_string();
        out.insert("orientation", v);
    }
    if !out.contains("valuetext") && out.contains("aria-valuetext") {
        let v = out.text("aria-valuetext").to_string();
        out.insert("valuetext", v);
    }

    if !out.contains("value") {
        let value = [out.text("aria-valuenow"), out.text("aria-valuetext")]
            .into_iter()
            .find(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| {
                soft("value", node.value())
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
            });
        if let Some(v) = value {
            out.insert("value", v);
        }
    }

    // A link exposing its target only through the value reads as its href.
    if out.lower("tag") == "a" && out.is_blank("href") {
        let v = out.text("value").to_string();
        if is_web_url(&v) {
            out.insert("href", v);
            out.remove("value");
        }
    }
}

/// Lowercase tag of a node, empty when it has none
pub fn tag_of<N: AccessibleNode>(node: &N) -> String {
    extract(node).lower("tag")
}
