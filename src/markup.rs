//! Heading-navigable HTML and Markdown renderings of a report.
//!
//! Every block becomes its own heading so a screen reader can jump between
//! elements; the block text itself is kept verbatim in a `<pre>`.

use crate::format::block_body;
use crate::model::{Report, ReportBlock, ReportMode};
use htmd::options::{HeadingStyle, Options};
use htmd::HtmlToMarkdown;

pub const TRUNCATED_NOTE: &str = "... truncated (limits reached)";
pub const NO_CHILDREN_NOTE: &str = "No children exposed.";
pub const SUBTREE_HIDDEN_NOTE: &str = "Note: subtree not exposed by the accessibility API.";

/// Escape text for HTML element content and attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn pre(block: &ReportBlock) -> String {
    format!("<pre>{}</pre>", escape_html(&block_body(block)))
}

fn tag_heading(level: u8, block: &ReportBlock) -> String {
    format!(
        "<h{level}>Tag {}</h{level}>",
        escape_html(&block.tag.to_uppercase())
    )
}

// Canonical, nested and ancestor blocks under headings of `level`
fn push_blocks(parts: &mut Vec<String>, report: &Report, level: u8) {
    parts.push(tag_heading(level, &report.canonical));
    parts.push(pre(&report.canonical));
    if let Some(nested) = &report.nested {
        parts.push("<p>Nested element:</p>".to_string());
        parts.push(tag_heading(level, nested));
        parts.push(pre(nested));
    }
    for ancestor in &report.ancestors {
        parts.push(tag_heading(level, ancestor));
        parts.push(pre(ancestor));
    }
}

/// Basic report as HTML: `<h1>` title, one `<h2>` per block
pub fn render_basic_html(report: &Report) -> String {
    let mut parts = vec![format!("<h1>{}</h1>", escape_html(report.mode.title()))];
    push_blocks(&mut parts, report, 2);
    parts.join("\n")
}

/// Advanced report as HTML, including the children section
pub fn render_advanced_html(report: &Report) -> String {
    let mut parts = vec![
        format!("<h1>{}</h1>", ReportMode::Advanced.title()),
        "<h2>Focused element</h2>".to_string(),
    ];
    push_blocks(&mut parts, report, 3);

    parts.push("<h2>Children</h2>".to_string());
    match &report.children {
        Some(children) if !children.entries.is_empty() => {
            for (i, child) in children.entries.iter().enumerate() {
                let level = match child.depth {
                    0 | 1 => 3,
                    2 => 4,
                    _ => 5,
                };
                parts.push(format!(
                    "<h{level}>Child {}: {}</h{level}>",
                    i + 1,
                    escape_html(&child.block.tag.to_uppercase())
                ));
                parts.push(pre(&child.block));
            }
            if children.truncated {
                parts.push(format!("<p>{TRUNCATED_NOTE}</p>"));
            }
        }
        _ => {
            parts.push(format!("<p>{NO_CHILDREN_NOTE}</p>"));
            parts.push(format!("<p>{SUBTREE_HIDDEN_NOTE}</p>"));
        }
    }

    parts.join("\n")
}

/// HTML rendering matching the report's mode
pub fn render_html(report: &Report) -> String {
    match report.mode {
        ReportMode::Basic => render_basic_html(report),
        ReportMode::Advanced => render_advanced_html(report),
    }
}

/// Markdown conversion of [`render_html`]
pub fn render_markdown(report: &Report) -> String {
    let converter = HtmlToMarkdown::builder()
        .options(Options {
            heading_style: HeadingStyle::Atx,
            ..Default::default()
        })
        .build();
    converter
        .convert(&render_html(report))
        .unwrap_or_default()
        .trim()
        .to_string()
}
