//! Web Element Inspector: report what assistive technology sees of a web element
//!
//! This library walks an accessibility tree from the element under the user,
//! normalizes and augments each node's attributes, and renders them as text or
//! heading-navigable HTML. Hosts plug in through [`host::AccessibleNode`] and
//! [`host::HostContext`]; an in-memory tree and an HTML-backed tree ship with
//! the crate. Python bindings (PyO3) are available behind the
//! `extension-module` feature.

pub mod attributes;
pub mod canonical;
pub mod chain;
pub mod config;
pub mod format;
pub mod host;
pub mod infer;
pub mod markup;
pub mod model;
pub mod session;
pub mod traverse;
pub mod url;

// Python bindings (only compiled when building as Python extension)
#[cfg(feature = "extension-module")]
pub mod python;

use anyhow::{Context, Result};

pub use config::InspectorConfig;
pub use host::html::{HtmlDocument, HtmlOptions};
pub use model::{Inspection, Report, ReportMode};
pub use session::Inspector;

/// Inspect the focused element of an HTML document
///
/// # Arguments
/// * `html` - Document source
/// * `options` - Document URL and CSS selector of the focused element
/// * `mode` - `Basic` for the element and its ancestors, `Advanced` to also
///   explore its children
///
/// # Returns
/// The report, or one of the gating outcomes
pub fn inspect_html(
    html: &str,
    options: &HtmlOptions,
    mode: ReportMode,
    config: &InspectorConfig,
) -> Result<Inspection> {
    let document = HtmlDocument::parse(html, options)?;
    tracing::debug!(nodes = document.tree().len(), focus = ?document.focus(), "document lowered");
    Ok(Inspector::new(config.clone()).inspect(&document.context(), mode))
}

/// Inspect a JSON accessibility-tree fixture
///
/// `node` names the fixture key to inspect; without it the fixture's own
/// `focus`/`navigator` keys are used.
pub fn inspect_fixture(
    json: &str,
    node: Option<&str>,
    mode: ReportMode,
    config: &InspectorConfig,
) -> Result<Inspection> {
    let (tree, mut fixture) = host::memory::MemoryTree::from_json(json)?;
    if let Some(key) = node {
        fixture.focus = Some(key.to_string());
        fixture.navigator = None;
    }
    let ctx = host::memory::MemoryContext::from_fixture(&tree, &fixture)?;
    Ok(Inspector::new(config.clone()).inspect(&ctx, mode))
}

/// Fetch a remote document for inspection
pub async fn fetch_document(url: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .header(
            "User-Agent",
            concat!("web-element-inspector/", env!("CARGO_PKG_VERSION")),
        )
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Failed to fetch {}: HTTP {}", url, response.status());
    }

    Ok(response.text().await?)
}

/// Render an inspection as plain text
///
/// Gating outcomes render as their user-facing message.
pub fn render_text(inspection: &Inspection) -> String {
    match inspection {
        Inspection::Report(report) => format::render_text(report),
        other => format!("{}\n", other.message().unwrap_or_default()),
    }
}

/// Render an inspection as heading-navigable HTML
pub fn render_html(inspection: &Inspection) -> String {
    match inspection {
        Inspection::Report(report) => markup::render_html(report),
        other => format!(
            "<p>{}</p>",
            markup::escape_html(other.message().unwrap_or_default())
        ),
    }
}

/// Render an inspection as Markdown
pub fn render_markdown(inspection: &Inspection) -> String {
    match inspection {
        Inspection::Report(report) => markup::render_markdown(report),
        other => other.message().unwrap_or_default().to_string(),
    }
}

/// Keys in the order a report lists them, after alias normalization
pub fn report_order(keys: &[String]) -> Vec<String> {
    let attrs: model::AttrMap = keys
        .iter()
        .map(|k| (attributes::normalize_key(k), String::new()))
        .collect();
    format::ordered_keys(&attrs)
        .into_iter()
        .map(str::to_string)
        .collect()
}
