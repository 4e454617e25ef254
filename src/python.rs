//! PyO3 bindings for web-element-inspector
//!
//! This module exposes the Rust library to Python via FFI.

use std::collections::HashMap;

use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;

use crate::{HtmlOptions, InspectorConfig, ReportMode};

fn to_py_err(e: anyhow::Error) -> PyErr {
    PyRuntimeError::new_err(format!("{e:#}"))
}

fn mode(advanced: bool) -> ReportMode {
    if advanced {
        ReportMode::Advanced
    } else {
        ReportMode::Basic
    }
}

/// Inspect the focused element of an HTML document
///
/// Args:
///     html (str): Document source
///     selector (str | None): CSS selector of the focused element
///         (default: first focusable element, else body)
///     url (str | None): Document URL used to resolve relative links
///     advanced (bool): Also explore the element's children (default: False)
///
/// Returns:
///     str: Plain-text report, or the gating message
#[pyfunction]
#[pyo3(signature = (html, selector=None, url=None, advanced=false))]
fn inspect_html(
    html: String,
    selector: Option<String>,
    url: Option<String>,
    advanced: bool,
) -> PyResult<String> {
    let options = HtmlOptions { url, selector };
    let inspection =
        crate::inspect_html(&html, &options, mode(advanced), &InspectorConfig::default())
            .map_err(to_py_err)?;
    Ok(crate::render_text(&inspection))
}

/// Inspect a JSON accessibility-tree fixture
///
/// Args:
///     tree (str): Fixture JSON
///     node (str | None): Node key to inspect (default: the fixture's focus)
///     advanced (bool): Also explore the element's children (default: False)
///
/// Returns:
///     str: JSON string with the inspection outcome
#[pyfunction]
#[pyo3(signature = (tree, node=None, advanced=false))]
fn inspect_tree(tree: String, node: Option<String>, advanced: bool) -> PyResult<String> {
    let inspection = crate::inspect_fixture(
        &tree,
        node.as_deref(),
        mode(advanced),
        &InspectorConfig::default(),
    )
    .map_err(to_py_err)?;
    serde_json::to_string(&inspection)
        .map_err(|e| PyRuntimeError::new_err(format!("JSON serialization error: {}", e)))
}

/// Format one report block
///
/// Args:
///     tag (str): Tag name used in the header
///     attrs (dict[str, str]): Attribute mapping
///
/// Returns:
///     str: Header line plus `key=value` lines in report order
#[pyfunction]
fn format_block(tag: String, attrs: HashMap<String, String>) -> String {
    let attrs: crate::model::AttrMap = attrs.into_iter().collect();
    crate::format::format_tag_block(&tag, &attrs)
}

/// Web Element Inspector Python module
#[pymodule]
fn _web_element_inspector(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(inspect_html, m)?)?;
    m.add_function(wrap_pyfunction!(inspect_tree, m)?)?;
    m.add_function(wrap_pyfunction!(format_block, m)?)?;
    Ok(())
}
