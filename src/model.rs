use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalized attribute mapping of one node
///
/// Keys are trimmed and alias-normalized before anything else reads them.
/// Storage is ordered so iteration is deterministic; report ordering is
/// decided by [`crate::format::ordered_keys`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttrMap(BTreeMap<String, String>);

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Trimmed value, empty when absent
    pub fn text(&self, key: &str) -> &str {
        self.get(key).map(str::trim).unwrap_or("")
    }

    /// Trimmed, lowercased value, empty when absent
    pub fn lower(&self, key: &str) -> String {
        self.text(key).to_lowercase()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Absent or whitespace-only
    pub fn is_blank(&self, key: &str) -> bool {
        self.text(key).is_empty()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Insert only when the key is blank; returns whether it was written
    pub fn fill(&mut self, key: &str, value: impl Into<String>) -> bool {
        if self.is_blank(key) {
            self.insert(key, value);
            true
        } else {
            false
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttrMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One `key=value` line of a report block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub key: String,
    pub value: String,
}

/// Titled block for one node: tag plus ordered, non-empty parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportBlock {
    pub tag: String,
    pub params: Vec<Param>,
}

impl ReportBlock {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }
}

/// Descendant of the canonical node, rendered in the advanced report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildBlock {
    /// 1 for direct children
    pub depth: usize,
    pub block: ReportBlock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildrenSection {
    pub entries: Vec<ChildBlock>,
    /// Node cap was reached; more descendants may exist
    pub truncated: bool,
}

/// Which command produced the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    Basic,
    Advanced,
}

impl ReportMode {
    pub fn title(&self) -> &'static str {
        match self {
            ReportMode::Basic => "Element Information",
            ReportMode::Advanced => "Advanced Element Information",
        }
    }
}

/// Full inspection report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub mode: ReportMode,
    pub canonical: ReportBlock,
    /// Original node when the canonical node was promoted from it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested: Option<ReportBlock>,
    /// Tag-bearing ancestors of the canonical node, nearest first
    pub ancestors: Vec<ReportBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<ChildrenSection>,
}

impl Report {
    /// Canonical, nested and ancestor blocks in report order
    pub fn blocks(&self) -> impl Iterator<Item = &ReportBlock> {
        std::iter::once(&self.canonical)
            .chain(self.nested.iter())
            .chain(self.ancestors.iter())
    }
}

pub const NO_ELEMENT_MESSAGE: &str = "No element found.";
pub const NOT_WEB_CONTEXT_MESSAGE: &str =
    "HTML Element Inspector works only when Browse Mode (virtual buffer) is available.";

/// Outcome of one inspection command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Inspection {
    Report(Report),
    NoElement,
    NotWebContext,
}

impl Inspection {
    /// User-facing message for the gating outcomes
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Inspection::Report(_) => None,
            Inspection::NoElement => Some(NO_ELEMENT_MESSAGE),
            Inspection::NotWebContext => Some(NOT_WEB_CONTEXT_MESSAGE),
        }
    }

    pub fn report(&self) -> Option<&Report> {
        match self {
            Inspection::Report(r) => Some(r),
            _ => None,
        }
    }
}
