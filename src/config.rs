use crate::chain::DEFAULT_CHAIN_DEPTH;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a default config file
pub const CONFIG_ENV: &str = "WEB_ELEMENT_INSPECTOR_CONFIG";

/// Caps on every walk the inspector performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Parent steps in an ancestry chain
    pub chain_depth: usize,
    /// Nodes checked for an interactive container (start node included)
    pub container_steps: usize,
    /// Nodes scanned for a listbox under a combobox
    pub combobox_scan_nodes: usize,
    /// Descendants rendered in the advanced report
    pub subtree_nodes: usize,
    pub subtree_depth: usize,
    /// Children read per node during any downward walk
    pub sibling_fanout: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            chain_depth: DEFAULT_CHAIN_DEPTH,
            container_steps: 7,
            combobox_scan_nodes: 260,
            subtree_nodes: 30,
            subtree_depth: 3,
            sibling_fanout: 50,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Verbose node dumps in the debug log
    pub debug: bool,
    pub limits: Limits,
}

impl InspectorConfig {
    /// Load a JSON config file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Config named by `WEB_ELEMENT_INSPECTOR_CONFIG`, else defaults
    pub fn from_env() -> Result<Self> {
        match config_path_from_env() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_chain_depth_matches_walker() {
        assert_eq!(Limits::default().chain_depth, DEFAULT_CHAIN_DEPTH);
        let config: InspectorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.limits.chain_depth, DEFAULT_CHAIN_DEPTH);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"debug": true, "limits": {{"subtree_nodes": 5}}}}"#).unwrap();

        let config = InspectorConfig::load(file.path()).unwrap();
        assert!(config.debug);
        assert_eq!(config.limits.subtree_nodes, 5);
        assert_eq!(config.limits.chain_depth, 40);
        assert_eq!(config.limits.combobox_scan_nodes, 260);
    }

    #[test]
    fn test_invalid_config_names_the_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = InspectorConfig::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid config"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(InspectorConfig::load(&dir.path().join("absent.json")).is_err());
    }
}
