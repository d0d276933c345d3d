//! Configuration document model.
//!
//! A component's configuration is a tree of named nodes. A node with no
//! children is a *leaf* and carries one name/value pair; a node with
//! children is a *branch* and contributes nothing itself, only through its
//! descendants.
//!
//! ## Flattening
//!
//! Walking from the root to every leaf yields a dot-joined path name per
//! leaf. Consider:
//!
//! ```text
//! Application1
//! ├── Logging
//! │   ├── Log1Location : somewhere1
//! │   └── Log2Location : somewhere2
//! └── Services
//!     └── Service1Location : somewhere3
//! ```
//!
//! The path to `somewhere3` is `Application1.Services.Service1Location`.
//! All path names within one document must be pairwise distinct; the check
//! runs when a flat view is requested, not on mutation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    #[error("Invalid configuration - the following names appear more than once: {}", names.join(", "))]
    DuplicateNames { names: Vec<String> },
}

/// One node of a configuration tree.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigNode {
    pub name: String,
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ConfigNode>>,
}

impl ConfigNode {
    /// A node carrying a single name/value pair.
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            children: None,
        }
    }

    /// A node that only groups other nodes.
    pub fn branch(name: impl Into<String>, children: Vec<ConfigNode>) -> Self {
        Self {
            name: name.into(),
            value: None,
            children: Some(children),
        }
    }

    /// Flatten the tree into a map of dot-joined path names to values.
    ///
    /// Fails if two leaves produce the same path name; the error lists every
    /// colliding name. No other validation happens here - empty names and
    /// values simply become empty strings after trimming.
    pub fn flatten(&self) -> Result<BTreeMap<String, String>, TreeError> {
        let pairs = self.name_value_pairs();

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for (name, _) in &pairs {
            *counts.entry(name).or_default() += 1;
        }
        let duplicates: Vec<String> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name.to_string())
            .collect();
        if !duplicates.is_empty() {
            return Err(TreeError::DuplicateNames { names: duplicates });
        }

        Ok(pairs.into_iter().collect())
    }

    /// All (path name, value) pairs for the leaves under this node. Leaf
    /// names and values are trimmed; ancestor names join the path as-is.
    fn name_value_pairs(&self) -> Vec<(String, String)> {
        match &self.children {
            Some(children) if !children.is_empty() => children
                .iter()
                .flat_map(|child| {
                    child
                        .name_value_pairs()
                        .into_iter()
                        .map(|(path, value)| (format!("{}.{}", self.name, path), value))
                })
                .collect(),
            _ => vec![(
                self.name.trim().to_string(),
                self.value.as_deref().unwrap_or("").trim().to_string(),
            )],
        }
    }
}

/// The root of the configuration tree for one component.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigRoot {
    /// The component's unique key, e.g. "StorageService".
    pub component_name: String,
    /// When this configuration was last modified.
    pub last_modified: DateTime<Utc>,
    /// The config data itself. By convention `data.name` matches
    /// `component_name`, but the model does not enforce that.
    pub data: ConfigNode,
}

impl ConfigRoot {
    pub fn new(component_name: impl Into<String>, data: ConfigNode) -> Self {
        Self {
            component_name: component_name.into(),
            last_modified: Utc::now(),
            data,
        }
    }

    /// Give the document a new identity: the component name and, by
    /// convention, the root node's name.
    pub fn rename(&mut self, component_name: impl Into<String>) {
        self.component_name = component_name.into();
        self.data.name = self.component_name.clone();
    }
}
