//! Translation trees and the dotted-path utilities that operate on them.
//!
//! A translation document is a nested map whose leaves are strings. The
//! tree is an explicit tagged type, so every walk over it is driven by the
//! variant rather than by inspecting what a value happens to look like.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Separator between segments of a dotted key path.
pub const SEPARATOR: char = '.';

/// A node in a translation document: either a leaf string or a nested map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TranslationTree {
    /// A translated string
    Leaf(String),

    /// A nested container keyed by path segment
    Node(BTreeMap<String, TranslationTree>),
}

impl TranslationTree {
    /// Create an empty container.
    pub fn new() -> Self {
        TranslationTree::Node(BTreeMap::new())
    }

    /// Create a leaf holding `value`.
    pub fn leaf(value: impl Into<String>) -> Self {
        TranslationTree::Leaf(value.into())
    }

    /// The string value if this is a leaf.
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            TranslationTree::Leaf(value) => Some(value),
            TranslationTree::Node(_) => None,
        }
    }

    /// The children if this is a container.
    pub fn as_node(&self) -> Option<&BTreeMap<String, TranslationTree>> {
        match self {
            TranslationTree::Leaf(_) => None,
            TranslationTree::Node(children) => Some(children),
        }
    }

    /// `true` for a container with no children.
    pub fn is_empty(&self) -> bool {
        matches!(self, TranslationTree::Node(children) if children.is_empty())
    }

    /// Deep-merge `other` into `self`.
    ///
    /// Containers are unioned level by level; anything else in `other`
    /// replaces what was there (a leaf overwrites a leaf or a container, a
    /// container overwrites a leaf).
    pub fn merge(&mut self, other: TranslationTree) {
        match (self, other) {
            (TranslationTree::Node(ours), TranslationTree::Node(theirs)) => {
                for (key, value) in theirs {
                    match ours.get_mut(&key) {
                        Some(existing) => existing.merge(value),
                        None => {
                            ours.insert(key, value);
                        }
                    }
                }
            }
            (slot, other) => *slot = other,
        }
    }

    /// Children of this node, turning a leaf into an empty container first.
    fn make_node(&mut self) -> &mut BTreeMap<String, TranslationTree> {
        match self {
            TranslationTree::Node(children) => children,
            TranslationTree::Leaf(_) => {
                *self = TranslationTree::new();
                self.make_node()
            }
        }
    }
}

impl Default for TranslationTree {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TranslationTree {
    fn from(value: &str) -> Self {
        TranslationTree::Leaf(value.to_string())
    }
}

impl From<String> for TranslationTree {
    fn from(value: String) -> Self {
        TranslationTree::Leaf(value)
    }
}

/// JSON objects become containers and strings become leaves. Arrays,
/// numbers and booleans are opaque leaves holding their JSON text; `null`
/// is an empty container.
impl From<Value> for TranslationTree {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => TranslationTree::Node(
                map.into_iter()
                    .map(|(key, value)| (key, TranslationTree::from(value)))
                    .collect(),
            ),
            Value::String(text) => TranslationTree::Leaf(text),
            Value::Null => TranslationTree::new(),
            other => TranslationTree::Leaf(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for TranslationTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(TranslationTree::from)
    }
}

/// Non-empty segments of a dotted path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|segment| !segment.is_empty())
}

/// Flatten `tree` into a map from dotted path to leaf value.
///
/// Every path is prefixed with `prefix` unless the prefix is empty. Only
/// containers are descended into.
pub fn flatten(tree: &TranslationTree, prefix: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    flatten_into(tree, prefix, &mut out);
    out
}

fn flatten_into(tree: &TranslationTree, prefix: &str, out: &mut BTreeMap<String, String>) {
    match tree {
        TranslationTree::Leaf(value) => {
            if !prefix.is_empty() {
                out.insert(prefix.to_string(), value.clone());
            }
        }
        TranslationTree::Node(children) => {
            for (key, child) in children {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}{}{}", prefix, SEPARATOR, key)
                };
                flatten_into(child, &path, out);
            }
        }
    }
}

/// Walk `path` from `root`, creating empty containers for missing
/// intermediate segments.
///
/// Returns the container that holds the final segment together with that
/// segment's name, so the caller can read or write the slot. A leaf found in
/// an intermediate position is replaced by an empty container.
pub fn traverse<'a>(
    path: &str,
    root: &'a mut TranslationTree,
) -> (&'a mut BTreeMap<String, TranslationTree>, String) {
    let mut parts: Vec<&str> = segments(path).collect();
    let last = parts.pop().unwrap_or_default().to_string();

    let mut container = root.make_node();
    for part in parts {
        container = container
            .entry(part.to_string())
            .or_insert_with(TranslationTree::new)
            .make_node();
    }

    (container, last)
}

/// Read-only lookup of the node at `path`.
pub fn lookup<'a>(path: &str, root: &'a TranslationTree) -> Option<&'a TranslationTree> {
    segments(path).try_fold(root, |node, segment| node.as_node()?.get(segment))
}

/// Build the smallest tree holding `value` at `path`.
pub fn gen(path: &str, value: impl Into<TranslationTree>) -> TranslationTree {
    let mut root = TranslationTree::new();
    let (container, key) = traverse(path, &mut root);
    container.insert(key, value.into());
    root
}
