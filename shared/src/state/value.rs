use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single step along a path into a state tree
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Step {
    Key(String),
    Index(usize),
}

/// Full address of a leaf, from the root of a state tree
pub type Path = Vec<Step>;

/// A state tree: internal nodes are mappings (keys unique, ascending order)
/// or sequences, leaves are numeric or textual scalars.
///
/// `Null` is the explicit "absent" sentinel. Merging treats it as a no-op,
/// so a delta can carry sparse sequences without clobbering entries it does
/// not mention; the flip side is that merge can never explicitly clear a
/// field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Number(f64),
    Text(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// A fresh empty mapping
    pub fn map() -> Self {
        Value::Map(BTreeMap::new())
    }

    /// A fresh empty sequence
    pub fn list() -> Self {
        Value::List(Vec::new())
    }

    /// Whether this node can hold children
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Map(_) | Value::List(_))
    }

    /// Whether this is a finite numeric leaf
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Number(n) if n.is_finite())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Child at a single step, if present
    pub fn get(&self, step: &Step) -> Option<&Value> {
        match (self, step) {
            (Value::Map(entries), Step::Key(key)) => entries.get(key),
            (Value::List(entries), Step::Index(index)) => entries.get(*index),
            _ => None,
        }
    }

    /// Leaf value at `path`, or `None` if the path does not resolve
    pub fn select(&self, path: &[Step]) -> Option<&Value> {
        let mut current = self;
        for step in path {
            current = current.get(step)?;
        }
        Some(current)
    }

    /// Minimal tree containing only `path`: every intermediate container is
    /// re-created empty except along the selected path. `None` if the path
    /// does not resolve.
    pub fn select_tree(&self, path: &[Step]) -> Option<Value> {
        let Some((step, rest)) = path.split_first() else {
            return Some(self.clone());
        };
        let inner = self.get(step)?.select_tree(rest)?;
        Some(match step {
            Step::Key(key) => {
                let mut entries = BTreeMap::new();
                entries.insert(key.clone(), inner);
                Value::Map(entries)
            }
            Step::Index(index) => {
                let mut entries = vec![Value::Null; *index];
                entries.push(inner);
                Value::List(entries)
            }
        })
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<const N: usize> From<[(&str, Value); N]> for Value {
    fn from(entries: [(&str, Value); N]) -> Self {
        Value::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }
}
