//! The public name → value mapping produced by a successful match.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::Value;

/// Bound values keyed by declared name (`--verbose`, `<file>`, `ship`).
///
/// Ordered by name so output is stable.
///
/// # Examples
///
/// ```
/// use docgram_core::{Bindings, Value};
///
/// let mut bindings = Bindings::new();
/// bindings.insert("--speed", Value::Str("10".into()));
/// bindings.insert("-v", Value::Count(2));
/// bindings.insert("move", Value::Bool(true));
///
/// assert_eq!(bindings.get_str("--speed"), Some("10"));
/// assert_eq!(bindings.get_count("-v"), 2);
/// assert!(bindings.get_bool("move"));
/// assert!(!bindings.get_bool("missing"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bindings(BTreeMap<String, Value>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a binding, returning the previous value for that name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// `true` for a set flag, a matched command or a positive count;
    /// `false` for anything else, including unknown names.
    pub fn get_bool(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Occurrence count of a flag or command; `0` when absent.
    pub fn get_count(&self, name: &str) -> u64 {
        self.get(name).and_then(Value::as_count).unwrap_or(0)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Values of a repeated name. A scalar string is returned as a single
    /// element so callers need not care whether the name repeated.
    pub fn get_list(&self, name: &str) -> Vec<&str> {
        match self.get(name) {
            Some(Value::List(items)) => items.iter().map(String::as_str).collect(),
            Some(Value::Str(s)) => vec![s.as_str()],
            _ => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.0
    }
}

impl FromIterator<(String, Value)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Bindings {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Bindings {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
