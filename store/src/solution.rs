//! Query solution rows.

use std::collections::BTreeMap;
use weft_core::Term;

/// One result row: variable name to bound value. Unbound variables are
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Solution {
    map: BTreeMap<String, Term>,
}

impl Solution {
    /// Create an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding, consuming and returning the solution.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Term>) -> Self {
        self.map.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Term>) {
        self.map.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Bind `name` to `value` unless it is already bound to something else.
    /// Returns false on conflict.
    pub fn bind(&mut self, name: &str, value: &Term) -> bool {
        match self.map.get(name) {
            Some(existing) => existing == value,
            None => {
                self.map.insert(name.to_string(), value.clone());
                true
            }
        }
    }

    /// True if every variable bound in both has the same value.
    pub fn compatible(&self, other: &Solution) -> bool {
        self.map
            .iter()
            .all(|(name, value)| other.get(name).map_or(true, |v| v == value))
    }

    /// True if at least one variable is bound in both.
    pub fn shares_variable(&self, other: &Solution) -> bool {
        self.map.keys().any(|name| other.contains(name))
    }

    /// Keep only the named variables.
    pub fn project(&self, names: &[String]) -> Solution {
        Solution {
            map: names
                .iter()
                .filter_map(|n| self.map.get(n).map(|v| (n.clone(), v.clone())))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Term>> FromIterator<(K, V)> for Solution {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Solution {
            map: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
