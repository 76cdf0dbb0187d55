//! Core types shared by the extractor and the exporters.

use std::collections::HashMap;

/// Name of the bucket used when no group applies to a row.
pub const DEFAULT_GROUP: &str = "";

/// A single localized string. Keys are not unique; duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValuePair {
    key: String,
    value: String,
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A named bucket of pairs, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: String,
    pairs: Vec<KeyValuePair>,
}

impl Group {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pairs(&self) -> &[KeyValuePair] {
        &self.pairs
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_GROUP
    }
}

/// Accumulated pairs of a whole run, partitioned by group.
///
/// Groups are kept in the order they were first seen and pairs in the order
/// they were added, so iterating an unchanged store always yields the same
/// sequence. The store only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationStore {
    groups: Vec<Group>,
    positions: HashMap<String, usize>,
}

impl AggregationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pair to `group`, creating the group on first use.
    pub fn add(&mut self, group: &str, pair: KeyValuePair) {
        let position = match self.positions.get(group) {
            Some(&position) => position,
            None => {
                self.groups.push(Group {
                    name: group.to_string(),
                    pairs: Vec::new(),
                });
                let position = self.groups.len() - 1;
                self.positions.insert(group.to_string(), position);
                position
            }
        };
        self.groups[position].pairs.push(pair);
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.positions.get(name).map(|&i| &self.groups[i])
    }

    /// Every `(group, pair)` in store order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyValuePair)> {
        self.groups
            .iter()
            .flat_map(|g| g.pairs.iter().map(move |p| (g.name.as_str(), p)))
    }

    /// Total number of pairs across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.pairs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
