//! Tag access for ways, nodes and relations
//!
//! Classification reads tags through the [`Tags`] trait so the same rules run
//! over an owned [`TagBag`] or over the dictionary-encoded [`TagLookup`] view
//! used by the ways.raw / relations.raw files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::tables::TagCategorySet;

/// Read-only tag access used by every classifier.
pub trait Tags {
    /// Value of `key`, if present.
    fn get(&self, key: &str) -> Option<&str>;

    /// All keys carried by the entity, in no particular order.
    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    fn has_tag(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn has_tag_with_value(&self, key: &str, value: &str) -> bool {
        self.get(key) == Some(value)
    }

    /// True when `key` is present and its value belongs to `set`.
    fn has_tag_in(&self, key: &str, set: &TagCategorySet) -> bool {
        self.get(key).is_some_and(|v| set.contains(v))
    }

    /// True when any of `keys` carries a value from `set`.
    fn has_any_tag_in(&self, keys: &[String], set: &TagCategorySet) -> bool {
        keys.iter().any(|k| self.has_tag_in(k, set))
    }
}

/// Owned tag bag for one way, node or relation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagBag {
    tags: HashMap<String, String>,
}

impl TagBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from `(key, value)` pairs. Later duplicates win.
    pub fn from_pairs<K, V>(pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        pairs
            .iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.tags.insert(key.into(), value.into())
    }

    /// Builder-style insert, handy in tests and fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for TagBag {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

impl From<HashMap<String, String>> for TagBag {
    fn from(tags: HashMap<String, String>) -> Self {
        Self { tags }
    }
}

impl Tags for TagBag {
    fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.tags.keys().map(String::as_str))
    }
}

/// Tag view over dictionary-encoded key/value id arrays
pub struct TagLookup<'a> {
    keys: &'a [u32],
    vals: &'a [u32],
    key_dict: &'a HashMap<u32, String>,
    val_dict: &'a HashMap<u32, String>,
    /// Reverse map: key string → key ID for O(1) lookup
    rev_key: HashMap<&'a str, u32>,
}

impl<'a> TagLookup<'a> {
    pub fn with_dicts(
        keys: &'a [u32],
        vals: &'a [u32],
        key_dict: &'a HashMap<u32, String>,
        val_dict: &'a HashMap<u32, String>,
    ) -> Self {
        let rev_key = key_dict.iter().map(|(id, s)| (s.as_str(), *id)).collect();
        Self {
            keys,
            vals,
            key_dict,
            val_dict,
            rev_key,
        }
    }

    /// Value ID for a key ID (when working with IDs directly)
    pub fn get_by_id(&self, key_id: u32) -> Option<u32> {
        self.keys
            .iter()
            .position(|k| *k == key_id)
            .and_then(|i| self.vals.get(i).copied())
    }

    /// Decode into an owned bag, e.g. to hand it to another thread.
    pub fn to_bag(&self) -> TagBag {
        self.keys
            .iter()
            .zip(self.vals)
            .filter_map(|(k, v)| {
                let key = self.key_dict.get(k)?;
                let val = self.val_dict.get(v)?;
                Some((key.clone(), val.clone()))
            })
            .collect()
    }
}

impl Tags for TagLookup<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        let key_id = *self.rev_key.get(key)?;
        let val_id = self.get_by_id(key_id)?;
        self.val_dict.get(&val_id).map(String::as_str)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(
            self.keys
                .iter()
                .filter_map(|k| self.key_dict.get(k).map(String::as_str)),
        )
    }
}
