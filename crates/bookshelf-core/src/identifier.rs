//! Opaque identifiers for shelf items and series.
//!
//! Identifiers come from the data layer and are never interpreted by the
//! engine; they are only compared, hashed and displayed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a placed item, unique within one shelf.
///
/// # Examples
///
/// ```
/// # use bookshelf_core::identifier::ItemId;
/// let id = ItemId::new("vol-1");
/// assert_eq!(id.as_str(), "vol-1");
/// assert_eq!(id, ItemId::from("vol-1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of the series an item belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(String);

impl SeriesId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeriesId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SeriesId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_item_id_display() {
        let id = ItemId::new("vol-7");
        assert_eq!(id.to_string(), "vol-7");
    }

    #[test]
    fn test_ids_hash_by_value() {
        let mut set = HashSet::new();
        set.insert(SeriesId::from("berserk"));

        assert!(set.contains(&SeriesId::new(String::from("berserk"))));
        assert!(!set.contains(&SeriesId::from("vagabond")));
    }
}
