//! Domain identifier types with validation
//!
//! Newtype wrappers for the two keys of a tracked status row. Each type
//! rejects blank input so an empty key never reaches the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Item identifier newtype wrapper
///
/// The external catalog key of an exported item (the `StyleNo` of a
/// response line, usually an ISBN-13).
///
/// # Examples
///
/// ```
/// use trade_importer::domain::ids::ItemId;
/// use std::str::FromStr;
///
/// let item_id = ItemId::from_str("9780023381737").unwrap();
/// assert_eq!(item_id.as_str(), "9780023381737");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    /// Creates a new ItemId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(ItemId)` if the ID is non-blank, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Item ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the item ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Region identifier newtype wrapper
///
/// Secondary key of a status lookup. Fixed per deployment.
///
/// # Examples
///
/// ```
/// use trade_importer::domain::ids::RegionId;
///
/// let region = RegionId::new("US").unwrap();
/// assert_eq!(region.to_string(), "US");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionId(String);

impl RegionId {
    /// Creates a new RegionId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Region ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the region ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RegionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for RegionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_valid() {
        let id = ItemId::new("9780023381737").unwrap();
        assert_eq!(id.as_str(), "9780023381737");
        assert_eq!(id.to_string(), "9780023381737");
        assert_eq!(id.into_inner(), "9780023381737");
    }

    #[test]
    fn test_item_id_rejects_blank() {
        assert!(ItemId::new("").is_err());
        assert!(ItemId::new("   ").is_err());
        assert!(ItemId::from_str("\t").is_err());
    }

    #[test]
    fn test_region_id_valid() {
        let region = RegionId::from_str("CA").unwrap();
        assert_eq!(region.as_str(), "CA");
    }

    #[test]
    fn test_region_id_rejects_blank() {
        assert!(RegionId::new("").is_err());
    }

    #[test]
    fn test_ids_are_hashable_keys() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(
            (ItemId::new("a").unwrap(), RegionId::new("US").unwrap()),
            1,
        );
        assert_eq!(
            map.get(&(ItemId::new("a").unwrap(), RegionId::new("US").unwrap())),
            Some(&1)
        );
    }
}
