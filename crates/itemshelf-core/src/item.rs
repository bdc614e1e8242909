//! Catalog item model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Backend-assigned item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Return the raw integer value.
    #[must_use]
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A stored catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    /// Content-addressed file name under the image directory.
    pub image_name: String,
}

/// An item that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub image_name: String,
}

impl NewItem {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        image_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            image_name: image_name.into(),
        }
    }

    /// Reject items with an empty name or category.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name is required"));
        }
        if self.category.trim().is_empty() {
            return Err(Error::validation("category is required"));
        }
        Ok(())
    }

    /// Attach a backend-assigned ID, producing the stored form.
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            name: self.name,
            category: self.category,
            image_name: self.image_name,
        }
    }
}
