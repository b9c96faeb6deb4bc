//! Menu catalog models

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Ingredient key used by the stock ledger (e.g. `"ayam"`, `"jamur"`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ingredient(String);

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Ingredient {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Ingredient {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Ingredient {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 口味
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Ayam,
    Jamur,
    Mix,
}

/// Menu item (read-only catalog entry)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    /// Pieces per pack (4, 6, 14, 16)
    pub pack_size: u32,
    pub variant: Variant,
    /// Units of each ingredient consumed by one pack
    pub composition: BTreeMap<Ingredient, u64>,
    /// Unit price in rupiah
    pub price: i64,
    /// Preparation time in minutes
    pub prep_time: u32,
    #[serde(default = "default_true")]
    pub available: bool,
}

fn default_true() -> bool {
    true
}

impl MenuItem {
    /// Units of `ingredient` per pack, 0 when the composition does not list it
    pub fn units_of(&self, ingredient: &str) -> u64 {
        self.composition.get(ingredient).copied().unwrap_or(0)
    }
}

/// Add-on catalog entry (no stock impact)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdditionalItem {
    pub id: String,
    pub name: String,
    pub price: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_serializes_as_plain_string() {
        let mut composition = BTreeMap::new();
        composition.insert(Ingredient::new("ayam"), 4u64);
        let json = serde_json::to_string(&composition).unwrap();
        assert_eq!(json, r#"{"ayam":4}"#);
    }

    #[test]
    fn test_units_of_missing_ingredient() {
        let item = MenuItem {
            id: "pack_4_ayam".to_string(),
            name: "Pack 4 - Demen Ayam".to_string(),
            pack_size: 4,
            variant: Variant::Ayam,
            composition: BTreeMap::from([(Ingredient::new("ayam"), 4)]),
            price: 14000,
            prep_time: 10,
            available: true,
        };
        assert_eq!(item.units_of("ayam"), 4);
        assert_eq!(item.units_of("jamur"), 0);
    }
}
