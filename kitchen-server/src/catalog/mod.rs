//! Menu catalog - read-only composition and price data
//!
//! Loaded once at startup (built-in menu or a JSON file) and shared behind an
//! `Arc`. Lookups are synchronous and never fail: an unknown id is simply
//! `None`, which the usage calculator treats as zero consumption.

pub mod defaults;

use serde::{Deserialize, Serialize};
use shared::models::{AdditionalItem, Ingredient, MenuItem};
use shared::order::{AdditionalLineItem, OrderLineItem};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use thiserror::Error;

pub use defaults::{AYAM, JAMUR};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read menu file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid menu file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate menu id: {0}")]
    DuplicateId(String),
}

/// On-disk menu format (`MENU_PATH`)
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogFile {
    pub menu: Vec<MenuItem>,
    #[serde(default)]
    pub additionals: Vec<AdditionalItem>,
}

#[derive(Debug, Clone)]
pub struct MenuCatalog {
    /// Menu items in display order
    items: Vec<MenuItem>,
    index: HashMap<String, usize>,
    additionals: Vec<AdditionalItem>,
}

impl MenuCatalog {
    pub fn new(items: Vec<MenuItem>, additionals: Vec<AdditionalItem>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            if index.insert(item.id.clone(), pos).is_some() {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self {
            items,
            index,
            additionals,
        })
    }

    /// Built-in menu
    pub fn builtin() -> Self {
        let items = defaults::menu_items();
        let index = items
            .iter()
            .enumerate()
            .map(|(pos, item)| (item.id.clone(), pos))
            .collect();
        Self {
            items,
            index,
            additionals: defaults::additional_items(),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let file: CatalogFile = serde_json::from_str(&raw)?;
        Self::new(file.menu, file.additionals)
    }

    pub fn get_menu_item(&self, id: &str) -> Option<&MenuItem> {
        self.index.get(id).map(|pos| &self.items[*pos])
    }

    pub fn get_additional(&self, id: &str) -> Option<&AdditionalItem> {
        self.additionals.iter().find(|a| a.id == id)
    }

    pub fn menu_items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn additional_items(&self) -> &[AdditionalItem] {
        &self.additionals
    }

    /// Every ingredient any menu item consumes
    pub fn ingredients(&self) -> BTreeSet<Ingredient> {
        self.items
            .iter()
            .flat_map(|item| item.composition.keys().cloned())
            .collect()
    }

    /// Build a cart line from a menu id (price and names copied from the catalog)
    pub fn line_item(&self, menu_id: &str, quantity: u32, note: Option<&str>) -> Option<OrderLineItem> {
        let menu = self.get_menu_item(menu_id)?;
        Some(OrderLineItem {
            id: format!("item_{}", shared::util::new_record_id()),
            menu_id: menu.id.clone(),
            menu_name: menu.name.clone(),
            pack_size: menu.pack_size,
            variant: menu.variant,
            quantity,
            price: menu.price,
            subtotal: menu.price.saturating_mul(i64::from(quantity)),
            note: note.map(str::to_string),
        })
    }

    /// Build an add-on line from an add-on id
    pub fn additional_line(&self, additional_id: &str, quantity: u32) -> Option<AdditionalLineItem> {
        let additional = self.get_additional(additional_id)?;
        Some(AdditionalLineItem {
            id: additional.id.clone(),
            name: additional.name.clone(),
            quantity,
            price: additional.price,
            subtotal: additional.price.saturating_mul(i64::from(quantity)),
        })
    }
}

impl Default for MenuCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let catalog = MenuCatalog::builtin();
        let item = catalog.get_menu_item("pack_6_mix").unwrap();
        assert_eq!(item.pack_size, 6);
        assert_eq!(item.units_of(AYAM), 3);
        assert_eq!(item.units_of(JAMUR), 3);
        assert!(catalog.get_menu_item("pack_8_ayam").is_none());
        assert_eq!(catalog.menu_items().len(), 10);
    }

    #[test]
    fn test_ingredients() {
        let catalog = MenuCatalog::builtin();
        let names: Vec<String> = catalog.ingredients().iter().map(|i| i.to_string()).collect();
        assert_eq!(names, vec!["ayam", "jamur"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut items = defaults::menu_items();
        items.push(items[0].clone());
        let err = MenuCatalog::new(items, vec![]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "pack_4_ayam"));
    }

    #[test]
    fn test_line_item_copies_catalog_data() {
        let catalog = MenuCatalog::builtin();
        let line = catalog.line_item("party_16_mix", 2, Some("extra sauce")).unwrap();
        assert_eq!(line.menu_name, "Dimsum Party (16) - Mix");
        assert_eq!(line.subtotal, 126000);
        assert_eq!(line.note.as_deref(), Some("extra sauce"));

        let add = catalog.additional_line("chili_oil_5ml", 4).unwrap();
        assert_eq!(add.subtotal, 2000);
        assert!(catalog.additional_line("sambal", 1).is_none());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        let file = CatalogFile {
            menu: vec![defaults::menu_items().remove(0)],
            additionals: vec![],
        };
        std::fs::write(&path, serde_json::to_string(&file).unwrap()).unwrap();

        let catalog = MenuCatalog::from_json_file(&path).unwrap();
        assert!(catalog.get_menu_item("pack_4_ayam").is_some());
        assert!(catalog.get_menu_item("pack_4_jamur").is_none());
    }
}
