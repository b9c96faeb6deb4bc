//! Ingredient usage of a list of line items

use crate::catalog::MenuCatalog;
use shared::models::IngredientUsage;
use shared::order::OrderLineItem;

/// Result of [`compute_usage`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageBreakdown {
    pub usage: IngredientUsage,
    /// Menu ids that are not in the catalog (contributed nothing)
    pub catalog_misses: Vec<String>,
}

/// `usage[i] = Σ composition[i] × quantity` over every line item
///
/// Unknown menu ids contribute zero and are reported back instead of
/// failing. Add-on lines never reach this function: they have no
/// composition.
pub fn compute_usage(catalog: &MenuCatalog, items: &[OrderLineItem]) -> UsageBreakdown {
    let mut breakdown = UsageBreakdown::default();
    for item in items {
        let Some(menu) = catalog.get_menu_item(&item.menu_id) else {
            if !breakdown.catalog_misses.contains(&item.menu_id) {
                breakdown.catalog_misses.push(item.menu_id.clone());
            }
            continue;
        };
        for (ingredient, units) in &menu.composition {
            breakdown
                .usage
                .add(ingredient.clone(), units.saturating_mul(u64::from(item.quantity)));
        }
    }
    breakdown
}
