//! Stock ledger models
//!
//! - [`StockLevels`]: persisted count per ingredient (never negative)
//! - [`IngredientUsage`]: what a list of line items consumes
//! - [`StockDelta`]: signed change applied to the ledger in one transaction

use super::menu::Ingredient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Current stock per ingredient. Missing entries read as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockLevels(BTreeMap<Ingredient, u64>);

impl StockLevels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ingredient: &str) -> u64 {
        self.0.get(ingredient).copied().unwrap_or(0)
    }

    pub fn contains(&self, ingredient: &str) -> bool {
        self.0.contains_key(ingredient)
    }

    pub fn set(&mut self, ingredient: impl Into<Ingredient>, count: u64) {
        self.0.insert(ingredient.into(), count);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ingredient, u64)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply a delta, clamping every entry at 0
    pub fn apply(&self, delta: &StockDelta) -> StockLevels {
        let mut next = self.clone();
        for (ingredient, change) in delta.iter() {
            let current = self.get(ingredient.as_str()) as i128;
            let value = (current + change as i128).clamp(0, u64::MAX as i128) as u64;
            next.0.insert(ingredient.clone(), value);
        }
        next
    }

    /// Units a delta wants to take out that the current levels cannot cover
    ///
    /// Non-empty means [`apply`](Self::apply) will clamp.
    pub fn shortfall(&self, delta: &StockDelta) -> IngredientUsage {
        let mut missing = IngredientUsage::default();
        for (ingredient, change) in delta.iter() {
            if change >= 0 {
                continue;
            }
            let wanted = change.unsigned_abs();
            let available = self.get(ingredient.as_str());
            if wanted > available {
                missing.add(ingredient.clone(), wanted - available);
            }
        }
        missing
    }

    /// Ingredients strictly below `threshold`
    pub fn below(&self, threshold: u64) -> Vec<(Ingredient, u64)> {
        self.0
            .iter()
            .filter(|(_, count)| **count < threshold)
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }
}

impl<I: Into<Ingredient>> FromIterator<(I, u64)> for StockLevels {
    fn from_iter<T: IntoIterator<Item = (I, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Display for StockLevels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Ingredient consumption of a set of line items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientUsage(BTreeMap<Ingredient, u64>);

impl IngredientUsage {
    pub fn get(&self, ingredient: &str) -> u64 {
        self.0.get(ingredient).copied().unwrap_or(0)
    }

    pub fn add(&mut self, ingredient: Ingredient, units: u64) {
        if units == 0 {
            return;
        }
        let entry = self.0.entry(ingredient).or_insert(0);
        *entry = entry.saturating_add(units);
    }

    /// True when no ingredient is consumed
    pub fn is_zero(&self) -> bool {
        self.0.values().all(|v| *v == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ingredient, u64)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }
}

impl fmt::Display for IngredientUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Unit count as a ledger change, saturating at `i64::MAX`
fn signed(units: u64) -> i64 {
    i64::try_from(units).unwrap_or(i64::MAX)
}

/// Signed change to the ledger (negative = consumed, positive = restored)
///
/// Zero entries are never stored, so an empty delta means "no transaction needed".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockDelta(BTreeMap<Ingredient, i64>);

impl StockDelta {
    /// Delta that takes `usage` out of the ledger (order created)
    pub fn consume(usage: &IngredientUsage) -> Self {
        Self(
            usage
                .iter()
                .filter(|(_, units)| *units > 0)
                .map(|(k, units)| (k.clone(), -signed(units)))
                .collect(),
        )
    }

    /// Delta that gives `usage` back to the ledger (order deleted)
    pub fn restore(usage: &IngredientUsage) -> Self {
        Self(
            usage
                .iter()
                .filter(|(_, units)| *units > 0)
                .map(|(k, units)| (k.clone(), signed(units)))
                .collect(),
        )
    }

    /// Ledger change when an order's usage goes from `old` to `new`
    ///
    /// `ledger += old - new` for every ingredient either side mentions.
    pub fn between(old: &IngredientUsage, new: &IngredientUsage) -> Self {
        let mut delta = BTreeMap::new();
        for (ingredient, units) in old.iter() {
            delta.insert(ingredient.clone(), signed(units));
        }
        for (ingredient, units) in new.iter() {
            let change = delta.entry(ingredient.clone()).or_insert(0);
            *change = change.saturating_sub(signed(units));
        }
        delta.retain(|_, change| *change != 0);
        Self(delta)
    }

    /// Single-ingredient delta
    pub fn single(ingredient: impl Into<Ingredient>, change: i64) -> Self {
        let mut delta = BTreeMap::new();
        if change != 0 {
            delta.insert(ingredient.into(), change);
        }
        Self(delta)
    }

    pub fn get(&self, ingredient: &str) -> i64 {
        self.0.get(ingredient).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ingredient, i64)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }
}

impl fmt::Display for StockDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}={v:+}")).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(pairs: &[(&str, u64)]) -> IngredientUsage {
        let mut u = IngredientUsage::default();
        for (k, v) in pairs {
            u.add(Ingredient::from(*k), *v);
        }
        u
    }

    #[test]
    fn test_apply_clamps_at_zero() {
        let levels: StockLevels = [("ayam", 2u64), ("jamur", 0)].into_iter().collect();
        let next = levels.apply(&StockDelta::consume(&usage(&[("ayam", 4)])));
        assert_eq!(next.get("ayam"), 0);
        assert_eq!(next.get("jamur"), 0);
    }

    #[test]
    fn test_apply_creates_missing_entries() {
        let levels = StockLevels::new();
        let next = levels.apply(&StockDelta::restore(&usage(&[("jamur", 3)])));
        assert_eq!(next.get("jamur"), 3);
    }

    #[test]
    fn test_between_only_keeps_differences() {
        let old = usage(&[("ayam", 4)]);
        let new = usage(&[("ayam", 6)]);
        let delta = StockDelta::between(&old, &new);
        assert_eq!(delta.get("ayam"), -2);
        assert_eq!(delta.get("jamur"), 0);

        assert!(StockDelta::between(&old, &old).is_empty());
    }

    #[test]
    fn test_between_switching_ingredient() {
        let old = usage(&[("ayam", 4)]);
        let new = usage(&[("jamur", 4)]);
        let delta = StockDelta::between(&old, &new);
        assert_eq!(delta.get("ayam"), 4);
        assert_eq!(delta.get("jamur"), -4);
    }

    #[test]
    fn test_huge_usage_saturates() {
        let huge = usage(&[("ayam", u64::MAX)]);
        let consume = StockDelta::consume(&huge);
        assert_eq!(consume.get("ayam"), -i64::MAX);
        assert_eq!(StockDelta::restore(&huge).get("ayam"), i64::MAX);

        let levels: StockLevels = [("ayam", 10u64)].into_iter().collect();
        assert_eq!(levels.apply(&consume).get("ayam"), 0);

        let delta = StockDelta::between(&usage(&[("ayam", 4)]), &huge);
        assert!(delta.get("ayam") < 0);
        assert_eq!(levels.apply(&delta).get("ayam"), 0);

        let mut total = usage(&[("jamur", u64::MAX)]);
        total.add(Ingredient::from("jamur"), 5);
        assert_eq!(total.get("jamur"), u64::MAX);
    }

    #[test]
    fn test_shortfall() {
        let levels: StockLevels = [("ayam", 2u64)].into_iter().collect();
        let delta = StockDelta::consume(&usage(&[("ayam", 4), ("jamur", 1)]));
        let missing = levels.shortfall(&delta);
        assert_eq!(missing.get("ayam"), 2);
        assert_eq!(missing.get("jamur"), 1);
    }

    #[test]
    fn test_below_threshold() {
        let levels: StockLevels = [("ayam", 9u64), ("jamur", 10)].into_iter().collect();
        let low = levels.below(10);
        assert_eq!(low, vec![(Ingredient::from("ayam"), 9)]);
    }

    #[test]
    fn test_display() {
        let delta = StockDelta::between(&usage(&[("ayam", 4)]), &usage(&[("ayam", 6)]));
        assert_eq!(delta.to_string(), "{ayam=-2}");
        let levels: StockLevels = [("ayam", 16u64), ("jamur", 20)].into_iter().collect();
        assert_eq!(levels.to_string(), "{ayam=16, jamur=20}");
    }
}
