// 🧾 Recipe Cost Model - per-store ingredient pricing
// Totals per store, per-serving cost and cheapest store selection

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// Reason an ingredient was rejected by [`Recipe::add_ingredient`]
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidIngredient {
    EmptyName,
    NonPositiveQuantity(f64),
    EmptyPrices,
    NonPositivePrice { store: String, price: f64 },
    CostOverflow { store: String },
}

impl fmt::Display for InvalidIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidIngredient::EmptyName => write!(f, "Ingredient name cannot be empty"),
            InvalidIngredient::NonPositiveQuantity(qty) => {
                write!(f, "Quantity must be a positive finite number, got {}", qty)
            }
            InvalidIngredient::EmptyPrices => {
                write!(f, "At least one store price is required")
            }
            InvalidIngredient::NonPositivePrice { store, price } => {
                write!(f, "Price for store '{}' must be a positive finite number, got {}", store, price)
            }
            InvalidIngredient::CostOverflow { store } => {
                write!(f, "Cost at store '{}' is too large to represent", store)
            }
        }
    }
}

impl std::error::Error for InvalidIngredient {}

// ============================================================================
// STORE PRICES
// ============================================================================

/// Unit price per store, in insertion order
///
/// Store names are unique: inserting a store that is already present
/// replaces its price and keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorePrices {
    entries: Vec<(String, f64)>,
}

impl StorePrices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the price for a store, returning the previous price if any
    pub fn insert(&mut self, store: impl Into<String>, price: f64) -> Option<f64> {
        let store = store.into();
        match self.entries.iter_mut().find(|(s, _)| *s == store) {
            Some((_, existing)) => Some(std::mem::replace(existing, price)),
            None => {
                self.entries.push((store, price));
                None
            }
        }
    }

    pub fn get(&self, store: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(s, _)| s == store)
            .map(|(_, price)| *price)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(s, p)| (s.as_str(), *p))
    }

    pub fn stores(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for StorePrices {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut prices = StorePrices::new();
        for (store, price) in iter {
            prices.insert(store, price);
        }
        prices
    }
}

impl Serialize for StorePrices {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (store, price) in &self.entries {
            map.serialize_entry(store, price)?;
        }
        map.end()
    }
}

struct StorePricesVisitor;

impl<'de> Visitor<'de> for StorePricesVisitor {
    type Value = StorePrices;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of store name to unit price")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut prices = StorePrices::new();
        while let Some((store, price)) = access.next_entry::<String, f64>()? {
            prices.insert(store, price);
        }
        Ok(prices)
    }
}

impl<'de> Deserialize<'de> for StorePrices {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(StorePricesVisitor)
    }
}

// ============================================================================
// INGREDIENT
// ============================================================================

// false for NaN and infinities
fn is_positive_finite(x: f64) -> bool {
    x > 0.0 && x.is_finite()
}

/// One recipe component with its quantity and per-store unit prices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ingredient {
    name: String,
    quantity: f64,
    prices: StorePrices,
}

impl Ingredient {
    /// Validated constructor
    ///
    /// Rejects an empty name, a quantity that is not a positive finite number,
    /// an empty price map, any price that is not a positive finite number,
    /// and any store where quantity * price overflows.
    pub fn new(
        name: impl Into<String>,
        quantity: f64,
        prices: StorePrices,
    ) -> Result<Self, InvalidIngredient> {
        let name = name.into();

        if name.is_empty() {
            return Err(InvalidIngredient::EmptyName);
        }
        if !is_positive_finite(quantity) {
            return Err(InvalidIngredient::NonPositiveQuantity(quantity));
        }
        if prices.is_empty() {
            return Err(InvalidIngredient::EmptyPrices);
        }
        if let Some((store, price)) = prices.iter().find(|(_, price)| !is_positive_finite(*price)) {
            return Err(InvalidIngredient::NonPositivePrice {
                store: store.to_string(),
                price,
            });
        }
        if let Some((store, _)) = prices.iter().find(|(_, price)| !(quantity * price).is_finite()) {
            return Err(InvalidIngredient::CostOverflow {
                store: store.to_string(),
            });
        }

        Ok(Ingredient {
            name,
            quantity,
            prices,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn prices(&self) -> &StorePrices {
        &self.prices
    }

    /// Cost of this ingredient at a store, `None` if the store doesn't stock it
    pub fn cost_at(&self, store: &str) -> Option<f64> {
        self.prices.get(store).map(|price| self.quantity * price)
    }
}

// ============================================================================
// RECIPE
// ============================================================================

/// A dish being costed: ingredients are appended, never removed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    name: String,
    servings: u32,
    ingredients: Vec<Ingredient>,
}

impl Recipe {
    pub fn new(name: impl Into<String>, servings: u32) -> Self {
        Recipe {
            name: name.into(),
            servings,
            ingredients: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn servings(&self) -> u32 {
        self.servings
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    /// Validate and append an ingredient. Nothing is added on error.
    pub fn add_ingredient(
        &mut self,
        name: impl Into<String>,
        quantity: f64,
        prices: StorePrices,
    ) -> Result<(), InvalidIngredient> {
        let ingredient = Ingredient::new(name, quantity, prices)?;
        tracing::debug!(
            recipe = %self.name,
            ingredient = %ingredient.name,
            stores = ingredient.prices.len(),
            "ingredient added"
        );
        self.ingredients.push(ingredient);
        Ok(())
    }

    /// Cost of one ingredient at a store (`None` when not stocked there)
    pub fn cost_at_store(&self, ingredient: &Ingredient, store: &str) -> Option<f64> {
        ingredient.cost_at(store)
    }

    /// Sum of ingredient costs at a store, skipping ingredients it doesn't stock
    pub fn total_cost_at_store(&self, store: &str) -> f64 {
        self.ingredients
            .iter()
            .filter_map(|ing| self.cost_at_store(ing, store))
            .sum()
    }

    /// Total at a store divided by servings; 0 when servings is 0
    pub fn per_serving_cost(&self, store: &str) -> f64 {
        if self.servings == 0 {
            return 0.0;
        }
        self.total_cost_at_store(store) / self.servings as f64
    }

    /// Every store referenced by any ingredient, sorted by name
    pub fn stores(&self) -> BTreeSet<&str> {
        self.ingredients
            .iter()
            .flat_map(|ing| ing.prices.stores())
            .collect()
    }

    /// (store, total) for every known store, sorted by store name
    pub fn store_totals(&self) -> Vec<(&str, f64)> {
        self.stores()
            .into_iter()
            .map(|store| (store, self.total_cost_at_store(store)))
            .collect()
    }

    /// Store with the lowest total, or `(None, 0.0)` for an empty recipe
    ///
    /// Ties go to the store whose name sorts first.
    pub fn cheapest_store(&self) -> (Option<&str>, f64) {
        // min_by keeps the first of equal elements, and store_totals is sorted
        self.store_totals()
            .into_iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(store, total)| (Some(store), total))
            .unwrap_or((None, 0.0))
    }

    /// Per-ingredient costs at a store for charting; unstocked ingredients cost 0
    pub fn ingredient_costs(&self, store: &str) -> Vec<(&str, f64)> {
        self.ingredients
            .iter()
            .map(|ing| (ing.name(), self.cost_at_store(ing, store).unwrap_or(0.0)))
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
