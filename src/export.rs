// 📤 Export - CSV cost rows and JSON summary
// One CSV row per (ingredient, store) price, one JSON object per recipe

use crate::recipe::Recipe;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const DEFAULT_CSV_PATH: &str = "recipe_costs.csv";
pub const DEFAULT_SUMMARY_PATH: &str = "recipe_summary.json";

// ============================================================================
// CSV ROWS
// ============================================================================

/// A priced ingredient at one store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRow {
    pub ingredient: String,
    pub quantity: f64,
    pub store: String,
    pub price_per_unit: f64,
    pub cost: f64,
}

/// Rows in ingredient order, then store order within each ingredient
pub fn cost_rows(recipe: &Recipe) -> Vec<CostRow> {
    recipe
        .ingredients()
        .iter()
        .flat_map(|ing| {
            ing.prices().iter().map(move |(store, price)| CostRow {
                ingredient: ing.name().to_string(),
                quantity: ing.quantity(),
                store: store.to_string(),
                price_per_unit: price,
                cost: ing.quantity() * price,
            })
        })
        .collect()
}

/// Write the header and every cost row, returning the number of rows
pub fn write_csv<W: Write>(recipe: &Recipe, writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    let rows = cost_rows(recipe);

    if rows.is_empty() {
        // serialize() only emits the header alongside the first record
        wtr.write_record(["ingredient", "quantity", "store", "price_per_unit", "cost"])?;
    }
    for row in &rows {
        wtr.serialize(row).context("Failed to serialize cost row")?;
    }
    wtr.flush()?;

    Ok(rows.len())
}

pub fn save_to_csv(recipe: &Recipe, path: &Path) -> Result<usize> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let count = write_csv(recipe, file)?;
    tracing::info!(path = %path.display(), rows = count, "cost rows written");
    Ok(count)
}

/// Read cost rows back from an exported CSV file
pub fn load_csv(csv_path: &Path) -> Result<Vec<CostRow>> {
    let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open CSV file")?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: CostRow = result.context("Failed to deserialize cost row")?;
        rows.push(row);
    }

    Ok(rows)
}

// ============================================================================
// JSON SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub recipe_name: String,
    pub servings: u32,
    pub cheapest_store: Option<String>,
    pub cheapest_total_cost: f64,
    pub per_serving_cost_at_cheapest_store: f64,
}

impl Summary {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        let (store, total) = recipe.cheapest_store();
        let per_serving = store
            .map(|s| recipe.per_serving_cost(s))
            .unwrap_or(0.0);

        Summary {
            recipe_name: recipe.name().to_string(),
            servings: recipe.servings(),
            cheapest_store: store.map(str::to_string),
            cheapest_total_cost: total,
            per_serving_cost_at_cheapest_store: per_serving,
        }
    }
}

/// Pretty-print with 4-space indentation
///
/// Fails on non-finite costs, which JSON cannot represent as numbers.
pub fn write_summary<W: Write>(summary: &Summary, writer: W) -> Result<()> {
    for (field, value) in [
        ("cheapest_total_cost", summary.cheapest_total_cost),
        (
            "per_serving_cost_at_cheapest_store",
            summary.per_serving_cost_at_cheapest_store,
        ),
    ] {
        if !value.is_finite() {
            bail!("Summary field {} is not a finite number ({})", field, value);
        }
    }

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    summary
        .serialize(&mut ser)
        .context("Failed to serialize summary")?;
    Ok(())
}

pub fn save_summary_to_json(recipe: &Recipe, path: &Path) -> Result<Summary> {
    let summary = Summary::from_recipe(recipe);

    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_summary(&summary, &mut writer)
        .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    writer.flush()?;

    tracing::info!(path = %path.display(), "summary written");
    Ok(summary)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::StorePrices;
    use std::collections::HashMap;

    fn prices(pairs: &[(&str, f64)]) -> StorePrices {
        pairs.iter().map(|(s, p)| (*s, *p)).collect()
    }

    fn create_test_recipe() -> Recipe {
        let mut recipe = Recipe::new("Pancakes", 4);
        recipe
            .add_ingredient("Flour", 2.0, prices(&[("A", 3.0), ("B", 2.0)]))
            .unwrap();
        recipe
            .add_ingredient("Milk", 1.0, prices(&[("B", 5.0), ("A", 4.0)]))
            .unwrap();
        recipe
            .add_ingredient("Butter", 0.25, prices(&[("C", 12.0)]))
            .unwrap();
        recipe
    }

    #[test]
    fn test_cost_rows_order() {
        let rows = cost_rows(&create_test_recipe());
        let keys: Vec<_> = rows
            .iter()
            .map(|r| (r.ingredient.as_str(), r.store.as_str()))
            .collect();

        assert_eq!(
            keys,
            vec![
                ("Flour", "A"),
                ("Flour", "B"),
                ("Milk", "B"),
                ("Milk", "A"),
                ("Butter", "C"),
            ]
        );
        assert_eq!(rows[0].cost, 6.0);
        assert_eq!(rows[4].cost, 3.0);
    }

    #[test]
    fn test_csv_header() {
        let mut buf = Vec::new();
        let count = write_csv(&create_test_recipe(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(count, 5);
        assert_eq!(
            text.lines().next(),
            Some("ingredient,quantity,store,price_per_unit,cost")
        );
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn test_csv_header_for_empty_recipe() {
        let mut buf = Vec::new();
        let count = write_csv(&Recipe::new("Empty", 1), &mut buf).unwrap();

        assert_eq!(count, 0);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "ingredient,quantity,store,price_per_unit,cost\n"
        );
    }

    #[test]
    fn test_csv_totals_match_store_totals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CSV_PATH);
        let recipe = create_test_recipe();

        save_to_csv(&recipe, &path).unwrap();
        let rows = load_csv(&path).unwrap();

        let mut totals: HashMap<String, f64> = HashMap::new();
        for row in &rows {
            *totals.entry(row.store.clone()).or_insert(0.0) += row.cost;
        }

        assert_eq!(totals.len(), recipe.stores().len());
        for (store, total) in recipe.store_totals() {
            assert!(
                (totals[store] - total).abs() < 1e-9,
                "CSV total for {} should match the model",
                store
            );
        }
    }

    #[test]
    fn test_summary_from_recipe() {
        let summary = Summary::from_recipe(&create_test_recipe());

        assert_eq!(summary.recipe_name, "Pancakes");
        assert_eq!(summary.servings, 4);
        assert_eq!(summary.cheapest_store.as_deref(), Some("C"));
        assert_eq!(summary.cheapest_total_cost, 3.0);
        assert_eq!(summary.per_serving_cost_at_cheapest_store, 0.75);
    }

    #[test]
    fn test_summary_json_layout() {
        let summary = Summary::from_recipe(&Recipe::new("Empty", 2));
        let mut buf = Vec::new();
        write_summary(&summary, &mut buf).unwrap();

        let expected = "{\n    \"recipe_name\": \"Empty\",\n    \"servings\": 2,\n    \"cheapest_store\": null,\n    \"cheapest_total_cost\": 0.0,\n    \"per_serving_cost_at_cheapest_store\": 0.0\n}";
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }

    #[test]
    fn test_summary_rejects_overflowing_total() {
        // each ingredient is finite on its own, the store total is not
        let mut recipe = Recipe::new("Banquet", 2);
        recipe
            .add_ingredient("Caviar", 1.0, prices(&[("A", 1e308)]))
            .unwrap();
        recipe
            .add_ingredient("Truffle", 1.0, prices(&[("A", 1e308)]))
            .unwrap();
        assert!(recipe.total_cost_at_store("A").is_infinite());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_SUMMARY_PATH);
        let err = save_summary_to_json(&recipe, &path).unwrap_err();

        assert!(err.to_string().contains("Failed to write summary"));
        assert!(format!("{:#}", err).contains("cheapest_total_cost is not a finite number"));
    }

    #[test]
    fn test_save_summary_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_SUMMARY_PATH);

        let written = save_summary_to_json(&create_test_recipe(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let read: Summary = serde_json::from_str(&text).unwrap();

        assert_eq!(read, written);
    }
}
