// ⌨️  Input - interactive prompt loop and recipe files
// Both paths build the Recipe through add_ingredient, so validation is shared

use crate::recipe::{Recipe, StorePrices};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

/// Sentinel that ends the store/price loop (case-insensitive)
pub const STORES_DONE: &str = "done";

// ============================================================================
// INTERACTIVE SESSION
// ============================================================================

struct Prompter<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Print a prompt and read one line; `None` at end of input
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }

    fn ask_required(&mut self, prompt: &str) -> Result<String> {
        self.ask(prompt)?
            .ok_or_else(|| anyhow!("Unexpected end of input at prompt '{}'", prompt.trim()))
    }

    fn ask_number<T>(&mut self, prompt: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let answer = self.ask_required(prompt)?;
        answer
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid number '{}'", answer))
    }

    fn ask_prices(&mut self) -> Result<StorePrices> {
        let mut prices = StorePrices::new();
        loop {
            let store = match self.ask("Store name (or 'done' to stop adding stores): ")? {
                Some(answer) => answer.trim().to_string(),
                None => break,
            };
            if store.eq_ignore_ascii_case(STORES_DONE) {
                break;
            }
            let price: f64 = self.ask_number(&format!("Price per unit at {}: ", store))?;
            prices.insert(store, price);
        }
        Ok(prices)
    }
}

/// Build a recipe by prompting on `out` and reading answers from `input`
///
/// Rejected ingredients are reported and skipped. Malformed numbers end
/// the session with an error.
pub fn run_interactive<R: BufRead, W: Write>(input: R, out: W) -> Result<Recipe> {
    let mut prompter = Prompter { input, out };

    let name = prompter.ask_required("Enter recipe name: ")?;
    let servings: u32 = prompter.ask_number("Enter number of servings: ")?;
    let mut recipe = Recipe::new(name, servings);

    loop {
        let add_more = prompter.ask("Add ingredient? (y/n): ")?;
        if !add_more.is_some_and(|a| a.trim().eq_ignore_ascii_case("y")) {
            break;
        }

        let ing_name = prompter.ask_required("Ingredient name: ")?;
        let quantity: f64 = prompter.ask_number("Quantity (e.g., 0.5 for 0.5 kg): ")?;
        let prices = prompter.ask_prices()?;

        if let Err(e) = recipe.add_ingredient(ing_name.as_str(), quantity, prices) {
            tracing::warn!(ingredient = %ing_name, error = %e, "ingredient rejected");
            writeln!(prompter.out, "Error: {}", e)?;
        }
    }

    Ok(recipe)
}

// ============================================================================
// RECIPE FILES
// ============================================================================

#[derive(Debug, Deserialize)]
struct RecipeFile {
    name: String,
    #[serde(default)]
    servings: u32,
    #[serde(default)]
    ingredients: Vec<IngredientEntry>,
}

#[derive(Debug, Deserialize)]
struct IngredientEntry {
    name: String,
    quantity: f64,
    prices: StorePrices,
}

/// Parse a recipe from JSON; any invalid ingredient fails the whole recipe
pub fn parse_recipe(json: &str) -> Result<Recipe> {
    let file: RecipeFile = serde_json::from_str(json).context("Failed to parse recipe JSON")?;

    let mut recipe = Recipe::new(file.name, file.servings);
    for (i, entry) in file.ingredients.into_iter().enumerate() {
        let name = entry.name.clone();
        recipe
            .add_ingredient(entry.name, entry.quantity, entry.prices)
            .with_context(|| format!("Invalid ingredient #{} '{}'", i + 1, name))?;
    }

    Ok(recipe)
}

pub fn load_recipe(path: &Path) -> Result<Recipe> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read recipe file {}", path.display()))?;
    let recipe = parse_recipe(&text)
        .with_context(|| format!("Failed to load recipe from {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        ingredients = recipe.ingredients().len(),
        "recipe loaded"
    );
    Ok(recipe)
}

// ============================================================================
// TESTS
// ============================================================================
