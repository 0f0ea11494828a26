// Recipe Cost Analyzer - Core Library
// Exposes the cost model, input, export and chart modules for the CLI and tests

pub mod chart;
pub mod cli;
pub mod export;
pub mod input;
pub mod recipe;

// Re-export commonly used types
pub use recipe::{Ingredient, InvalidIngredient, Recipe, StorePrices};
pub use input::{load_recipe, parse_recipe, run_interactive};
pub use export::{
    cost_rows, load_csv, save_summary_to_json, save_to_csv, write_csv, write_summary,
    CostRow, Summary,
};
pub use chart::{show_chart, CostChart};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing to stderr, filtered by `RUST_LOG` (default: warn)
///
/// Can only be called once per process.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
