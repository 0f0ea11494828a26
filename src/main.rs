use anyhow::Result;
use clap::Parser;
use std::io;

use recipe_cost::cli::Cli;
use recipe_cost::{
    init_tracing, load_recipe, run_interactive, save_summary_to_json, save_to_csv, show_chart,
    CostChart, Recipe,
};

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let recipe = match &cli.recipe {
        Some(path) => {
            println!("📂 Loading recipe from {}...", path.display());
            load_recipe(path)?
        }
        None => {
            println!("=== Recipe Ingredient Cost Analyzer ===");
            let stdin = io::stdin();
            run_interactive(stdin.lock(), io::stdout())?
        }
    };

    // cheapest_store is None exactly when no ingredient was added
    let (Some(cheapest), total) = recipe.cheapest_store() else {
        println!("No ingredients added, nothing to calculate.");
        return Ok(());
    };

    report(&recipe, cheapest, total);
    run_exports(&cli, &recipe)?;

    if cli.no_chart {
        return Ok(());
    }

    let store = cli.chart_store.as_deref().unwrap_or(cheapest);
    if !recipe.stores().contains(store) {
        tracing::warn!(store, "no ingredient is priced at the chart store");
    }
    show_chart(&CostChart::for_store(&recipe, store))?;

    Ok(())
}

fn report(recipe: &Recipe, store: &str, total: f64) {
    println!("\n=== RESULTS ===");
    println!("Recipe name: {}", recipe.name());
    println!("Servings: {}", recipe.servings());
    println!("Cheapest store: {}", store);
    println!("Total cost at cheapest store: {:.2}", total);
    println!(
        "Cost per serving at cheapest store: {:.2}",
        recipe.per_serving_cost(store)
    );

    println!("\n🏪 Totals by store:");
    for (name, total) in recipe.store_totals() {
        println!("   {:<20} {:>10.2}", name, total);
    }
}

fn run_exports(cli: &Cli, recipe: &Recipe) -> Result<()> {
    println!("\n💾 Saving results...");
    let rows = save_to_csv(recipe, &cli.csv)?;
    println!("✓ {} cost rows saved to {}", rows, cli.csv.display());

    save_summary_to_json(recipe, &cli.summary)?;
    println!("✓ Summary saved to {}", cli.summary.display());

    Ok(())
}
