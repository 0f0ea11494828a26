use crate::export::{DEFAULT_CSV_PATH, DEFAULT_SUMMARY_PATH};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "recipe-cost",
    version,
    about = "Recipe ingredient cost analyzer: cheapest store, CSV/JSON export, bar chart"
)]
pub struct Cli {
    /// Load the recipe from a JSON file instead of prompting
    #[arg(short, long)]
    pub recipe: Option<PathBuf>,

    /// Where to write the per-store cost rows
    #[arg(long, default_value = DEFAULT_CSV_PATH)]
    pub csv: PathBuf,

    /// Where to write the JSON summary
    #[arg(long, default_value = DEFAULT_SUMMARY_PATH)]
    pub summary: PathBuf,

    /// Chart this store instead of the cheapest one
    #[arg(long)]
    pub chart_store: Option<String>,

    /// Skip the bar chart
    #[arg(long)]
    pub no_chart: bool,
}
