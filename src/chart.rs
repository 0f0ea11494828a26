// 📊 Chart - ingredient costs at one store as a terminal bar chart
// Bars are drawn with ratatui when the `tui` feature is enabled

use crate::recipe::Recipe;

/// Parallel series of ingredient names and their costs at one store
#[derive(Debug, Clone, PartialEq)]
pub struct CostChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub names: Vec<String>,
    pub costs: Vec<f64>,
}

impl CostChart {
    /// Ingredients not stocked at `store` are charted with a cost of 0
    pub fn for_store(recipe: &Recipe, store: &str) -> Self {
        let (names, costs): (Vec<String>, Vec<f64>) = recipe
            .ingredient_costs(store)
            .into_iter()
            .map(|(name, cost)| (name.to_string(), cost))
            .unzip();

        CostChart {
            title: format!("Ingredient Costs for {} at {}", recipe.name(), store),
            x_label: "Ingredients".to_string(),
            y_label: format!("Cost at {}", store),
            names,
            costs,
        }
    }
}

/// Bar heights for the given costs, in per-mille of the largest cost
///
/// Bar charts take integer values and multiply them internally, so heights
/// stay within 0..=1000 whatever the magnitude of the costs.
pub fn bar_heights(costs: &[f64]) -> Vec<u64> {
    let max = costs
        .iter()
        .copied()
        .filter(|c| c.is_finite())
        .fold(0.0_f64, f64::max);

    costs
        .iter()
        .map(|&cost| {
            if max > 0.0 && cost.is_finite() {
                (cost / max * 1000.0).round().clamp(0.0, 1000.0) as u64
            } else {
                0
            }
        })
        .collect()
}

#[cfg(feature = "tui")]
pub use self::terminal::{render_chart, show_chart};

#[cfg(not(feature = "tui"))]
pub fn show_chart(chart: &CostChart) -> anyhow::Result<()> {
    tracing::warn!(title = %chart.title, "chart skipped, built without the tui feature");
    eprintln!("❌ Chart not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    Ok(())
}

#[cfg(feature = "tui")]
mod terminal {
    use super::{bar_heights, CostChart};
    use anyhow::Result;
    use crossterm::{
        event::{self, Event, KeyCode},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    };
    use ratatui::{
        backend::CrosstermBackend,
        layout::{Constraint, Direction, Layout, Rect},
        style::{Color, Modifier, Style},
        text::{Line, Span},
        widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
        Frame, Terminal,
    };
    use std::io;

    const BAR_GAP: u16 = 2;

    /// Draw the chart and a legend line into `area`
    pub fn render_chart(f: &mut Frame, area: Rect, chart: &CostChart) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Bars
                Constraint::Length(3), // Axis legend
            ])
            .split(area);

        let bars: Vec<Bar> = chart
            .names
            .iter()
            .zip(&chart.costs)
            .zip(bar_heights(&chart.costs))
            .map(|((name, cost), height)| {
                Bar::default()
                    .value(height)
                    .label(Line::from(name.clone()))
                    .text_value(format!("{:.2}", cost))
            })
            .collect();

        let count = chart.names.len().max(1) as u16;
        let bar_width = (chunks[0].width.saturating_sub(2) / count)
            .saturating_sub(BAR_GAP)
            .clamp(3, 15);

        let bar_chart = BarChart::default()
            .block(
                Block::default()
                    .title(chart.title.clone())
                    .borders(Borders::ALL),
            )
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(BAR_GAP)
            .bar_style(Style::default().fg(Color::LightBlue))
            .value_style(Style::default().fg(Color::Black).bg(Color::LightBlue))
            .label_style(Style::default().add_modifier(Modifier::BOLD));

        f.render_widget(bar_chart, chunks[0]);

        let legend = Paragraph::new(Line::from(vec![
            Span::styled("x: ", Style::default().fg(Color::DarkGray)),
            Span::raw(chart.x_label.clone()),
            Span::raw(" │ "),
            Span::styled("y: ", Style::default().fg(Color::DarkGray)),
            Span::raw(chart.y_label.clone()),
            Span::raw(" │ "),
            Span::styled("q/Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" close"),
        ]))
        .block(Block::default().borders(Borders::ALL));

        f.render_widget(legend, chunks[1]);
    }

    /// Show the chart full screen until `q` or `Esc` is pressed
    pub fn show_chart(chart: &CostChart) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = run_chart(&mut terminal, chart);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res?;
        Ok(())
    }

    fn run_chart<B: ratatui::backend::Backend>(
        terminal: &mut Terminal<B>,
        chart: &CostChart,
    ) -> io::Result<()> {
        loop {
            terminal.draw(|f| {
                let area = f.size();
                render_chart(f, area, chart)
            })?;

            if let Event::Key(key) = event::read()? {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::StorePrices;

    fn create_test_recipe() -> Recipe {
        let mut recipe = Recipe::new("Pancakes", 4);
        let flour: StorePrices = [("A", 3.0), ("B", 2.0)].into_iter().collect();
        let syrup: StorePrices = [("A", 6.5)].into_iter().collect();
        recipe.add_ingredient("Flour", 2.0, flour).unwrap();
        recipe.add_ingredient("Syrup", 1.0, syrup).unwrap();
        recipe
    }

    #[test]
    fn test_chart_series_for_store() {
        let chart = CostChart::for_store(&create_test_recipe(), "B");

        assert_eq!(chart.title, "Ingredient Costs for Pancakes at B");
        assert_eq!(chart.x_label, "Ingredients");
        assert_eq!(chart.y_label, "Cost at B");
        assert_eq!(chart.names, vec!["Flour", "Syrup"]);
        assert_eq!(chart.costs, vec![4.0, 0.0]);
    }

    #[test]
    fn test_bar_heights_relative_to_largest_cost() {
        assert_eq!(bar_heights(&[4.0, 2.0, 0.0]), vec![1000, 500, 0]);
        assert_eq!(bar_heights(&[1e17, 1.0]), vec![1000, 0]);
        assert_eq!(bar_heights(&[0.0, 0.0]), vec![0, 0]);
        assert!(bar_heights(&[]).is_empty());
    }

    #[cfg(feature = "tui")]
    #[test]
    fn test_render_chart_to_test_backend() {
        use ratatui::{backend::TestBackend, Terminal};

        let chart = CostChart::for_store(&create_test_recipe(), "A");
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| {
                let area = f.size();
                render_chart(f, area, &chart)
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content.iter().map(|cell| cell.symbol()).collect();

        assert!(text.contains("Ingredient Costs for Pancakes at A"));
        assert!(text.contains("Flour"));
        assert!(text.contains("Syrup"));
        assert!(text.contains("Cost at A"));
    }

    #[cfg(feature = "tui")]
    #[test]
    fn test_render_chart_with_huge_cost() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut recipe = Recipe::new("Feast", 1);
        let x: StorePrices = [("A", 1e17)].into_iter().collect();
        let y: StorePrices = [("A", 1.0)].into_iter().collect();
        recipe.add_ingredient("X", 1.0, x).unwrap();
        recipe.add_ingredient("Y", 1.0, y).unwrap();

        let chart = CostChart::for_store(&recipe, "A");
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| {
                let area = f.size();
                render_chart(f, area, &chart)
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content.iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Ingredient Costs for Feast at A"));
    }
}
