//! Dashboard component
//!
//! Landing screen: catalog statistic cards and a per-category breakdown.

use crate::component::Component;
use crate::model::{Catalog, CatalogStats};
use anyhow::Result;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::collections::BTreeMap;

/// Dashboard with catalog statistics
#[derive(Default)]
pub struct DashboardComponent {
    stats: CatalogStats,
    /// (category, titles), largest first
    categories: Vec<(String, usize)>,
    source: String,
    loaded_at: String,
}

impl DashboardComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh the cached figures from the catalog
    pub fn set_catalog(&mut self, catalog: &Catalog) {
        self.stats = catalog.stats();
        self.source = catalog.source.clone();
        self.loaded_at = catalog.loaded_at.format("%Y-%m-%d %H:%M:%S").to_string();

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for book in catalog.books() {
            *counts.entry(book.category.as_str()).or_default() += 1;
        }
        let mut categories: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(name, n)| (name.to_string(), n))
            .collect();
        // BTreeMap order breaks ties alphabetically
        categories.sort_by(|a, b| b.1.cmp(&a.1));
        self.categories = categories;
    }

    fn stat_card(frame: &mut Frame, area: Rect, label: &str, value: String, color: Color) {
        let card = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                label.to_string(),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(card, area);
    }
}

impl Component for DashboardComponent {
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(area);

        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(rows[0]);

        Self::stat_card(
            frame,
            cards[0],
            "Titles",
            self.stats.titles.to_string(),
            Color::Cyan,
        );
        Self::stat_card(
            frame,
            cards[1],
            "Copies available",
            format!("{}/{}", self.stats.available_copies, self.stats.total_copies),
            Color::Green,
        );
        Self::stat_card(
            frame,
            cards[2],
            "On loan",
            self.stats.on_loan().to_string(),
            Color::Yellow,
        );
        Self::stat_card(
            frame,
            cards[3],
            "Categories",
            self.stats.categories.to_string(),
            Color::Magenta,
        );

        let mut lines = Vec::new();
        let widest = self.categories.first().map(|(_, n)| *n).unwrap_or(1).max(1);
        for (name, count) in &self.categories {
            let bar = "█".repeat((count * 20).div_ceil(widest));
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<24}", name), Style::default().fg(Color::White)),
                Span::styled(bar, Style::default().fg(Color::Blue)),
                Span::styled(format!(" {}", count), Style::default().fg(Color::DarkGray)),
            ]));
        }
        if self.stats.unknown_availability > 0 {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(
                    "  {} title(s) report no copy counts",
                    self.stats.unknown_availability
                ),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  Catalog: {} (loaded {})", self.source, self.loaded_at),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(vec![
            Span::styled("  Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("/", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(
                " to search by title, author or ISBN",
                Style::default().fg(Color::DarkGray),
            ),
        ]));

        let breakdown = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Titles by Category ")
                .title_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(breakdown, rows[1]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_sorted_by_count() {
        let mut dashboard = DashboardComponent::new();
        dashboard.set_catalog(&Catalog::sample());
        let counts: Vec<usize> = dashboard.categories.iter().map(|(_, n)| *n).collect();
        let mut sorted = counts.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(counts, sorted);
        assert_eq!(dashboard.categories[0].0, "Software Engineering");
    }

    #[test]
    fn test_stats_cached_from_catalog() {
        let catalog = Catalog::sample();
        let mut dashboard = DashboardComponent::new();
        dashboard.set_catalog(&catalog);
        assert_eq!(dashboard.stats, catalog.stats());
    }
}
