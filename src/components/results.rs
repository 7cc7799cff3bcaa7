//! Search results component
//!
//! The "view all results" screen: every catalog match for a query, rendered
//! as an aligned table with a movable row selection.

use super::text::fit;
use crate::action::Action;
use crate::component::Component;
use crate::model::{Candidate, Route};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

const HEADERS: [&str; 5] = ["Title", "Author", "Category", "Year", "Availability"];
/// Header line plus separator line
const HEADER_ROWS: usize = 2;

/// Table of search results
#[derive(Default)]
pub struct ResultsComponent {
    query: String,
    rows: Vec<Candidate>,
    selected: usize,
    scroll: usize,
    /// Inner area of the last draw, for mouse hit-testing
    body: Rect,
}

impl ResultsComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_results(&mut self, query: &str, rows: Vec<Candidate>) {
        self.query = query.to_string();
        self.rows = rows;
        self.selected = 0;
        self.scroll = 0;
    }

    #[cfg(test)]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn selected_candidate(&self) -> Option<&Candidate> {
        self.rows.get(self.selected)
    }

    pub fn next(&mut self) {
        if !self.rows.is_empty() {
            self.selected = (self.selected + 1).min(self.rows.len() - 1);
        }
    }

    pub fn previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn open_selected(&self) -> Option<Action> {
        self.selected_candidate()
            .map(|c| Action::Navigate(Route::BookDetail(c.id.clone())))
    }

    /// Column widths sized to fit `width`, title getting the slack
    fn column_widths(width: usize) -> [usize; 5] {
        let separators = 3 * (HEADERS.len() - 1);
        let fixed = [0, 20, 18, 4, 14];
        let title = width
            .saturating_sub(separators + fixed.iter().sum::<usize>())
            .max(10);
        [title, fixed[1], fixed[2], fixed[3], fixed[4]]
    }

    /// Build table lines from rows
    pub fn build_table_lines(rows: &[Candidate], selected: usize, width: usize) -> Vec<Line<'static>> {
        let widths = Self::column_widths(width);
        let mut lines = Vec::with_capacity(rows.len() + HEADER_ROWS);

        let header_spans: Vec<Span> = HEADERS
            .iter()
            .zip(widths)
            .enumerate()
            .flat_map(|(i, (h, w))| {
                let mut spans = vec![Span::styled(
                    fit(h, w),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )];
                if i + 1 < HEADERS.len() {
                    spans.push(Span::raw(" │ "));
                }
                spans
            })
            .collect();
        lines.push(Line::from(header_spans));

        let separator: String = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        lines.push(Line::from(Span::styled(
            separator,
            Style::default().fg(Color::DarkGray),
        )));

        for (i, row) in rows.iter().enumerate() {
            let year = row
                .published_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "—".to_string());
            let availability_color = if row.availability.is_available() {
                Color::Green
            } else {
                Color::Red
            };
            let cells = [
                (row.title.clone(), Color::White),
                (row.author.clone(), Color::Gray),
                (row.category.clone(), Color::Gray),
                (year, Color::Gray),
                (row.availability.label(), availability_color),
            ];

            let mut spans = Vec::new();
            for (j, ((text, color), w)) in cells.into_iter().zip(widths).enumerate() {
                spans.push(Span::styled(fit(&text, w), Style::default().fg(color)));
                if j + 1 < widths.len() {
                    spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
                }
            }

            let line = Line::from(spans);
            if i == selected {
                lines.push(line.style(Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD)));
            } else {
                lines.push(line);
            }
        }

        lines
    }

    /// Keep the selected row within the visible window
    fn follow_selection(&mut self, visible_rows: usize) {
        if visible_rows == 0 {
            return;
        }
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + visible_rows {
            self.scroll = self.selected + 1 - visible_rows;
        }
    }
}

impl Component for ResultsComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Enter => Some(Action::OpenItem),
            KeyCode::Esc | KeyCode::Backspace => Some(Action::Back),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let body = self.body;
        let inside = mouse.column >= body.x
            && mouse.column < body.x + body.width
            && mouse.row >= body.y + HEADER_ROWS as u16
            && mouse.row < body.y + body.height;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if inside => {
                let index = (mouse.row - body.y) as usize - HEADER_ROWS + self.scroll;
                if index < self.rows.len() {
                    self.selected = index;
                    return Ok(self.open_selected());
                }
                Ok(None)
            }
            MouseEventKind::ScrollDown => Ok(Some(Action::NextItem)),
            MouseEventKind::ScrollUp => Ok(Some(Action::PrevItem)),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextItem => self.next(),
            Action::PrevItem => self.previous(),
            Action::OpenItem => return Ok(self.open_selected()),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let title = format!(" Results for \"{}\" ({}) ", self.query, self.rows.len());
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        self.body = inner;

        if self.rows.is_empty() {
            let message = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("No books match \"{}\"", self.query),
                    Style::default().fg(Color::Yellow),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Try a shorter query, an author name or an ISBN",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .alignment(ratatui::layout::Alignment::Center)
            .block(block);
            frame.render_widget(message, area);
            return Ok(());
        }

        let visible_rows = (inner.height as usize).saturating_sub(HEADER_ROWS);
        self.follow_selection(visible_rows);

        let mut lines = Self::build_table_lines(&self.rows, self.selected, inner.width as usize);
        // header stays pinned; rows scroll beneath it
        let body: Vec<Line> = lines.split_off(HEADER_ROWS).into_iter().skip(self.scroll).collect();
        lines.extend(body);

        frame.render_widget(Paragraph::new(lines).block(block), area);

        if self.rows.len() > visible_rows {
            let mut scrollbar_state =
                ScrollbarState::new(self.rows.len().saturating_sub(visible_rows)).position(self.scroll);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BookId, Catalog};

    fn component() -> ResultsComponent {
        let catalog = Catalog::sample();
        let mut results = ResultsComponent::new();
        results.set_results("clean", catalog.search("clean", None));
        results
    }

    #[test]
    fn test_selection_clamps_at_ends() {
        let mut results = component();
        assert_eq!(results.len(), 2);
        results.previous();
        assert_eq!(results.selected, 0);
        results.next();
        results.next();
        results.next();
        assert_eq!(results.selected, 1);
    }

    #[test]
    fn test_open_item_navigates_to_selected_book() {
        let mut results = component();
        results.update(Action::NextItem).unwrap();
        let action = results.update(Action::OpenItem).unwrap();
        assert_eq!(
            action,
            Some(Action::Navigate(Route::BookDetail(BookId::from(2))))
        );
    }

    #[test]
    fn test_open_item_on_empty_results() {
        let mut results = ResultsComponent::new();
        results.set_results("zzz", Vec::new());
        assert_eq!(results.update(Action::OpenItem).unwrap(), None);
    }

    #[test]
    fn test_table_lines_include_header_and_rows() {
        let results = component();
        let lines = ResultsComponent::build_table_lines(&results.rows, 0, 100);
        assert_eq!(lines.len(), HEADER_ROWS + 2);
        let header: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(header.starts_with("Title"));
    }

    #[test]
    fn test_follow_selection_scrolls() {
        let mut results = ResultsComponent::new();
        results.set_results("", Catalog::sample().search("", None));
        results.selected = 7;
        results.follow_selection(5);
        assert_eq!(results.scroll, 3);
        results.selected = 1;
        results.follow_selection(5);
        assert_eq!(results.scroll, 1);
    }
}
