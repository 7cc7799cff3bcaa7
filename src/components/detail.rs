//! Book detail drawer
//!
//! Slides in from the right edge of the content area and shows every field
//! of a single catalog entry.

use crate::action::Action;
use crate::component::Component;
use crate::model::{Availability, BookId, Candidate};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Detail drawer for a single book
#[derive(Default)]
pub struct DetailComponent {
    /// Cached content lines
    content: Vec<Line<'static>>,
    scroll: usize,
    title: String,
}

impl DetailComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update content for the requested book; `None` means it was not found
    pub fn set_book(&mut self, id: &BookId, book: Option<&Candidate>) {
        self.scroll = 0;
        match book {
            Some(book) => {
                self.title = format!(" {} ", book.title);
                self.content = render_book(book);
            }
            None => {
                tracing::warn!(%id, "detail requested for unknown book");
                self.title = " Book not found ".to_string();
                self.content = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("No book with id {} in the catalog", id),
                        Style::default().fg(Color::Red),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Press Esc to go back",
                        Style::default().fg(Color::DarkGray),
                    )),
                ];
            }
        }
    }
}

fn field(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<14}", label),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(value, Style::default().fg(color)),
    ])
}

fn render_book(book: &Candidate) -> Vec<Line<'static>> {
    let availability_color = match book.availability {
        Availability::Available { .. } => Color::Green,
        Availability::Unavailable { .. } => Color::Red,
        Availability::Unknown => Color::DarkGray,
    };

    let mut lines = vec![
        Line::from(Span::styled(
            book.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            book.author.clone(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        field("ID", book.id.to_string(), Color::White),
        field("Category", book.category.clone(), Color::White),
        field(
            "ISBN",
            book.isbn.clone().unwrap_or_else(|| "—".to_string()),
            Color::White,
        ),
        field(
            "Published",
            book.published_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "—".to_string()),
            Color::White,
        ),
        field(
            "Copies",
            format!("{} {}", book.availability.icon(), book.availability.label()),
            availability_color,
        ),
        Line::from(""),
        Line::from(Span::styled(
            "Description",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    match &book.description {
        Some(text) => lines.push(Line::from(text.clone())),
        None => lines.push(Line::from(Span::styled(
            "No description available",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    lines
}

impl Component for DetailComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Backspace => Some(Action::Back),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);
        let drawer = chunks[1];

        let max_scroll = self.content.len().saturating_sub(1);
        self.scroll = self.scroll.min(max_scroll);

        frame.render_widget(Clear, drawer);
        let paragraph = Paragraph::new(self.content.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.title.clone())
                    .title_style(
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    )
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.scroll as u16, 0));
        frame.render_widget(paragraph, drawer);

        Ok(())
    }
}
