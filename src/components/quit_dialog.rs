//! Quit confirmation dialog component
//!
//! Two-button confirm that names what leaving would discard: the page being
//! viewed and any query still sitting in the search box.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::Route;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Which button has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Choice {
    #[default]
    Stay,
    Leave,
}

/// Quit confirmation dialog
#[derive(Default)]
pub struct QuitDialog {
    choice: Choice,
    /// Title and path of the page open when the dialog was raised
    page: String,
    /// Unsubmitted search text, if any
    query: Option<String>,
}

impl QuitDialog {
    /// Prepare for display; focus always starts on "Stay"
    pub fn open(&mut self, route: &Route, query: &str) {
        self.choice = Choice::Stay;
        self.page = format!("{} ({})", route.title(), route.path());
        let query = query.trim();
        self.query = (!query.is_empty()).then(|| query.to_string());
    }

    fn confirm(&self) -> Action {
        match self.choice {
            Choice::Stay => Action::CloseModal,
            Choice::Leave => Action::ForceQuit,
        }
    }

    fn button(label: &str, focused: bool, color: Color) -> Span<'static> {
        let style = if focused {
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        Span::styled(format!("  {}  ", label), style)
    }
}

impl Component for QuitDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ForceQuit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                self.choice = match self.choice {
                    Choice::Stay => Choice::Leave,
                    Choice::Leave => Choice::Stay,
                };
                None
            }
            KeyCode::Enter => Some(self.confirm()),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let height = if self.query.is_some() { 9 } else { 8 };
        let popup_area = centered_popup(area, 48, height);
        frame.render_widget(Clear, popup_area);

        let mut content = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Leave libris?",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("Viewing {}", self.page),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        if let Some(query) = &self.query {
            content.push(Line::from(Span::styled(
                format!("Search \"{}\" will be discarded", query),
                Style::default().fg(Color::Yellow),
            )));
        }
        content.push(Line::from(""));
        content.push(Line::from(vec![
            Self::button("Stay", self.choice == Choice::Stay, Color::Green),
            Span::raw("   "),
            Self::button("Quit", self.choice == Choice::Leave, Color::Red),
        ]));

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Quit ")
                    .title_bottom(Line::from(" ←/→ choose · Enter confirm · y/n ").centered())
                    .title_style(
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(dialog: &mut QuitDialog, code: KeyCode) -> Option<Action> {
        dialog
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn test_enter_defaults_to_stay() {
        let mut dialog = QuitDialog::default();
        dialog.open(&Route::Dashboard, "");
        assert_eq!(press(&mut dialog, KeyCode::Enter), Some(Action::CloseModal));
    }

    #[test]
    fn test_toggle_then_enter_quits() {
        let mut dialog = QuitDialog::default();
        dialog.open(&Route::Dashboard, "");
        assert_eq!(press(&mut dialog, KeyCode::Right), None);
        assert_eq!(press(&mut dialog, KeyCode::Enter), Some(Action::ForceQuit));
    }

    #[test]
    fn test_reopening_resets_focus() {
        let mut dialog = QuitDialog::default();
        dialog.open(&Route::Dashboard, "");
        press(&mut dialog, KeyCode::Tab);
        dialog.open(&Route::Dashboard, "");
        assert_eq!(press(&mut dialog, KeyCode::Enter), Some(Action::CloseModal));
    }

    #[test]
    fn test_shortcuts() {
        let mut dialog = QuitDialog::default();
        assert_eq!(press(&mut dialog, KeyCode::Char('y')), Some(Action::ForceQuit));
        assert_eq!(press(&mut dialog, KeyCode::Esc), Some(Action::CloseModal));
    }

    #[test]
    fn test_open_records_page_and_pending_query() {
        let mut dialog = QuitDialog::default();
        dialog.open(
            &Route::SearchResults {
                query: "dune".to_string(),
            },
            "  herbert ",
        );
        assert_eq!(dialog.page, "Search Results (/books?search=dune)");
        assert_eq!(dialog.query.as_deref(), Some("herbert"));

        dialog.open(&Route::Dashboard, "   ");
        assert_eq!(dialog.query, None);
    }
}
