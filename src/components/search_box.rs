//! Search box component
//!
//! A debounced search-and-select widget. It owns the query text, the
//! dropdown open state, the keyboard selection and a single pending-search
//! deadline. It does not fetch anything: debounced queries leave as
//! `Action::Search`, and the parent pushes `results` / `loading` back in.
//!
//! Time is passed in explicitly (`now: Instant`) so the debounce can be
//! driven deterministically.

use super::text::truncate;
use crate::action::Action;
use crate::component::Component;
use crate::config::SearchSettings;
use crate::model::{Availability, Candidate, Route};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Most candidate rows shown at once; the list scrolls past this
const MAX_VISIBLE_ROWS: usize = 10;

/// What picking a candidate produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectBehavior {
    /// Navigate to the candidate's detail route
    #[default]
    Navigate,
    /// Hand the candidate to the parent as `Action::CandidateChosen`
    Emit,
}

/// Static configuration of a search box
#[derive(Debug, Clone)]
pub struct SearchBoxConfig {
    pub placeholder: String,
    pub debounce: Duration,
    pub min_query_len: usize,
    pub show_all_on_empty: bool,
    pub select: SelectBehavior,
}

impl Default for SearchBoxConfig {
    fn default() -> Self {
        Self::from(&SearchSettings::default())
    }
}

impl From<&SearchSettings> for SearchBoxConfig {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            placeholder: settings.placeholder.clone(),
            debounce: settings.debounce(),
            min_query_len: settings.min_query_len,
            show_all_on_empty: settings.show_all_on_empty,
            select: SelectBehavior::Navigate,
        }
    }
}

/// Screen regions remembered from the last draw, used for mouse hit-testing
#[derive(Debug, Clone, Copy, Default)]
struct HitAreas {
    input: Rect,
    clear: Option<Rect>,
    dropdown: Option<Rect>,
    items: Option<Rect>,
    footer: Option<Rect>,
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Debounced, keyboard-navigable search box with a result dropdown
pub struct SearchBox {
    config: SearchBoxConfig,
    query: String,
    /// Candidates last pushed by the parent
    results: Vec<Candidate>,
    loading: bool,
    /// Keyboard selection, always `< results.len()` when set
    selected: Option<usize>,
    open: bool,
    focused: bool,
    /// Deadline of the single pending debounced search
    pending: Option<Instant>,
    list_state: ListState,
    areas: HitAreas,
    spinner_frame: usize,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::new(SearchBoxConfig::default())
    }
}

impl SearchBox {
    pub fn new(config: SearchBoxConfig) -> Self {
        Self {
            config,
            query: String::new(),
            results: Vec::new(),
            loading: false,
            selected: None,
            open: false,
            focused: false,
            pending: None,
            list_state: ListState::default(),
            areas: HitAreas::default(),
            spinner_frame: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Candidate] {
        &self.results
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_pending_search(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether a screen position falls on the input or the open dropdown
    pub fn contains(&self, column: u16, row: u16) -> bool {
        contains(self.areas.input, column, row)
            || self
                .areas
                .dropdown
                .is_some_and(|d| self.open && contains(d, column, row))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Controlled inputs
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the candidate list; any keyboard selection is dropped
    pub fn set_results(&mut self, results: Vec<Candidate>) {
        self.results = results;
        self.set_selected(None);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Return to the freshly-mounted state
    pub fn reset(&mut self) {
        let config = self.config.clone();
        *self = Self::new(config);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State transitions
    // ─────────────────────────────────────────────────────────────────────────

    fn query_len(&self) -> usize {
        self.query.chars().count()
    }

    /// Opening rule: long enough, or empty with `show_all_on_empty` while focused
    fn should_open(&self) -> bool {
        let len = self.query_len();
        len >= self.config.min_query_len
            || (self.config.show_all_on_empty && len == 0 && self.focused)
    }

    fn set_selected(&mut self, selected: Option<usize>) {
        self.selected = selected;
        self.list_state.select(selected);
    }

    fn close(&mut self) {
        self.open = false;
        self.set_selected(None);
    }

    /// Restart (or cancel) the debounce after the query text changed
    fn query_changed(&mut self, now: Instant) {
        self.set_selected(None);
        if self.should_open() {
            self.open = true;
            self.pending = Some(now + self.config.debounce);
        } else {
            self.close();
            self.pending = None;
        }
    }

    /// Give the widget focus
    ///
    /// With `show_all_on_empty` and an empty query this requests the default
    /// listing right away.
    pub fn focus(&mut self) -> Option<Action> {
        let already_showing = self.focused && self.open;
        self.focused = true;
        if self.query.is_empty() && self.config.show_all_on_empty && !already_showing {
            self.open = true;
            self.pending = None;
            return Some(Action::Search(String::new()));
        }
        if self.should_open() {
            self.open = true;
        }
        None
    }

    /// Drop focus and close the dropdown; the query is kept
    pub fn blur(&mut self) {
        self.focused = false;
        self.close();
    }

    pub fn input_char(&mut self, c: char, now: Instant) {
        if c.is_control() {
            return;
        }
        self.query.push(c);
        self.query_changed(now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if self.query.pop().is_some() {
            self.query_changed(now);
        }
    }

    /// Clear-control behaviour: empty the query and cancel any pending search
    pub fn clear(&mut self) -> Option<Action> {
        self.query.clear();
        self.pending = None;
        self.focused = true;
        if self.config.show_all_on_empty {
            self.open = true;
            self.set_selected(None);
            Some(Action::Search(String::new()))
        } else {
            self.close();
            None
        }
    }

    /// Fire the debounced search once its quiet period has elapsed
    pub fn tick(&mut self, now: Instant) -> Option<Action> {
        if self.loading {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
        }
        match self.pending {
            Some(deadline) if now >= deadline => {
                self.pending = None;
                tracing::debug!(query = %self.query, "debounce elapsed");
                Some(Action::Search(self.query.clone()))
            }
            _ => None,
        }
    }

    fn can_navigate(&self) -> bool {
        self.open && !self.loading && !self.results.is_empty()
    }

    /// Move the selection down, wrapping to the first candidate
    pub fn select_next(&mut self) {
        if !self.can_navigate() {
            return;
        }
        let len = self.results.len();
        let next = match self.selected {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.set_selected(Some(next));
    }

    /// Move the selection up, wrapping to the last candidate
    pub fn select_prev(&mut self) {
        if !self.can_navigate() {
            return;
        }
        let len = self.results.len();
        let prev = match self.selected {
            Some(i) if i > 0 => i - 1,
            _ => len - 1,
        };
        self.set_selected(Some(prev));
    }

    /// Enter: pick the selected candidate, or fall back to "view all"
    pub fn confirm(&mut self) -> Option<Action> {
        if !self.focused {
            return None;
        }
        if let Some(index) = self.selected.filter(|_| self.can_navigate()) {
            return self.choose(index);
        }
        self.view_all()
    }

    /// Escape: close an open dropdown, or release focus when already closed
    pub fn escape(&mut self) -> Option<Action> {
        if self.open {
            self.close();
            None
        } else {
            self.focused = false;
            Some(Action::BlurSearch)
        }
    }

    /// Mouse-down on a dropdown row; out-of-range rows do nothing
    pub fn click_candidate(&mut self, index: usize) -> Option<Action> {
        if self.loading {
            return None;
        }
        self.choose(index)
    }

    /// Mouse-down at a screen position
    ///
    /// Clicks outside both the input and the dropdown close the dropdown
    /// without touching the query.
    pub fn click_at(&mut self, column: u16, row: u16) -> Option<Action> {
        if let Some(clear) = self.areas.clear {
            if !self.query.is_empty() && contains(clear, column, row) {
                return self.clear();
            }
        }

        if contains(self.areas.input, column, row) {
            return self.focus();
        }

        if let Some(dropdown) = self.areas.dropdown.filter(|_| self.open) {
            if contains(dropdown, column, row) {
                if let Some(items) = self.areas.items {
                    if contains(items, column, row) {
                        let index = (row - items.y) as usize + self.list_state.offset();
                        return self.click_candidate(index);
                    }
                }
                if let Some(footer) = self.areas.footer {
                    if contains(footer, column, row) {
                        return self.view_all();
                    }
                }
                return None;
            }
        }

        self.blur();
        None
    }

    fn choose(&mut self, index: usize) -> Option<Action> {
        let candidate = self.results.get(index)?.clone();
        let action = match self.config.select {
            SelectBehavior::Navigate => Action::Navigate(Route::BookDetail(candidate.id)),
            SelectBehavior::Emit => Action::CandidateChosen(candidate),
        };
        tracing::debug!(%action, "candidate chosen");
        self.query.clear();
        self.pending = None;
        self.close();
        Some(action)
    }

    fn view_all(&mut self) -> Option<Action> {
        let query = self.query.trim();
        if query.is_empty() {
            return None;
        }
        let route = Route::SearchResults {
            query: query.to_string(),
        };
        self.pending = None;
        self.close();
        Some(Action::Navigate(route))
    }

    /// Key handling with an explicit clock
    pub fn handle_key_at(&mut self, key: KeyEvent, now: Instant) -> Option<Action> {
        if !self.focused {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => self.clear(),
            KeyCode::Char('n') if ctrl => {
                self.select_next();
                None
            }
            KeyCode::Char('p') if ctrl => {
                self.select_prev();
                None
            }
            KeyCode::Char(_) if ctrl => None,
            KeyCode::Char(c) => {
                self.input_char(c, now);
                None
            }
            KeyCode::Backspace => {
                self.backspace(now);
                None
            }
            KeyCode::Down => {
                self.select_next();
                None
            }
            KeyCode::Up => {
                self.select_prev();
                None
            }
            KeyCode::Enter => self.confirm(),
            KeyCode::Esc => self.escape(),
            _ => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    fn draw_input(&mut self, frame: &mut Frame, area: Rect) {
        let border = if self.focused {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Search ")
            .title_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(2)])
            .split(inner);

        let mut spans = vec![Span::styled("⌕ ", Style::default().fg(Color::DarkGray))];
        if self.query.is_empty() {
            spans.push(Span::styled(
                self.config.placeholder.clone(),
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            let visible = chunks[0].width.saturating_sub(3) as usize;
            let query = if self.query.width() > visible {
                // keep the tail (where the cursor is) in view
                let skip = self.query.chars().count().saturating_sub(visible);
                self.query.chars().skip(skip).collect()
            } else {
                self.query.clone()
            };
            spans.push(Span::styled(query, Style::default().fg(Color::White)));
        }
        if self.focused {
            spans.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

        if self.query.is_empty() {
            self.areas.clear = None;
        } else {
            frame.render_widget(
                Paragraph::new(Span::styled("✕", Style::default().fg(Color::Red))),
                chunks[1],
            );
            self.areas.clear = Some(chunks[1]);
        }
    }

    fn candidate_item(candidate: &Candidate, width: usize) -> ListItem<'static> {
        let color = match candidate.availability {
            Availability::Available { .. } => Color::Green,
            Availability::Unavailable { .. } => Color::Red,
            Availability::Unknown => Color::DarkGray,
        };
        let title_width = (width * 3 / 5).max(8);
        let title = truncate(&candidate.title, title_width);
        let rest = width.saturating_sub(title.width() + 5);
        ListItem::new(Line::from(vec![
            Span::styled(
                format!("{} ", candidate.availability.icon()),
                Style::default().fg(color),
            ),
            Span::styled(title, Style::default().fg(Color::White)),
            Span::styled(" — ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                truncate(&candidate.subtitle(), rest),
                Style::default().fg(Color::Gray),
            ),
        ]))
    }

    fn draw_dropdown(&mut self, frame: &mut Frame, input: Rect) {
        self.areas.dropdown = None;
        self.areas.items = None;
        self.areas.footer = None;
        if !self.open {
            return;
        }

        let screen = frame.area();
        let room = screen.bottom().saturating_sub(input.bottom());
        let show_footer = !self.loading && !self.query.trim().is_empty();
        let item_rows = if self.loading || self.results.is_empty() {
            1
        } else {
            self.results.len().min(MAX_VISIBLE_ROWS)
        };
        let wanted = item_rows as u16 + 2 + u16::from(show_footer);
        let height = wanted.min(room);
        if height < 3 {
            return;
        }

        let area = Rect::new(input.x, input.bottom(), input.width, height);
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.areas.dropdown = Some(area);

        let footer_rows = u16::from(show_footer && inner.height > 1);
        let items_area = Rect::new(
            inner.x,
            inner.y,
            inner.width,
            inner.height.saturating_sub(footer_rows),
        );

        if self.loading {
            let spinner = SPINNER[self.spinner_frame];
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("{} Searching…", spinner),
                    Style::default().fg(Color::Yellow),
                )),
                items_area,
            );
        } else if self.results.is_empty() {
            let message = if self.query.trim().is_empty() {
                "No books in the catalog".to_string()
            } else {
                format!("No books match \"{}\"", self.query.trim())
            };
            frame.render_widget(
                Paragraph::new(Span::styled(message, Style::default().fg(Color::DarkGray))),
                items_area,
            );
        } else {
            let width = items_area.width.saturating_sub(2) as usize;
            let items: Vec<ListItem> = self
                .results
                .iter()
                .map(|c| Self::candidate_item(c, width))
                .collect();
            let list = List::new(items)
                .highlight_style(
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▶ ");
            frame.render_stateful_widget(list, items_area, &mut self.list_state);
            self.areas.items = Some(items_area);
        }

        if footer_rows > 0 {
            let footer = Rect::new(inner.x, items_area.bottom(), inner.width, 1);
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(" ↵ ", Style::default().fg(Color::Yellow)),
                    Span::styled(
                        format!("View all results for \"{}\"", self.query.trim()),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::UNDERLINED),
                    ),
                ])),
                footer,
            );
            self.areas.footer = Some(footer);
        }
    }
}

impl Component for SearchBox {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(self.handle_key_at(key, Instant::now()))
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let action = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.click_at(mouse.column, mouse.row)
            }
            MouseEventKind::ScrollDown if self.contains(mouse.column, mouse.row) => {
                self.select_next();
                None
            }
            MouseEventKind::ScrollUp if self.contains(mouse.column, mouse.row) => {
                self.select_prev();
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => Ok(self.tick(Instant::now())),
            _ => Ok(None),
        }
    }

    /// Draws the input into `area` and the dropdown directly beneath it,
    /// over whatever was rendered there before.
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.areas.input = area;
        self.draw_input(frame, area);
        self.draw_dropdown(frame, area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::candidate::RawRecord;
    use crate::model::BookId;
    use ratatui::{backend::TestBackend, Terminal};

    const WINDOW: Duration = Duration::from_millis(300);

    fn candidate(id: u64, title: &str) -> Candidate {
        Candidate::try_from(RawRecord {
            id: Some(crate::model::candidate::RawId::Number(id)),
            title: Some(title.to_string()),
            ..RawRecord::default()
        })
        .unwrap()
    }

    fn three() -> Vec<Candidate> {
        vec![
            candidate(1, "Clean Code"),
            candidate(2, "The Clean Coder"),
            candidate(3, "Clean Architecture"),
        ]
    }

    fn focused_box(show_all_on_empty: bool) -> SearchBox {
        let mut sb = SearchBox::new(SearchBoxConfig {
            show_all_on_empty,
            ..SearchBoxConfig::default()
        });
        let _ = sb.focus();
        sb
    }

    fn type_str(sb: &mut SearchBox, text: &str, start: Instant, gap: Duration) -> Instant {
        let mut now = start;
        for c in text.chars() {
            sb.input_char(c, now);
            now += gap;
        }
        now - gap
    }

    /// Open box showing three results with no selection
    fn open_with_three() -> SearchBox {
        let mut sb = focused_box(false);
        type_str(&mut sb, "Clean", Instant::now(), Duration::ZERO);
        sb.set_results(three());
        sb
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    // ── Debounce ────────────────────────────────────────────────────────────

    #[test]
    fn test_rapid_typing_searches_once_with_final_query() {
        let mut sb = focused_box(false);
        let t0 = Instant::now();
        let last = type_str(&mut sb, "Clean", t0, Duration::from_millis(10));

        // nothing fires while typing
        for ms in [0, 100, 299] {
            assert_eq!(sb.tick(last + Duration::from_millis(ms)), None);
        }
        assert_eq!(sb.tick(last + WINDOW), Some(Action::Search("Clean".into())));
        // single-flight: nothing more until the next keystroke
        assert_eq!(sb.tick(last + WINDOW * 3), None);
    }

    #[test]
    fn test_keystrokes_inside_window_restart_timer() {
        let mut sb = focused_box(false);
        let t0 = Instant::now();
        let gap = Duration::from_millis(100);

        sb.input_char('C', t0);
        assert_eq!(sb.tick(t0 + gap), None);
        sb.input_char('l', t0 + gap);
        assert_eq!(sb.tick(t0 + gap * 2), None);
        sb.input_char('e', t0 + gap * 2);

        // 300ms after 'C' but only 100ms after 'e'
        assert_eq!(sb.tick(t0 + gap * 3), None);
        assert_eq!(
            sb.tick(t0 + gap * 2 + WINDOW),
            Some(Action::Search("Cle".into()))
        );
        assert_eq!(sb.tick(t0 + gap * 10), None);
    }

    #[test]
    fn test_short_query_never_searches_or_opens() {
        let mut sb = focused_box(false);
        let t0 = Instant::now();
        sb.input_char('C', t0);
        assert!(!sb.is_open());
        assert!(!sb.has_pending_search());
        assert_eq!(sb.tick(t0 + WINDOW * 2), None);
    }

    #[test]
    fn test_shrinking_below_minimum_cancels_pending_search() {
        let mut sb = focused_box(false);
        let t0 = Instant::now();
        type_str(&mut sb, "Cl", t0, Duration::ZERO);
        assert!(sb.is_open());
        sb.backspace(t0 + Duration::from_millis(50));
        assert!(!sb.is_open());
        assert_eq!(sb.tick(t0 + WINDOW * 2), None);
    }

    #[test]
    fn test_reset_drops_pending_search() {
        let mut sb = focused_box(false);
        let t0 = Instant::now();
        type_str(&mut sb, "Dune", t0, Duration::ZERO);
        sb.reset();
        assert_eq!(sb.query(), "");
        assert_eq!(sb.tick(t0 + WINDOW), None);
    }

    // ── show_all_on_empty ──────────────────────────────────────────────────

    #[test]
    fn test_focus_with_show_all_requests_default_listing() {
        let mut sb = SearchBox::new(SearchBoxConfig {
            show_all_on_empty: true,
            ..SearchBoxConfig::default()
        });
        assert_eq!(sb.focus(), Some(Action::Search(String::new())));
        assert!(sb.is_open());
    }

    #[test]
    fn test_focus_without_show_all_stays_closed() {
        let mut sb = SearchBox::default();
        assert_eq!(sb.focus(), None);
        assert!(!sb.is_open());
    }

    #[test]
    fn test_clear_with_show_all_reissues_empty_search() {
        let mut sb = focused_box(true);
        let t0 = Instant::now();
        type_str(&mut sb, "Dune", t0, Duration::ZERO);
        assert_eq!(sb.clear(), Some(Action::Search(String::new())));
        assert_eq!(sb.query(), "");
        assert!(sb.is_open());
        // the search scheduled by typing was cancelled
        assert_eq!(sb.tick(t0 + WINDOW), None);
    }

    #[test]
    fn test_clear_without_show_all_closes() {
        let mut sb = open_with_three();
        assert_eq!(sb.clear(), None);
        assert_eq!(sb.query(), "");
        assert!(!sb.is_open());
    }

    // ── Keyboard navigation ────────────────────────────────────────────────

    #[test]
    fn test_selection_starts_unset() {
        let sb = open_with_three();
        assert!(sb.is_open());
        assert_eq!(sb.selected(), None);
    }

    #[test]
    fn test_arrow_down_wraps() {
        let mut sb = open_with_three();
        let now = Instant::now();
        for _ in 0..4 {
            sb.handle_key_at(key(KeyCode::Down), now);
        }
        assert_eq!(sb.selected(), Some(0));
    }

    #[test]
    fn test_k_down_presses_land_on_k_minus_one_mod_n() {
        let now = Instant::now();
        for k in 1..=10 {
            let mut sb = open_with_three();
            for _ in 0..k {
                sb.handle_key_at(key(KeyCode::Down), now);
            }
            assert_eq!(sb.selected(), Some((k - 1) % 3), "after {} presses", k);
        }
    }

    #[test]
    fn test_single_result_stays_selected_both_ways() {
        let mut sb = focused_box(false);
        type_str(&mut sb, "Dune", Instant::now(), Duration::ZERO);
        sb.set_results(vec![candidate(4, "Dune")]);
        let now = Instant::now();

        sb.handle_key_at(key(KeyCode::Down), now);
        assert_eq!(sb.selected(), Some(0));
        sb.handle_key_at(key(KeyCode::Down), now);
        assert_eq!(sb.selected(), Some(0));
        sb.handle_key_at(key(KeyCode::Up), now);
        assert_eq!(sb.selected(), Some(0));

        let mut fresh = focused_box(false);
        type_str(&mut fresh, "Dune", Instant::now(), Duration::ZERO);
        fresh.set_results(vec![candidate(4, "Dune")]);
        fresh.handle_key_at(key(KeyCode::Up), now);
        assert_eq!(fresh.selected(), Some(0));
    }

    #[test]
    fn test_arrow_up_from_first_wraps_to_last() {
        let mut sb = open_with_three();
        sb.select_next();
        assert_eq!(sb.selected(), Some(0));
        sb.select_prev();
        assert_eq!(sb.selected(), Some(2));
    }

    #[test]
    fn test_arrow_up_from_unset_selects_last() {
        let mut sb = open_with_three();
        sb.select_prev();
        assert_eq!(sb.selected(), Some(2));
    }

    #[test]
    fn test_navigation_ignored_while_loading_or_empty() {
        let mut sb = open_with_three();
        sb.set_loading(true);
        sb.select_next();
        assert_eq!(sb.selected(), None);

        sb.set_loading(false);
        sb.set_results(Vec::new());
        sb.select_next();
        assert_eq!(sb.selected(), None);
    }

    #[test]
    fn test_new_results_reset_selection() {
        let mut sb = open_with_three();
        sb.select_next();
        sb.select_next();
        sb.set_results(vec![candidate(9, "Clean Slate")]);
        assert_eq!(sb.selected(), None);
    }

    #[test]
    fn test_enter_with_selection_navigates_to_that_candidate() {
        let mut sb = open_with_three();
        sb.select_next();
        sb.select_next();
        let action = sb.handle_key_at(key(KeyCode::Enter), Instant::now());
        assert_eq!(
            action,
            Some(Action::Navigate(Route::BookDetail(BookId::from(2))))
        );
        assert!(!sb.is_open());
        assert_eq!(sb.selected(), None);
        assert_eq!(sb.query(), "");
    }

    #[test]
    fn test_enter_with_emit_behavior_hands_candidate_back() {
        let mut sb = SearchBox::new(SearchBoxConfig {
            select: SelectBehavior::Emit,
            ..SearchBoxConfig::default()
        });
        let _ = sb.focus();
        type_str(&mut sb, "Clean", Instant::now(), Duration::ZERO);
        sb.set_results(three());
        sb.select_prev();
        assert_eq!(
            sb.confirm(),
            Some(Action::CandidateChosen(candidate(3, "Clean Architecture")))
        );
    }

    #[test]
    fn test_enter_without_selection_views_all() {
        let mut sb = open_with_three();
        let action = sb.confirm();
        assert_eq!(
            action,
            Some(Action::Navigate(Route::SearchResults {
                query: "Clean".into()
            }))
        );
        if let Some(Action::Navigate(route)) = action {
            assert_eq!(route.path(), "/books?search=Clean");
        }
        assert!(!sb.is_open());
        assert_eq!(sb.query(), "Clean");
    }

    #[test]
    fn test_enter_with_empty_query_does_nothing() {
        let mut sb = focused_box(false);
        assert_eq!(sb.confirm(), None);
    }

    #[test]
    fn test_escape_closes_and_keeps_query() {
        let mut sb = open_with_three();
        sb.select_next();
        assert_eq!(sb.handle_key_at(key(KeyCode::Esc), Instant::now()), None);
        assert!(!sb.is_open());
        assert_eq!(sb.selected(), None);
        assert_eq!(sb.query(), "Clean");
        assert!(sb.is_focused());

        // second Escape releases focus
        assert_eq!(
            sb.handle_key_at(key(KeyCode::Esc), Instant::now()),
            Some(Action::BlurSearch)
        );
        assert!(!sb.is_focused());
    }

    #[test]
    fn test_keys_ignored_when_unfocused() {
        let mut sb = SearchBox::default();
        let action = sb.handle_key_at(key(KeyCode::Char('x')), Instant::now());
        assert_eq!(action, None);
        assert_eq!(sb.query(), "");
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut sb = open_with_three();
        sb.handle_key_at(
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
            Instant::now(),
        );
        assert_eq!(sb.query(), "");
    }

    // ── Mouse ──────────────────────────────────────────────────────────────

    fn drawn_box() -> (SearchBox, Terminal<TestBackend>) {
        let mut sb = open_with_three();
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal
            .draw(|frame| {
                sb.draw(frame, Rect::new(0, 0, 60, 3)).unwrap();
            })
            .unwrap();
        (sb, terminal)
    }

    #[test]
    fn test_click_outside_closes_without_touching_query() {
        let (mut sb, _terminal) = drawn_box();
        sb.select_next();
        assert_eq!(sb.click_at(30, 18), None);
        assert!(!sb.is_open());
        assert_eq!(sb.selected(), None);
        assert_eq!(sb.query(), "Clean");
    }

    #[test]
    fn test_click_candidate_row() {
        let (mut sb, _terminal) = drawn_box();
        // input rows 0..3, dropdown border at 3, first item at 4
        let action = sb.click_at(10, 5);
        assert_eq!(
            action,
            Some(Action::Navigate(Route::BookDetail(BookId::from(2))))
        );
        assert_eq!(sb.query(), "");
        assert!(!sb.is_open());
    }

    #[test]
    fn test_click_candidate_ignores_bad_index_and_loading() {
        let mut sb = open_with_three();
        assert_eq!(sb.click_candidate(7), None);
        assert!(sb.is_open());

        sb.set_loading(true);
        assert_eq!(sb.click_candidate(0), None);
        assert_eq!(sb.query(), "Clean");

        sb.set_loading(false);
        assert_eq!(
            sb.click_candidate(2),
            Some(Action::Navigate(Route::BookDetail(BookId::from(3))))
        );
    }

    #[test]
    fn test_click_footer_views_all() {
        let (mut sb, _terminal) = drawn_box();
        // three items at rows 4..7, footer at 7
        let action = sb.click_at(10, 7);
        assert_eq!(
            action,
            Some(Action::Navigate(Route::SearchResults {
                query: "Clean".into()
            }))
        );
    }

    #[test]
    fn test_click_inside_input_keeps_dropdown() {
        let (mut sb, _terminal) = drawn_box();
        sb.click_at(5, 1);
        assert!(sb.is_open());
        assert!(sb.contains(5, 1));
    }

    #[test]
    fn test_draw_shows_loading_state() {
        let mut sb = open_with_three();
        sb.set_loading(true);
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal
            .draw(|frame| {
                sb.draw(frame, Rect::new(0, 0, 60, 3)).unwrap();
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        let row: String = (0..60)
            .map(|x| buffer.content[buffer.index_of(x, 4)].symbol().to_string())
            .collect();
        assert!(row.contains("Searching"));
    }
}
