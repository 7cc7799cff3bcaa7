//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components. It is the
//! search box's caller: debounced queries go to the search worker and the
//! worker's answers are pushed back into the box.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    calculate_main_layout, DashboardComponent, DetailComponent, HelpDialog, QuitDialog,
    ResultsComponent, SearchBox, SearchBoxConfig, SelectBehavior,
};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::{Catalog, Route};
use crate::services::SearchWorker;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::sync::Arc;
use std::time::Instant;

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    pub config: Config,

    /// Catalog shared with the search worker
    catalog: Arc<Catalog>,

    /// Background lookups for the search box
    worker: SearchWorker,

    /// Current page
    pub route: Route,

    /// Routes to return to on Back
    history: Vec<Route>,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub search: SearchBox,
    pub dashboard: DashboardComponent,
    pub results: ResultsComponent,
    pub detail: DetailComponent,
    pub help_dialog: HelpDialog,
    pub quit_dialog: QuitDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create the app over a loaded catalog
    pub fn new(config: Config, catalog: Catalog) -> App {
        let catalog = Arc::new(catalog);
        let worker = SearchWorker::spawn(
            Arc::clone(&catalog),
            config.search.result_limit,
            config.search.latency(),
        );

        let search = SearchBox::new(SearchBoxConfig {
            select: SelectBehavior::Emit,
            ..SearchBoxConfig::from(&config.search)
        });

        let mut dashboard = DashboardComponent::new();
        dashboard.set_catalog(&catalog);

        let mut app = App {
            config,
            catalog,
            worker,
            route: Route::default(),
            history: Vec::new(),
            modals: ModalStack::new(),
            should_quit: false,
            status_message: None,
            search,
            dashboard,
            results: ResultsComponent::new(),
            detail: DetailComponent::new(),
            help_dialog: HelpDialog::default(),
            quit_dialog: QuitDialog::default(),
        };

        if app.config.focus_on_start {
            if let Some(Action::Search(query)) = app.search.focus() {
                app.submit_search(&query);
            }
        }

        app
    }

    /// Key handling with an explicit clock, so debounce timing is testable
    pub fn handle_key_at(&mut self, key: KeyEvent, now: Instant) -> Result<Option<Action>> {
        if let Some(modal) = self.modals.top().cloned() {
            return self.handle_modal_key_event(&modal, key);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::ForceQuit));
        }

        if self.search.is_focused() {
            return Ok(self.search.handle_key_at(key, now));
        }

        let action = match key.code {
            KeyCode::Char('/') => Some(Action::FocusSearch),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            _ => return self.handle_page_key_event(key),
        };
        Ok(action)
    }

    /// Advance the debounce timer and collect any finished lookup
    pub fn tick_at(&mut self, now: Instant) -> Option<Action> {
        let action = self.search.tick(now);
        self.poll_worker();
        action
    }

    /// Push the latest worker answer, if any, into the search box
    pub fn poll_worker(&mut self) {
        if let Some(response) = self.worker.poll() {
            tracing::debug!(
                seq = response.seq,
                query = %response.query,
                count = response.results.len(),
                "search resolved"
            );
            self.search.set_loading(false);
            self.search.set_results(response.results);
        }
    }

    fn submit_search(&mut self, query: &str) {
        self.search.set_loading(true);
        self.worker.submit(query);
    }

    fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        let previous = std::mem::replace(&mut self.route, route);
        self.history.push(previous);
        self.enter_route();
    }

    fn back(&mut self) {
        match self.history.pop() {
            Some(previous) => {
                self.route = previous;
                self.enter_route();
            }
            None => tracing::debug!("back with empty history"),
        }
    }

    /// Refresh the page component for the current route
    fn enter_route(&mut self) {
        tracing::info!(path = %self.route.path(), "navigate");
        self.search.blur();
        match &self.route {
            Route::Dashboard => {}
            Route::SearchResults { query } => {
                let rows = self.catalog.search(query, None);
                self.results.set_results(query, rows);
            }
            Route::BookDetail(id) => {
                self.detail.set_book(id, self.catalog.get(id));
            }
        }
    }

    fn handle_page_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.route {
            Route::Dashboard => self.dashboard.handle_key_event(key),
            Route::SearchResults { .. } => self.results.handle_key_event(key),
            Route::BookDetail(_) => self.detail.handle_key_event(key),
        }
    }

    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    /// Draw the page for `route` without any overlay
    fn draw_screen(&mut self, frame: &mut Frame, area: Rect, route: &Route) -> Result<()> {
        match route {
            Route::SearchResults { .. } => self.results.draw(frame, area),
            Route::Dashboard | Route::BookDetail(_) => self.dashboard.draw(frame, area),
        }
    }

    fn draw_page(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        match self.route.clone() {
            Route::BookDetail(_) => {
                // the drawer slides over the page it was opened from
                let beneath = self
                    .history
                    .iter()
                    .rev()
                    .find(|r| !matches!(r, Route::BookDetail(_)))
                    .cloned()
                    .unwrap_or_default();
                self.draw_screen(frame, area, &beneath)?;
                self.detail.draw(frame, area)
            }
            route => self.draw_screen(frame, area, &route),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area),
            Modal::Help => self.help_dialog.draw(frame, area),
        }
    }

    fn help_line(&self) -> Line<'static> {
        let hints: &[(&str, &str)] = if self.search.is_focused() {
            &[
                ("↑↓", "select"),
                ("Enter", "open"),
                ("Ctrl+u", "clear"),
                ("Esc", "close"),
            ]
        } else {
            match self.route {
                Route::Dashboard => &[("/", "search"), ("?", "help"), ("q", "quit")],
                Route::SearchResults { .. } => &[
                    ("j/k", "move"),
                    ("Enter", "open"),
                    ("Esc", "back"),
                    ("/", "search"),
                    ("q", "quit"),
                ],
                Route::BookDetail(_) => &[
                    ("j/k", "scroll"),
                    ("Esc", "back"),
                    ("/", "search"),
                    ("q", "quit"),
                ],
            }
        };

        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.route.title()),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{} ", self.route.path()),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        for (key, label) in hints {
            spans.push(Span::styled(
                format!(" {} ", key),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                label.to_string(),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    }
}

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        self.handle_key_at(key, Instant::now())
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if !self.modals.is_empty() {
            return Ok(None);
        }
        let on_search = self.search.contains(mouse.column, mouse.row);
        let action = self.search.handle_mouse_event(mouse)?;
        if action.is_some() || on_search {
            return Ok(action);
        }
        match self.route {
            Route::SearchResults { .. } => self.results.handle_mouse_event(mouse),
            Route::Dashboard | Route::BookDetail(_) => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => return Ok(self.tick_at(Instant::now())),
            Action::Resize(_, _) => {}
            Action::ForceQuit => {
                // drop any debounce still waiting to fire
                self.search.reset();
                self.should_quit = true;
            }

            // ─────────────────────────────────────────────────────────────────
            // Search
            // ─────────────────────────────────────────────────────────────────
            Action::FocusSearch => return Ok(self.search.focus()),
            Action::BlurSearch => self.search.blur(),
            Action::Search(query) => self.submit_search(&query),
            Action::CandidateChosen(candidate) => {
                tracing::info!(id = %candidate.id, title = %candidate.title, "candidate chosen");
                self.status_message = Some(format!("Selected {}", candidate.title));
                return Ok(Some(Action::Navigate(Route::BookDetail(candidate.id))));
            }

            // ─────────────────────────────────────────────────────────────────
            // Navigation
            // ─────────────────────────────────────────────────────────────────
            Action::Navigate(route) => self.navigate(route),
            Action::Back => {
                self.status_message = None;
                self.back();
            }
            Action::NextItem | Action::PrevItem | Action::OpenItem => {
                if matches!(self.route, Route::SearchResults { .. }) {
                    return self.results.update(action);
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.quit_dialog.open(&self.route, self.search.query());
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = calculate_main_layout(area, self.status_message.is_some());

        self.draw_page(frame, layout.content)?;

        if let (Some(status_area), Some(message)) = (layout.status, &self.status_message) {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {}", message),
                    Style::default().fg(Color::Green),
                )),
                status_area,
            );
        }
        frame.render_widget(Paragraph::new(self.help_line()), layout.help);

        // last, so the dropdown overlays the page
        self.search.draw(frame, layout.search)?;

        let modals: Vec<Modal> = self.modals.iter().cloned().collect();
        for modal in &modals {
            self.draw_modal(frame, area, modal)?;
        }
        Ok(())
    }
}
