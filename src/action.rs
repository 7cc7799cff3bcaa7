//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::{Candidate, Route};
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for timers and animations
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────
    /// Give keyboard focus to the search box
    FocusSearch,
    /// Release keyboard focus from the search box
    BlurSearch,
    /// Debounced query ready to be looked up
    Search(String),
    /// A candidate was picked and the caller handles it
    CandidateChosen(Candidate),

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Switch to a route, remembering the current one
    Navigate(Route),
    /// Return to the previous route
    Back,
    /// Move to next row
    NextItem,
    /// Move to previous row
    PrevItem,
    /// Open the highlighted row
    OpenItem,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Close the current modal
    CloseModal,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::FocusSearch => write!(f, "FocusSearch"),
            Action::BlurSearch => write!(f, "BlurSearch"),
            Action::Search(q) => write!(f, "Search({:?})", q),
            Action::CandidateChosen(c) => write!(f, "CandidateChosen({})", c.id),
            Action::Navigate(route) => write!(f, "Navigate({})", route),
            Action::Back => write!(f, "Back"),
            Action::NextItem => write!(f, "NextItem"),
            Action::PrevItem => write!(f, "PrevItem"),
            Action::OpenItem => write!(f, "OpenItem"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
        }
    }
}
