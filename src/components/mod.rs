//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod dashboard;
pub mod detail;
pub mod help_dialog;
pub mod layout;
pub mod quit_dialog;
pub mod results;
pub mod search_box;
pub mod text;

pub use dashboard::DashboardComponent;
pub use detail::DetailComponent;
pub use help_dialog::HelpDialog;
pub use layout::{calculate_main_layout, centered_popup};
pub use quit_dialog::QuitDialog;
pub use results::ResultsComponent;
pub use search_box::{SearchBox, SearchBoxConfig, SelectBehavior};
