//! Navigation routes

use super::candidate::BookId;
use std::fmt;

/// A screen the application can show, addressable as a path
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Dashboard,
    /// Detail drawer for a single book
    BookDetail(BookId),
    /// "View all results" listing for a query
    SearchResults { query: String },
}

impl Route {
    /// Path form of the route, e.g. `/books?search=clean%20code`
    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/".to_string(),
            Route::BookDetail(id) => format!("/books/{}", urlencoding::encode(id.as_str())),
            Route::SearchResults { query } => {
                format!("/books?search={}", urlencoding::encode(query))
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::BookDetail(_) => "Book",
            Route::SearchResults { .. } => "Search Results",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
