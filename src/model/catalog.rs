//! In-memory book catalog
//!
//! Stands in for the library backend: loads normalized candidates from a
//! JSON file and answers search queries against them.

use super::candidate::{Availability, BookId, Candidate, RawRecord};
use crate::error::CatalogError;
use chrono::{DateTime, Local};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const SAMPLE_CATALOG: &str = include_str!("../../data/sample_catalog.json");

/// Aggregate numbers shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub titles: usize,
    pub total_copies: u32,
    pub available_copies: u32,
    pub categories: usize,
    /// Books that report no copy counts at all
    pub unknown_availability: usize,
}

impl CatalogStats {
    pub fn on_loan(&self) -> u32 {
        self.total_copies.saturating_sub(self.available_copies)
    }
}

/// The searchable book catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    books: Vec<Candidate>,
    /// Where the catalog came from, for display
    pub source: String,
    pub loaded_at: DateTime<Local>,
}

impl Catalog {
    pub fn new(books: Vec<Candidate>, source: impl Into<String>) -> Self {
        Self {
            books,
            source: source.into(),
            loaded_at: Local::now(),
        }
    }

    /// Load a catalog from a JSON array of raw records
    ///
    /// Records without an identifier are skipped with a warning.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&contents, path.display().to_string()).map_err(
            |source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            },
        )?;
        tracing::info!(
            path = %path.display(),
            books = catalog.len(),
            "catalog loaded"
        );
        if catalog.is_empty() {
            tracing::warn!(path = %path.display(), "catalog has no usable records");
        }
        Ok(catalog)
    }

    /// Bundled sample catalog
    pub fn sample() -> Self {
        match Self::from_json(SAMPLE_CATALOG, "built-in sample") {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!("bundled sample catalog is invalid: {}", e);
                Self::new(Vec::new(), "built-in sample")
            }
        }
    }

    /// Parse a JSON array of records
    ///
    /// Only a malformed document is an error. Each element is decoded on its
    /// own, so a record with unexpected field types is skipped like one
    /// without an identifier.
    fn from_json(json: &str, source: impl Into<String>) -> Result<Self, serde_json::Error> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let mut books = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            let record = match serde_json::from_value::<RawRecord>(value) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(index, "skipping malformed catalog record: {}", e);
                    continue;
                }
            };
            match Candidate::try_from(record) {
                Ok(candidate) => books.push(candidate),
                Err(e) => tracing::warn!(index, "skipping catalog record: {}", e),
            }
        }
        Ok(Self::new(books, source))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn books(&self) -> &[Candidate] {
        &self.books
    }

    pub fn get(&self, id: &BookId) -> Option<&Candidate> {
        self.books.iter().find(|b| &b.id == id)
    }

    /// Case-insensitive search over title, author, ISBN and category
    ///
    /// Title-prefix matches rank first, then other title matches, then
    /// matches on the remaining fields. Catalog order is kept within each
    /// rank. A blank query lists the catalog from the top.
    pub fn search(&self, query: &str, limit: Option<usize>) -> Vec<Candidate> {
        let limit = limit.unwrap_or(usize::MAX);
        let needle = query.trim().to_lowercase();

        if needle.is_empty() {
            return self.books.iter().take(limit).cloned().collect();
        }

        let mut ranked: Vec<(u8, &Candidate)> = self
            .books
            .iter()
            .filter_map(|book| {
                let [title, author, isbn, category] = book.search_fields();
                let rank = if title.starts_with(&needle) {
                    0
                } else if title.contains(&needle) {
                    1
                } else if author.contains(&needle)
                    || isbn.contains(&needle)
                    || category.contains(&needle)
                {
                    2
                } else {
                    return None;
                };
                Some((rank, book))
            })
            .collect();

        // stable sort keeps catalog order within a rank
        ranked.sort_by_key(|(rank, _)| *rank);
        ranked
            .into_iter()
            .take(limit)
            .map(|(_, book)| book.clone())
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            titles: self.books.len(),
            ..CatalogStats::default()
        };
        let mut categories = HashSet::new();

        for book in &self.books {
            categories.insert(book.category.as_str());
            match book.availability {
                Availability::Available { available, total } => {
                    stats.available_copies = stats.available_copies.saturating_add(available);
                    stats.total_copies = stats.total_copies.saturating_add(total);
                }
                Availability::Unavailable { total } => {
                    stats.total_copies = stats.total_copies.saturating_add(total);
                }
                Availability::Unknown => stats.unknown_availability += 1,
            }
        }

        stats.categories = categories.len();
        stats
    }
}
