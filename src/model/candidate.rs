//! Candidate records - normalized search results
//!
//! External catalog records arrive in the backend's loose shape: the
//! identifier may be `id` or `bookId`, numeric or string, and most display
//! fields are optional. `Candidate::try_from` resolves all of that once so
//! rendering code never deals with missing fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier as it appears on the wire (number or string)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(u64),
    Text(String),
}

/// Category as either a bare name or a `{ "name": ... }` object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCategory {
    Name(String),
    Object {
        #[serde(default)]
        name: Option<String>,
    },
}

impl RawCategory {
    fn into_name(self) -> Option<String> {
        match self {
            RawCategory::Name(name) => Some(name),
            RawCategory::Object { name } => name,
        }
    }
}

/// A book record exactly as the backend (or catalog file) delivers it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default)]
    pub book_id: Option<RawId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub category: Option<RawCategory>,
    #[serde(default)]
    pub available_copies: Option<u32>,
    #[serde(default)]
    pub total_copies: Option<u32>,
    #[serde(default)]
    pub published_year: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Errors raised while normalizing a raw record
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record '{title}' has neither `id` nor `bookId`")]
    MissingIdentifier { title: String },
}

/// Non-empty book identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookId(String);

impl BookId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_raw(raw: RawId) -> Option<Self> {
        match raw {
            RawId::Number(n) => Some(BookId(n.to_string())),
            RawId::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(BookId(trimmed.to_string()))
                }
            }
        }
    }
}

impl From<u64> for BookId {
    fn from(n: u64) -> Self {
        BookId(n.to_string())
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Copy availability of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available { available: u32, total: u32 },
    Unavailable { total: u32 },
    Unknown,
}

impl Availability {
    fn from_counts(available: Option<u32>, total: Option<u32>) -> Self {
        match (available, total) {
            (Some(0), total) => Availability::Unavailable {
                total: total.unwrap_or(0),
            },
            (Some(available), total) => Availability::Available {
                available,
                total: total.unwrap_or(available).max(available),
            },
            (None, _) => Availability::Unknown,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Availability::Available { available, total } => {
                format!("{}/{} available", available, total)
            }
            Availability::Unavailable { total } => format!("0/{} available", total),
            Availability::Unknown => "Availability unknown".to_string(),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Availability::Available { .. } => "●",
            Availability::Unavailable { .. } => "○",
            Availability::Unknown => "?",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available { .. })
    }
}

/// A normalized, render-ready search candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
    pub isbn: Option<String>,
    pub availability: Availability,
    pub published_year: Option<i32>,
    pub description: Option<String>,
}

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_AUTHOR: &str = "Unknown author";
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Trim an optional string, treating blank values as missing
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Candidate {
    /// Secondary line shown under the title in result lists
    pub fn subtitle(&self) -> String {
        match self.published_year {
            Some(year) => format!("{} · {} · {}", self.author, self.category, year),
            None => format!("{} · {}", self.author, self.category),
        }
    }

    /// Lowercased haystacks used for matching (title, author, isbn, category)
    pub(crate) fn search_fields(&self) -> [String; 4] {
        [
            self.title.to_lowercase(),
            self.author.to_lowercase(),
            self.isbn.as_deref().unwrap_or_default().to_lowercase(),
            self.category.to_lowercase(),
        ]
    }
}

impl TryFrom<RawRecord> for Candidate {
    type Error = RecordError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let title = non_blank(raw.title);

        let id = raw
            .id
            .and_then(BookId::from_raw)
            .or_else(|| raw.book_id.and_then(BookId::from_raw))
            .ok_or_else(|| RecordError::MissingIdentifier {
                title: title.clone().unwrap_or_else(|| UNTITLED.to_string()),
            })?;

        Ok(Candidate {
            id,
            title: title.unwrap_or_else(|| UNTITLED.to_string()),
            author: non_blank(raw.author).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            category: non_blank(raw.category.and_then(RawCategory::into_name))
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            isbn: non_blank(raw.isbn),
            availability: Availability::from_counts(raw.available_copies, raw.total_copies),
            published_year: raw.published_year,
            description: non_blank(raw.description),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RawRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_full_record_normalizes() {
        let raw = parse(
            r#"{"id": 7, "title": "Clean Code", "author": "Robert C. Martin",
                "category": {"name": "Software"}, "availableCopies": 2,
                "totalCopies": 3, "isbn": "9780132350884", "publishedYear": 2008}"#,
        );
        let c = Candidate::try_from(raw).unwrap();
        assert_eq!(c.id.as_str(), "7");
        assert_eq!(c.title, "Clean Code");
        assert_eq!(c.category, "Software");
        assert_eq!(
            c.availability,
            Availability::Available {
                available: 2,
                total: 3
            }
        );
        assert_eq!(c.subtitle(), "Robert C. Martin · Software · 2008");
    }

    #[test]
    fn test_book_id_fallback() {
        let raw = parse(r#"{"bookId": "b-42", "title": "Dune"}"#);
        let c = Candidate::try_from(raw).unwrap();
        assert_eq!(c.id.as_str(), "b-42");
    }

    #[test]
    fn test_blank_id_falls_back_to_book_id() {
        let raw = parse(r#"{"id": "  ", "bookId": 9}"#);
        let c = Candidate::try_from(raw).unwrap();
        assert_eq!(c.id.as_str(), "9");
    }

    #[test]
    fn test_missing_identifier_is_rejected() {
        let raw = parse(r#"{"title": "Orphan"}"#);
        assert_eq!(
            Candidate::try_from(raw),
            Err(RecordError::MissingIdentifier {
                title: "Orphan".to_string()
            })
        );
    }

    #[test]
    fn test_missing_optional_fields_use_fallbacks() {
        let raw = parse(r#"{"id": 1, "author": "   ", "category": {}}"#);
        let c = Candidate::try_from(raw).unwrap();
        assert_eq!(c.title, UNTITLED);
        assert_eq!(c.author, UNKNOWN_AUTHOR);
        assert_eq!(c.category, UNCATEGORIZED);
        assert_eq!(c.availability, Availability::Unknown);
        assert_eq!(c.isbn, None);
    }

    #[test]
    fn test_bare_string_category() {
        let raw = parse(r#"{"id": 3, "category": "Fiction"}"#);
        let c = Candidate::try_from(raw).unwrap();
        assert_eq!(c.category, "Fiction");
    }

    #[test]
    fn test_zero_copies_is_unavailable() {
        let raw = parse(r#"{"id": 1, "availableCopies": 0, "totalCopies": 4}"#);
        let c = Candidate::try_from(raw).unwrap();
        assert_eq!(c.availability, Availability::Unavailable { total: 4 });
        assert_eq!(c.availability.label(), "0/4 available");
        assert!(!c.availability.is_available());
    }
}
