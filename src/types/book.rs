use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::CatalogError;

/// Marker the catalog stores in `thumbnailPath` for books without a cover.
pub const NO_COVER_SENTINEL: &str = "NULL";

/// A book summary or detail as returned by the catalog REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    /// Raw category label(s), possibly comma-joined.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub thumbnail_path: Option<String>,
    #[serde(default)]
    pub book_path: Option<String>,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Book {
    /// Whether the catalog holds a cover image for this book.
    pub fn has_cover(&self) -> bool {
        matches!(self.thumbnail_path.as_deref(), Some(p) if !p.is_empty() && p != NO_COVER_SENTINEL)
    }

    pub fn view_count(&self) -> u64 {
        self.views.unwrap_or(0)
    }

    /// Parses `updatedAt`. The backend emits either a zoned RFC 3339 instant or
    /// a local `YYYY-MM-DDTHH:MM:SS[.fff]` timestamp, which is read as UTC.
    pub fn updated_at_instant(&self) -> Option<DateTime<Utc>> {
        let raw = self.updated_at.as_deref()?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Body of a create or update request. Fields left `None` are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_path: Option<String>,
}

/// A new book submitted together with its PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct BookUpload {
    pub name: String,
    pub author: String,
    /// Category labels; sent comma-joined.
    pub categories: Vec<String>,
    pub file_name: String,
    pub pdf: Vec<u8>,
}

impl BookUpload {
    /// Checks the form before anything goes over the wire: name, author and
    /// at least one category are required, and the file must be a PDF.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() || self.author.trim().is_empty() {
            return Err(CatalogError::InvalidInput(
                "name and author are required".to_string(),
            ));
        }
        if self.categories.iter().all(|c| c.trim().is_empty()) {
            return Err(CatalogError::InvalidInput(
                "at least one category is required".to_string(),
            ));
        }
        if self.pdf.is_empty() {
            return Err(CatalogError::InvalidInput("PDF file is empty".to_string()));
        }
        if !self.file_name.to_lowercase().ends_with(".pdf") || !self.pdf.starts_with(b"%PDF") {
            return Err(CatalogError::InvalidInput(format!(
                "{} is not a PDF file",
                self.file_name
            )));
        }
        Ok(())
    }

    /// The `category` form field: trimmed labels joined with `", "`.
    pub fn category_field(&self) -> String {
        self.categories
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A selectable filter value: URL-friendly slug plus the label the catalog
/// actually stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabeledOption {
    pub value: &'static str,
    pub label: &'static str,
}
