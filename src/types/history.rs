use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::book::Book;

/// Identifier of a catalog book as it appears in the history slot.
///
/// The catalog hands out numeric ids, but the slot is shared text storage and
/// may hold string ids written by other clients. Comparison is strict: the
/// number `1` and the text `"1"` are different books.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookId {
    Number(i64),
    Text(String),
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookId::Number(n) => write!(f, "{}", n),
            BookId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for BookId {
    fn from(id: i64) -> Self {
        BookId::Number(id)
    }
}

impl From<i32> for BookId {
    fn from(id: i32) -> Self {
        BookId::Number(i64::from(id))
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        BookId::Text(id.to_string())
    }
}

impl From<String> for BookId {
    fn from(id: String) -> Self {
        BookId::Text(id)
    }
}

/// One record of a previously viewed book, most recent view wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: BookId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub views: u64,
    /// RFC 3339 instant of the latest view, e.g. `2024-05-01T10:20:30.123Z`.
    #[serde(default)]
    pub timestamp: String,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

/// Input to `HistoryManager::add`: the fields of a book at the moment it is
/// viewed. Only `id` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedBook {
    pub id: BookId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub thumbnail_path: Option<String>,
    #[serde(default)]
    pub views: Option<u64>,
}

impl ViewedBook {
    /// Creates an input carrying only an id.
    pub fn new(id: impl Into<BookId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            author: None,
            category: None,
            thumbnail_path: None,
            views: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn thumbnail_path(mut self, path: impl Into<String>) -> Self {
        self.thumbnail_path = Some(path.into());
        self
    }

    pub fn views(mut self, views: u64) -> Self {
        self.views = Some(views);
        self
    }
}

impl From<&Book> for ViewedBook {
    fn from(book: &Book) -> Self {
        Self {
            id: BookId::Number(book.id),
            name: book.name.clone(),
            author: book.author.clone(),
            category: book.category.clone(),
            thumbnail_path: book.thumbnail_path.clone(),
            views: book.views,
        }
    }
}
