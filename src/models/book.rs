//! Book and copy records

use serde::{Deserialize, Serialize};

/// Catalog entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    /// Number of physical copies registered for this book
    pub copy_count: u32,
}

/// Physical copy of a book
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookCopy {
    pub id: String,
    pub book_id: String,
    pub copy_number: String,
    /// `available` or `borrowed`
    pub status: String,
}

impl BookCopy {
    pub fn is_available(&self) -> bool {
        self.status == "available"
    }
}

/// Copy that can be lent out right now, with its book title
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailableCopy {
    pub id: String,
    pub book_id: String,
    pub book_title: String,
    pub copy_number: String,
}

impl AvailableCopy {
    /// Label used in the copy picker ("Dune - C-002")
    pub fn label(&self) -> String {
        format!("{} - {}", self.book_title, self.copy_number)
    }
}
