//! Borrow (loan) record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::book::{Book, BookCopy};
use super::member::Member;

/// A copy lent to a member. `returned_at` is empty while the copy is out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Borrow {
    pub id: String,
    pub copy_id: String,
    pub member_id: String,
    /// RFC 3339 timestamp
    pub borrowed_at: String,
    pub returned_at: String,
    pub status: String,
    pub copy: Option<BookCopy>,
    pub book: Option<Book>,
    pub member: Option<Member>,
}

impl Borrow {
    pub fn is_returned(&self) -> bool {
        !self.returned_at.is_empty()
    }

    pub fn book_title(&self) -> &str {
        self.book.as_ref().map(|b| b.title.as_str()).unwrap_or("")
    }

    pub fn copy_number(&self) -> &str {
        self.copy.as_ref().map(|c| c.copy_number.as_str()).unwrap_or("")
    }

    pub fn member_name(&self) -> &str {
        self.member.as_ref().map(|m| m.name.as_str()).unwrap_or("")
    }

    /// Borrow date for display, or the raw value if it is not RFC 3339
    pub fn borrowed_on(&self) -> String {
        format_timestamp(&self.borrowed_at)
    }

    pub fn returned_on(&self) -> Option<String> {
        self.is_returned().then(|| format_timestamp(&self.returned_at))
    }
}

fn format_timestamp(value: &str) -> String {
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| value.to_string())
}
