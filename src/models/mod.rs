//! Library records as exchanged with the backend

pub mod book;
pub mod borrow;
pub mod member;

pub use book::{AvailableCopy, Book, BookCopy};
pub use borrow::Borrow;
pub use member::Member;
