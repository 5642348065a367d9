//! Request and response messages of the `library.LibraryService` backend

use serde::{Deserialize, Serialize};

use crate::models::{AvailableCopy, Book, BookCopy, Borrow, Member};
use crate::pagination::ListRequest;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationRequest {
    pub page: u32,
    pub limit: u32,
}

impl From<&ListRequest> for PaginationRequest {
    fn from(request: &ListRequest) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationResponse {
    pub page: u32,
    pub limit: u32,
    pub total_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub isbn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateBookRequest {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub isbn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetBookRequest {
    pub id: String,
}

/// Response of `CreateBook`, `UpdateBook` and `GetBook`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookResponse {
    pub book: Option<Book>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListBooksRequest {
    pub pagination: PaginationRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListBooksResponse {
    pub books: Vec<Book>,
    pub pagination: Option<PaginationResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateMemberRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateMemberRequest {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetMemberRequest {
    pub id: String,
}

/// Response of `CreateMember`, `UpdateMember` and `GetMember`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemberResponse {
    pub member: Option<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListMembersRequest {
    pub pagination: PaginationRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListMembersResponse {
    pub members: Vec<Member>,
    pub pagination: Option<PaginationResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorrowBookRequest {
    pub copy_id: String,
    pub member_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnBookRequest {
    pub copy_id: String,
}

/// Response of `BorrowBook` and `ReturnBook`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BorrowResponse {
    pub borrow: Option<Borrow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListBorrowingsRequest {
    pub pagination: PaginationRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListBorrowingsResponse {
    pub borrows: Vec<Borrow>,
    pub pagination: Option<PaginationResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateBookCopyRequest {
    pub book_id: String,
    pub copy_number: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateBookCopyResponse {
    pub copy: Option<BookCopy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListAvailableCopiesRequest {
    pub pagination: PaginationRequest,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListAvailableCopiesResponse {
    pub copies: Vec<AvailableCopy>,
    pub pagination: Option<PaginationResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListCopiesByBookRequest {
    pub book_id: String,
    pub pagination: PaginationRequest,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListCopiesByBookResponse {
    pub copies: Vec<BookCopy>,
    pub pagination: Option<PaginationResponse>,
}

/// Total row count of a list response, 0 when the backend omitted it
pub fn total_count(pagination: Option<&PaginationResponse>) -> u64 {
    pagination.map(|p| p.total_count).unwrap_or(0)
}
