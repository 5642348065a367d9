//! Loan workflows: borrowing, returning, current borrowings

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    forms::{BorrowForm, ReturnForm},
    models::{AvailableCopy, Borrow},
    pagination::{compute_request, ListRequest},
    rpc::{
        messages::{
            total_count, BorrowBookRequest, ListAvailableCopiesRequest, ListBorrowingsRequest,
            ReturnBookRequest,
        },
        LibraryBackend,
    },
    validation::trim,
};

use super::Page;

#[derive(Clone)]
pub struct LoansService {
    backend: Arc<dyn LibraryBackend>,
}

impl LoansService {
    pub fn new(backend: Arc<dyn LibraryBackend>) -> Self {
        Self { backend }
    }

    /// List borrowings, optionally restricted to one member
    pub async fn list_borrowings(
        &self,
        token: &str,
        request: &ListRequest,
        member_id: Option<&str>,
    ) -> AppResult<Page<Borrow>> {
        let request = compute_request(request.page, request.limit, request.query.as_deref());
        let response = self
            .backend
            .list_borrowings(
                token,
                ListBorrowingsRequest {
                    pagination: (&request).into(),
                    member_id: member_id.map(str::to_string),
                    query: request.query,
                },
            )
            .await?;

        Ok(Page {
            total_count: total_count(response.pagination.as_ref()),
            items: response.borrows,
        })
    }

    /// Copies that can be lent right now
    pub async fn list_available_copies(
        &self,
        token: &str,
        request: &ListRequest,
    ) -> AppResult<Page<AvailableCopy>> {
        let response = self
            .backend
            .list_available_copies(
                token,
                ListAvailableCopiesRequest {
                    pagination: request.into(),
                },
            )
            .await?;

        Ok(Page {
            total_count: total_count(response.pagination.as_ref()),
            items: response.copies,
        })
    }

    pub async fn borrow_book(&self, token: &str, form: &BorrowForm) -> AppResult<Borrow> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let request = BorrowBookRequest {
            copy_id: trim(form.copy_id.as_deref()),
            member_id: trim(form.member_id.as_deref()),
        };
        let response = self.backend.borrow_book(token, request).await?;
        response.borrow.ok_or(AppError::EmptyResponse("BorrowBook"))
    }

    pub async fn return_book(&self, token: &str, form: &ReturnForm) -> AppResult<Borrow> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let request = ReturnBookRequest {
            copy_id: trim(form.copy_id.as_deref()),
        };
        let response = self.backend.return_book(token, request).await?;
        response.borrow.ok_or(AppError::EmptyResponse("ReturnBook"))
    }
}
