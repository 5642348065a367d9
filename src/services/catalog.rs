//! Catalog service: books and their copies

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    forms::{BookForm, CopyForm},
    models::{Book, BookCopy},
    pagination::{compute_request, ListRequest},
    rpc::{
        messages::{
            total_count, CreateBookCopyRequest, CreateBookRequest, GetBookRequest,
            ListBooksRequest, ListCopiesByBookRequest, UpdateBookRequest,
        },
        Code, LibraryBackend, RpcFailure,
    },
    validation::trim,
};

use super::Page;

#[derive(Clone)]
pub struct CatalogService {
    backend: Arc<dyn LibraryBackend>,
}

impl CatalogService {
    pub fn new(backend: Arc<dyn LibraryBackend>) -> Self {
        Self { backend }
    }

    /// List books, optionally filtered by a search query
    pub async fn list_books(&self, token: &str, request: &ListRequest) -> AppResult<Page<Book>> {
        let request = compute_request(request.page, request.limit, request.query.as_deref());
        let response = self
            .backend
            .list_books(
                token,
                ListBooksRequest {
                    pagination: (&request).into(),
                    query: request.query,
                },
            )
            .await?;

        Ok(Page {
            total_count: total_count(response.pagination.as_ref()),
            items: response.books,
        })
    }

    pub async fn get_book(&self, token: &str, id: &str) -> AppResult<Book> {
        let response = self
            .backend
            .get_book(token, GetBookRequest { id: id.to_string() })
            .await?;
        response
            .book
            .ok_or_else(|| RpcFailure::status(Code::NotFound, "Book not found").into())
    }

    pub async fn create_book(&self, token: &str, form: &BookForm) -> AppResult<Book> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let request = CreateBookRequest {
            title: trim(form.title.as_deref()),
            author: trim(form.author.as_deref()),
            isbn: form.isbn(),
        };
        let response = self.backend.create_book(token, request).await?;
        response.book.ok_or(AppError::EmptyResponse("CreateBook"))
    }

    pub async fn update_book(&self, token: &str, id: &str, form: &BookForm) -> AppResult<Book> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let request = UpdateBookRequest {
            id: id.to_string(),
            title: trim(form.title.as_deref()),
            author: trim(form.author.as_deref()),
            isbn: form.isbn(),
        };
        let response = self.backend.update_book(token, request).await?;
        response.book.ok_or(AppError::EmptyResponse("UpdateBook"))
    }

    /// Register a new physical copy of a book
    pub async fn create_copy(&self, token: &str, form: &CopyForm) -> AppResult<BookCopy> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let request = CreateBookCopyRequest {
            book_id: trim(form.book_id.as_deref()),
            copy_number: trim(form.copy_number.as_deref()),
        };
        let response = self.backend.create_book_copy(token, request).await?;
        response.copy.ok_or(AppError::EmptyResponse("CreateBookCopy"))
    }

    pub async fn list_copies(
        &self,
        token: &str,
        book_id: &str,
        request: &ListRequest,
    ) -> AppResult<Page<BookCopy>> {
        let response = self
            .backend
            .list_copies_by_book(
                token,
                ListCopiesByBookRequest {
                    book_id: book_id.to_string(),
                    pagination: request.into(),
                },
            )
            .await?;

        Ok(Page {
            total_count: total_count(response.pagination.as_ref()),
            items: response.copies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::client::MockLibraryBackend;
    use crate::rpc::messages::{
        BookResponse, CreateBookCopyResponse, ListBooksResponse, ListCopiesByBookResponse,
        PaginationRequest, PaginationResponse,
    };

    fn book(id: &str, title: &str) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            author: "Ursula K. Le Guin".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_books_defaults_and_total() {
        let mut backend = MockLibraryBackend::new();
        backend
            .expect_list_books()
            .withf(|token: &str, request: &ListBooksRequest| {
                token == "tok"
                    && request.pagination == PaginationRequest { page: 1, limit: 20 }
                    && request.query.is_none()
            })
            .times(1)
            .returning(|_, _| {
                Ok(ListBooksResponse {
                    books: vec![book("b1", "The Dispossessed")],
                    pagination: Some(PaginationResponse {
                        page: 1,
                        limit: 20,
                        total_count: 45,
                    }),
                })
            });

        let service = CatalogService::new(Arc::new(backend));
        let page = service.list_books("tok", &ListRequest::default()).await.unwrap();
        assert_eq!(page.total_count, 45);
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_list_books_trims_query() {
        let mut backend = MockLibraryBackend::new();
        backend
            .expect_list_books()
            .withf(|_: &str, request: &ListBooksRequest| request.query.as_deref() == Some("earthsea"))
            .times(1)
            .returning(|_, _| Ok(ListBooksResponse::default()));

        let service = CatalogService::new(Arc::new(backend));
        let request = ListRequest {
            page: 1,
            limit: 5,
            query: Some("  earthsea\t".to_string()),
        };
        let page = service.list_books("tok", &request).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn test_list_books_blank_query_omitted() {
        let mut backend = MockLibraryBackend::new();
        backend
            .expect_list_books()
            .withf(|_: &str, request: &ListBooksRequest| request.query.is_none())
            .times(1)
            .returning(|_, _| Ok(ListBooksResponse::default()));

        let service = CatalogService::new(Arc::new(backend));
        let request = ListRequest {
            page: 2,
            limit: 5,
            query: Some(" \u{2009} ".to_string()),
        };
        service.list_books("tok", &request).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_book_validates_before_calling_backend() {
        let mut backend = MockLibraryBackend::new();
        backend.expect_create_book().never();

        let service = CatalogService::new(Arc::new(backend));
        let form = BookForm {
            title: Some("   ".to_string()),
            author: Some("Le Guin".to_string()),
            isbn: None,
        };
        let err = service.create_book("tok", &form).await.unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors["title"].contains("required"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_book_sends_trimmed_values() {
        let mut backend = MockLibraryBackend::new();
        backend
            .expect_create_book()
            .withf(|_: &str, request: &CreateBookRequest| {
                request.title == "The Lathe of Heaven"
                    && request.author == "Le Guin"
                    && request.isbn.is_empty()
            })
            .times(1)
            .returning(|_, request| {
                Ok(BookResponse {
                    book: Some(book("b2", &request.title)),
                })
            });

        let service = CatalogService::new(Arc::new(backend));
        let form = BookForm {
            title: Some(" The Lathe of Heaven ".to_string()),
            author: Some("Le Guin\n".to_string()),
            isbn: Some("  ".to_string()),
        };
        let created = service.create_book("tok", &form).await.unwrap();
        assert_eq!(created.id, "b2");
    }

    #[tokio::test]
    async fn test_get_book_not_found() {
        let mut backend = MockLibraryBackend::new();
        backend
            .expect_get_book()
            .returning(|_, _| Err(RpcFailure::status(Code::NotFound, "")));

        let service = CatalogService::new(Arc::new(backend));
        let err = service.get_book("tok", "missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "Resource not found");
    }

    #[tokio::test]
    async fn test_get_book_empty_response_is_not_found() {
        let mut backend = MockLibraryBackend::new();
        backend
            .expect_get_book()
            .returning(|_, _| Ok(BookResponse::default()));

        let service = CatalogService::new(Arc::new(backend));
        let err = service.get_book("tok", "b1").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "Book not found");
    }

    #[tokio::test]
    async fn test_create_copy() {
        let mut backend = MockLibraryBackend::new();
        backend
            .expect_create_book_copy()
            .withf(|_: &str, request: &CreateBookCopyRequest| {
                request.book_id == "b1" && request.copy_number == "C-003"
            })
            .times(1)
            .returning(|_, request| {
                Ok(CreateBookCopyResponse {
                    copy: Some(BookCopy {
                        id: "c3".to_string(),
                        book_id: request.book_id,
                        copy_number: request.copy_number,
                        status: "available".to_string(),
                    }),
                })
            });

        let service = CatalogService::new(Arc::new(backend));
        let form = CopyForm {
            book_id: Some("b1".to_string()),
            copy_number: Some(" C-003 ".to_string()),
        };
        let copy = service.create_copy("tok", &form).await.unwrap();
        assert!(copy.is_available());
    }

    #[tokio::test]
    async fn test_list_copies() {
        let mut backend = MockLibraryBackend::new();
        backend
            .expect_list_copies_by_book()
            .withf(|_: &str, request: &ListCopiesByBookRequest| {
                request.book_id == "b1" && request.pagination == PaginationRequest { page: 2, limit: 5 }
            })
            .returning(|_, _| {
                Ok(ListCopiesByBookResponse {
                    copies: vec![BookCopy::default()],
                    pagination: Some(PaginationResponse {
                        page: 2,
                        limit: 5,
                        total_count: 6,
                    }),
                })
            });

        let service = CatalogService::new(Arc::new(backend));
        let request = ListRequest {
            page: 2,
            limit: 5,
            query: None,
        };
        let page = service.list_copies("tok", "b1", &request).await.unwrap();
        assert_eq!(page.total_count, 6);
    }
}
