//! HTTP transport to the library backend
//!
//! Every RPC is a unary JSON call:
//! `POST {base_url}/library.LibraryService/{Method}` with the request message
//! as body and `Authorization: Bearer <token>` for authenticated calls. A 2xx
//! answer carries the response message; anything else is a failure described
//! by `grpc-status`/`grpc-message` headers or by a `{"code", "message"}` body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::HeaderMap, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::classify::RpcFailure;
use super::messages::*;
use super::status::Code;
use crate::config::BackendConfig;

pub const SERVICE_PATH: &str = "library.LibraryService";

pub type RpcResult<T> = Result<T, RpcFailure>;

/// Backend endpoint misconfiguration
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("backend.base_url must be set (e.g. LIBRARY_BACKEND_URL=http://localhost:8080)")]
    Unset,

    #[error("backend.base_url must not be empty (e.g. LIBRARY_BACKEND_URL=http://localhost:8080)")]
    Empty,

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Validate the configured base URL and drop a trailing slash.
pub fn normalize_base_url(raw: Option<&str>) -> Result<String, EndpointError> {
    let raw = raw.ok_or(EndpointError::Unset)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EndpointError::Empty);
    }
    Ok(trimmed.strip_suffix('/').unwrap_or(trimmed).to_string())
}

/// Calls of the library backend. All but `login` need the session token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryBackend: Send + Sync {
    async fn login(&self, request: LoginRequest) -> RpcResult<LoginResponse>;

    async fn create_book(&self, token: &str, request: CreateBookRequest) -> RpcResult<BookResponse>;
    async fn update_book(&self, token: &str, request: UpdateBookRequest) -> RpcResult<BookResponse>;
    async fn get_book(&self, token: &str, request: GetBookRequest) -> RpcResult<BookResponse>;
    async fn list_books(&self, token: &str, request: ListBooksRequest) -> RpcResult<ListBooksResponse>;

    async fn create_member(&self, token: &str, request: CreateMemberRequest) -> RpcResult<MemberResponse>;
    async fn update_member(&self, token: &str, request: UpdateMemberRequest) -> RpcResult<MemberResponse>;
    async fn get_member(&self, token: &str, request: GetMemberRequest) -> RpcResult<MemberResponse>;
    async fn list_members(&self, token: &str, request: ListMembersRequest) -> RpcResult<ListMembersResponse>;

    async fn borrow_book(&self, token: &str, request: BorrowBookRequest) -> RpcResult<BorrowResponse>;
    async fn return_book(&self, token: &str, request: ReturnBookRequest) -> RpcResult<BorrowResponse>;
    async fn list_borrowings(
        &self,
        token: &str,
        request: ListBorrowingsRequest,
    ) -> RpcResult<ListBorrowingsResponse>;

    async fn create_book_copy(
        &self,
        token: &str,
        request: CreateBookCopyRequest,
    ) -> RpcResult<CreateBookCopyResponse>;
    async fn list_available_copies(
        &self,
        token: &str,
        request: ListAvailableCopiesRequest,
    ) -> RpcResult<ListAvailableCopiesResponse>;
    async fn list_copies_by_book(
        &self,
        token: &str,
        request: ListCopiesByBookRequest,
    ) -> RpcResult<ListCopiesByBookResponse>;
}

/// reqwest-based [`LibraryBackend`]
#[derive(Clone)]
pub struct HttpLibraryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpLibraryClient {
    pub fn new(config: &BackendConfig) -> Result<Self, EndpointError> {
        let base_url = normalize_base_url(config.base_url.as_deref())?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn unary<Req, Resp>(&self, method: &str, token: Option<&str>, request: &Req) -> RpcResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{}/{}", self.base_url, SERVICE_PATH, method);
        let mut builder = self.http.post(&url).json(request);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        tracing::debug!("Calling {}", method);
        let response = builder.send().await.map_err(transport_failure)?;
        let status = response.status();

        if let Some(failure) = failure_from_headers(response.headers()) {
            return Err(failure);
        }

        if status.is_success() {
            return response.json::<Resp>().await.map_err(|e| {
                RpcFailure::generic(format!("Invalid {} response from backend: {}", method, e))
            });
        }

        let body = response.bytes().await.map_err(transport_failure)?;
        Err(failure_from_body(status, &body))
    }
}

fn transport_failure(err: reqwest::Error) -> RpcFailure {
    if err.is_timeout() {
        RpcFailure::status(Code::DeadlineExceeded, err.to_string())
    } else if err.is_connect() || err.is_request() {
        RpcFailure::generic(format!("network error: {}", err))
    } else {
        RpcFailure::generic(err.to_string())
    }
}

/// gRPC-Web style trailers-in-headers. `grpc-status: 0` means success.
fn failure_from_headers(headers: &HeaderMap) -> Option<RpcFailure> {
    let code = headers
        .get("grpc-status")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i32>().ok())?;
    if code == 0 {
        return None;
    }
    let message = headers
        .get("grpc-message")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    Some(RpcFailure::status(Code::from_i32(code), message))
}

/// HTTP statuses that carry a meaning of their own when the body does not
fn code_for_http_status(status: StatusCode) -> Option<Code> {
    match status {
        StatusCode::UNAUTHORIZED => Some(Code::Unauthenticated),
        StatusCode::NOT_FOUND => Some(Code::NotFound),
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => Some(Code::Unavailable),
        StatusCode::GATEWAY_TIMEOUT => Some(Code::DeadlineExceeded),
        _ => None,
    }
}

fn failure_from_body(status: StatusCode, body: &[u8]) -> RpcFailure {
    let payload = serde_json::from_slice::<Value>(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).trim().to_string()));

    match (RpcFailure::from_payload(&payload), code_for_http_status(status)) {
        (failure @ RpcFailure::Status { .. }, _) => failure,
        (RpcFailure::Generic { message }, Some(code)) => RpcFailure::status(code, message),
        (RpcFailure::Unknown, Some(code)) => RpcFailure::status(code, ""),
        (RpcFailure::Generic { message }, None) if message.is_empty() => {
            RpcFailure::status(Code::Other(-1), format!("Backend returned HTTP {}", status.as_u16()))
        }
        (failure, None) => failure,
    }
}

#[async_trait]
impl LibraryBackend for HttpLibraryClient {
    async fn login(&self, request: LoginRequest) -> RpcResult<LoginResponse> {
        self.unary("Login", None, &request).await
    }

    async fn create_book(&self, token: &str, request: CreateBookRequest) -> RpcResult<BookResponse> {
        self.unary("CreateBook", Some(token), &request).await
    }

    async fn update_book(&self, token: &str, request: UpdateBookRequest) -> RpcResult<BookResponse> {
        self.unary("UpdateBook", Some(token), &request).await
    }

    async fn get_book(&self, token: &str, request: GetBookRequest) -> RpcResult<BookResponse> {
        self.unary("GetBook", Some(token), &request).await
    }

    async fn list_books(&self, token: &str, request: ListBooksRequest) -> RpcResult<ListBooksResponse> {
        self.unary("ListBooks", Some(token), &request).await
    }

    async fn create_member(&self, token: &str, request: CreateMemberRequest) -> RpcResult<MemberResponse> {
        self.unary("CreateMember", Some(token), &request).await
    }

    async fn update_member(&self, token: &str, request: UpdateMemberRequest) -> RpcResult<MemberResponse> {
        self.unary("UpdateMember", Some(token), &request).await
    }

    async fn get_member(&self, token: &str, request: GetMemberRequest) -> RpcResult<MemberResponse> {
        self.unary("GetMember", Some(token), &request).await
    }

    async fn list_members(&self, token: &str, request: ListMembersRequest) -> RpcResult<ListMembersResponse> {
        self.unary("ListMembers", Some(token), &request).await
    }

    async fn borrow_book(&self, token: &str, request: BorrowBookRequest) -> RpcResult<BorrowResponse> {
        self.unary("BorrowBook", Some(token), &request).await
    }

    async fn return_book(&self, token: &str, request: ReturnBookRequest) -> RpcResult<BorrowResponse> {
        self.unary("ReturnBook", Some(token), &request).await
    }

    async fn list_borrowings(
        &self,
        token: &str,
        request: ListBorrowingsRequest,
    ) -> RpcResult<ListBorrowingsResponse> {
        self.unary("ListBorrowings", Some(token), &request).await
    }

    async fn create_book_copy(
        &self,
        token: &str,
        request: CreateBookCopyRequest,
    ) -> RpcResult<CreateBookCopyResponse> {
        self.unary("CreateBookCopy", Some(token), &request).await
    }

    async fn list_available_copies(
        &self,
        token: &str,
        request: ListAvailableCopiesRequest,
    ) -> RpcResult<ListAvailableCopiesResponse> {
        self.unary("ListAvailableCopies", Some(token), &request).await
    }

    async fn list_copies_by_book(
        &self,
        token: &str,
        request: ListCopiesByBookRequest,
    ) -> RpcResult<ListCopiesByBookResponse> {
        self.unary("ListCopiesByBook", Some(token), &request).await
    }
}
