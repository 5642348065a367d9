//! Error types for the librarian console

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use thiserror::Error;

use crate::rpc::{classify, is_not_found, requires_reauth, RpcFailure};
use crate::validation::ValidationErrors;

/// Cookie holding the backend session token
pub const SESSION_COOKIE: &str = "token";

/// Where unauthenticated users are sent
pub const LOGIN_PATH: &str = "/login";

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {}", .0.values().cloned().collect::<Vec<_>>().join(", "))]
    Validation(ValidationErrors),

    #[error("Backend error: {0}")]
    Backend(#[from] RpcFailure),

    /// The backend accepted the login but returned no token
    #[error("Login failed")]
    LoginFailed,

    #[error("Backend returned an empty {0} response")]
    EmptyResponse(&'static str),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the session must be dropped and the user sent to login
    pub fn requires_reauth(&self) -> bool {
        matches!(self, AppError::Backend(failure) if requires_reauth(failure))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Backend(failure) if is_not_found(failure))
    }

    /// Message shown to the librarian. Never empty.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(errors) => errors
                .values()
                .next()
                .cloned()
                .unwrap_or_else(|| "Invalid form".to_string()),
            AppError::Backend(failure) => classify(failure),
            AppError::LoginFailed => "Login failed".to_string(),
            AppError::EmptyResponse(_) => "The library service returned an empty response".to_string(),
            AppError::Template(_) | AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

/// Expired session cookie. `CookieJar::remove` emits nothing for a cookie
/// the jar does not hold, so this one is always added.
fn session_removal() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").removal().build()
}

/// Drop the session cookie and go to the login page
pub fn logout_redirect(jar: CookieJar) -> Response {
    (jar.add(session_removal()), Redirect::to(LOGIN_PATH)).into_response()
}

/// Standalone error page for failures that escape a handler. Handlers that
/// can re-render their own page do so instead.
fn error_page(status: StatusCode, message: &str) -> Response {
    let body = format!(
        "<!DOCTYPE html><html><head><title>Error</title></head><body>\
         <p role=\"alert\">{}</p><p><a href=\"/books\">Back</a></p></body></html>",
        tera::escape_html(message)
    );
    (status, Html(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.requires_reauth() {
            tracing::info!("Backend rejected the session, redirecting to login");
            return logout_redirect(CookieJar::new());
        }

        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Backend(_) if self.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Backend(failure) => {
                tracing::warn!("Backend error: {}", failure);
                StatusCode::BAD_GATEWAY
            }
            AppError::LoginFailed => StatusCode::UNAUTHORIZED,
            AppError::EmptyResponse(method) => {
                tracing::error!("Empty {} response from backend", method);
                StatusCode::BAD_GATEWAY
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        error_page(status, &self.user_message())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
