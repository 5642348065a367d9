//! Server-rendered console pages

pub mod auth;
pub mod books;
pub mod health;
pub mod loans;
pub mod members;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tera::Context;

use crate::{
    error::{AppError, AppResult, LOGIN_PATH, SESSION_COOKIE},
    validation::ValidationErrors,
    AppState,
};

/// Extractor for the backend session token stored in the session cookie.
/// Requests without one are sent to the login page.
pub struct Session(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        jar.get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
            .map(Session)
            .ok_or_else(|| Redirect::to(LOGIN_PATH))
    }
}

/// Failure shown on the page that caused it: field errors next to their
/// inputs, anything else as one message above the form.
#[derive(Debug, Default)]
pub struct InlineErrors {
    pub fields: ValidationErrors,
    pub message: Option<String>,
}

impl From<AppError> for InlineErrors {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(fields) => Self {
                fields,
                message: None,
            },
            err => {
                tracing::warn!("Request failed: {}", err);
                Self {
                    fields: ValidationErrors::new(),
                    message: Some(err.user_message()),
                }
            }
        }
    }
}

impl InlineErrors {
    /// Keep an error on the page unless the session is gone or the failure
    /// is ours, in which case it propagates to [`AppError::into_response`].
    pub fn capture(err: AppError) -> AppResult<Self> {
        match err {
            err if err.requires_reauth() => Err(err),
            err @ (AppError::Template(_) | AppError::Internal(_)) => Err(err),
            err => Ok(err.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        if self.fields.is_empty() {
            StatusCode::OK
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }

    pub fn insert_into(&self, context: &mut Context) {
        context.insert("errors", &self.fields);
        context.insert("error", &self.message);
    }
}

/// Context shared by every page behind the login
pub fn page_context(nav: &str) -> Context {
    let mut context = Context::new();
    context.insert("nav", nav);
    context.insert("authenticated", &true);
    context.insert("errors", &ValidationErrors::new());
    context.insert("error", &None::<String>);
    context
}

pub fn render(state: &AppState, template: &str, context: &Context) -> AppResult<Html<String>> {
    Ok(Html(state.templates.render(template, context)?))
}

/// Render with an explicit status, for forms re-displayed after a failure
pub fn render_with_status(
    state: &AppState,
    status: StatusCode,
    template: &str,
    context: &Context,
) -> AppResult<Response> {
    Ok((status, render(state, template, context)?).into_response())
}

/// Message for a list with no rows
pub fn empty_message(noun: &str, query: Option<&str>) -> String {
    match query {
        Some(_) => format!("No {} match your search.", noun),
        None => format!("No {} yet.", noun),
    }
}
