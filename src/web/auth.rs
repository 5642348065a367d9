//! Login and logout

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tera::Context;

use crate::{
    error::{logout_redirect, AppError, AppResult, LOGIN_PATH, SESSION_COOKIE},
    forms::LoginForm,
    validation::ValidationErrors,
    AppState,
};

use super::{render, render_with_status, InlineErrors};

/// Landing page: the catalog when logged in, the login form otherwise
pub async fn index(jar: CookieJar) -> Redirect {
    match jar.get(SESSION_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => Redirect::to("/books"),
        _ => Redirect::to(LOGIN_PATH),
    }
}

fn login_context(form: &LoginForm) -> Context {
    let mut context = Context::new();
    context.insert("authenticated", &false);
    context.insert("username", form.username.as_deref().unwrap_or(""));
    context.insert("errors", &ValidationErrors::new());
    context.insert("error", &None::<String>);
    context
}

pub async fn login_page(State(state): State<AppState>) -> AppResult<Response> {
    let context = login_context(&LoginForm::default());
    Ok(render(&state, "login.html", &context)?.into_response())
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    match state.services.auth.login(&form).await {
        Ok(token) => {
            tracing::info!("Librarian logged in");
            let cookie = Cookie::build((SESSION_COOKIE, token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(state.config.session.secure_cookie);
            Ok((jar.add(cookie), Redirect::to("/books")).into_response())
        }
        // Bad credentials come back as Unauthenticated: show them, no redirect
        Err(err @ (AppError::Template(_) | AppError::Internal(_))) => Err(err),
        Err(err) => {
            let inline = InlineErrors::from(err);
            let mut context = login_context(&form);
            inline.insert_into(&mut context);
            render_with_status(&state, inline.status(), "login.html", &context)
        }
    }
}

pub async fn logout(jar: CookieJar) -> Response {
    logout_redirect(jar)
}

#[cfg(test)]
mod tests {
    use crate::rpc::client::MockLibraryBackend;
    use crate::rpc::messages::{LoginRequest, LoginResponse};
    use crate::rpc::{Code, RpcFailure};
    use crate::web::test_support::{app, body_text, get, post_form};
    use axum::http::{
        header::{LOCATION, SET_COOKIE},
        StatusCode,
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_index_redirects() {
        let app = app(MockLibraryBackend::new());
        let response = app.clone().oneshot(get("/", None)).await.unwrap();
        assert_eq!(response.headers()[LOCATION], "/login");

        let response = app.oneshot(get("/", Some("tok"))).await.unwrap();
        assert_eq!(response.headers()[LOCATION], "/books");
    }

    #[tokio::test]
    async fn test_login_sets_session_cookie() {
        let mut backend = MockLibraryBackend::new();
        backend
            .expect_login()
            .withf(|request: &LoginRequest| request.username == "admin" && request.password == "secret")
            .times(1)
            .returning(|_| {
                Ok(LoginResponse {
                    token: "session-1".to_string(),
                })
            });

        let response = app(backend)
            .oneshot(post_form("/login", None, "username=+admin+&password=secret"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/books");
        let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("token=session-1"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_login_bad_credentials_stay_on_page() {
        let mut backend = MockLibraryBackend::new();
        backend
            .expect_login()
            .returning(|_| Err(RpcFailure::status(Code::Unauthenticated, "bad password")));

        let response = app(backend)
            .oneshot(post_form("/login", None, "username=admin&password=wrong"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert!(body_text(response).await.contains("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_login_missing_fields_skip_backend() {
        let mut backend = MockLibraryBackend::new();
        backend.expect_login().never();

        let response = app(backend)
            .oneshot(post_form("/login", None, "username=&password="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_text(response).await;
        assert!(body.contains("username is required"));
        assert!(body.contains("password is required"));
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let response = app(MockLibraryBackend::new())
            .oneshot(post_form("/logout", Some("tok"), ""))
            .await
            .unwrap();
        assert_eq!(response.headers()[LOCATION], "/login");
        let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
