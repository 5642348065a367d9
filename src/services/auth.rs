//! Librarian login

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    forms::LoginForm,
    rpc::{messages::LoginRequest, LibraryBackend},
    validation::trim,
};

#[derive(Clone)]
pub struct AuthService {
    backend: Arc<dyn LibraryBackend>,
}

impl AuthService {
    pub fn new(backend: Arc<dyn LibraryBackend>) -> Self {
        Self { backend }
    }

    /// Exchange credentials for a session token
    pub async fn login(&self, form: &LoginForm) -> AppResult<String> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let request = LoginRequest {
            username: trim(form.username.as_deref()),
            password: trim(form.password.as_deref()),
        };
        let response = self.backend.login(request).await?;

        if response.token.is_empty() {
            return Err(AppError::LoginFailed);
        }
        Ok(response.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::client::MockLibraryBackend;
    use crate::rpc::messages::LoginResponse;
    use crate::rpc::{Code, RpcFailure};

    fn form(username: &str, password: &str) -> LoginForm {
        LoginForm {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_login_trims_credentials() {
        let mut backend = MockLibraryBackend::new();
        backend
            .expect_login()
            .withf(|request| request.username == "admin" && request.password == "secret")
            .times(1)
            .returning(|_| {
                Ok(LoginResponse {
                    token: "tok-1".to_string(),
                })
            });

        let service = AuthService::new(Arc::new(backend));
        let token = service.login(&form("  admin ", "secret\u{00A0}")).await.unwrap();
        assert_eq!(token, "tok-1");
    }

    #[tokio::test]
    async fn test_login_blank_fields_never_reach_backend() {
        let mut backend = MockLibraryBackend::new();
        backend.expect_login().never();

        let service = AuthService::new(Arc::new(backend));
        let err = service.login(&form("", "  ")).await.unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert!(errors.contains_key("username"));
                assert!(errors.contains_key("password"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_empty_token() {
        let mut backend = MockLibraryBackend::new();
        backend
            .expect_login()
            .returning(|_| Ok(LoginResponse::default()));

        let service = AuthService::new(Arc::new(backend));
        let err = service.login(&form("admin", "secret")).await.unwrap_err();
        assert!(matches!(err, AppError::LoginFailed));
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let mut backend = MockLibraryBackend::new();
        backend
            .expect_login()
            .returning(|_| Err(RpcFailure::status(Code::Unauthenticated, "bad password")));

        let service = AuthService::new(Arc::new(backend));
        let err = service.login(&form("admin", "wrong")).await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid credentials");
    }
}
