//! Backend failure narrowing and classification
//!
//! Whatever a call fails with is first narrowed into an [`RpcFailure`]; the
//! display message and the re-login decision are then pure queries over it.

use serde_json::Value;
use thiserror::Error;

use super::status::Code;

pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MSG_UNAVAILABLE: &str = "Service unavailable. Please try again later.";
pub const MSG_TIMEOUT: &str = "Request timed out. Please try again.";
pub const MSG_NOT_ALLOWED: &str = "Operation not allowed";
pub const MSG_NOT_FOUND: &str = "Resource not found";
pub const MSG_ERROR: &str = "An error occurred";
pub const MSG_CONNECTIVITY: &str = "Service unavailable. Please check your connection.";
pub const MSG_UNEXPECTED: &str = "An unexpected error occurred";

/// A failed backend call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcFailure {
    /// The backend answered with a status code
    #[error("backend returned {code}: {message}")]
    Status { code: Code, message: String },

    /// No status code, only a description (connection refused, bad payload)
    #[error("{message}")]
    Generic { message: String },

    #[error("unknown backend failure")]
    Unknown,
}

impl RpcFailure {
    pub fn status(code: Code, message: impl Into<String>) -> Self {
        RpcFailure::Status {
            code,
            message: message.into(),
        }
    }

    pub fn generic(message: impl Into<String>) -> Self {
        RpcFailure::Generic {
            message: message.into(),
        }
    }

    /// Narrow an arbitrary error payload.
    ///
    /// An object with a numeric `code` is a status failure; an object with a
    /// string `message`, or a bare string, is generic; anything else is unknown.
    pub fn from_payload(payload: &Value) -> Self {
        match payload {
            Value::Object(map) => {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                match map.get("code").and_then(Value::as_i64) {
                    Some(code) => RpcFailure::Status {
                        code: i32::try_from(code).map(Code::from_i32).unwrap_or(Code::Other(-1)),
                        message: message.unwrap_or_default(),
                    },
                    None => match message {
                        Some(message) => RpcFailure::Generic { message },
                        None => RpcFailure::Unknown,
                    },
                }
            }
            Value::String(message) => RpcFailure::generic(message.clone()),
            _ => RpcFailure::Unknown,
        }
    }

    pub fn code(&self) -> Option<Code> {
        match self {
            RpcFailure::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

fn server_message_or(message: &str, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message.to_string()
    }
}

/// User-facing message for a failure. Never empty.
pub fn classify(failure: &RpcFailure) -> String {
    match failure {
        RpcFailure::Status { code, message } => match code {
            Code::Unauthenticated => MSG_INVALID_CREDENTIALS.to_string(),
            Code::Unavailable => MSG_UNAVAILABLE.to_string(),
            Code::DeadlineExceeded => MSG_TIMEOUT.to_string(),
            Code::FailedPrecondition => server_message_or(message, MSG_NOT_ALLOWED),
            Code::NotFound => server_message_or(message, MSG_NOT_FOUND),
            Code::Other(_) => server_message_or(message, MSG_ERROR),
        },
        RpcFailure::Generic { message } => {
            if message.contains("fetch") || message.contains("network") {
                MSG_CONNECTIVITY.to_string()
            } else {
                server_message_or(message, MSG_UNEXPECTED)
            }
        }
        RpcFailure::Unknown => MSG_UNEXPECTED.to_string(),
    }
}

/// Whether the session must be discarded and the user sent back to login
pub fn requires_reauth(failure: &RpcFailure) -> bool {
    failure.code() == Some(Code::Unauthenticated)
}

pub fn is_not_found(failure: &RpcFailure) -> bool {
    failure.code() == Some(Code::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unauthenticated() {
        let failure = RpcFailure::status(Code::Unauthenticated, "token expired");
        assert_eq!(classify(&failure), "Invalid credentials");
        assert!(requires_reauth(&failure));
        assert!(!is_not_found(&failure));
    }

    #[test]
    fn test_fixed_messages_ignore_server_text() {
        let unavailable = RpcFailure::status(Code::Unavailable, "upstream down");
        assert_eq!(classify(&unavailable), MSG_UNAVAILABLE);
        let timeout = RpcFailure::status(Code::DeadlineExceeded, "");
        assert_eq!(classify(&timeout), MSG_TIMEOUT);
        assert!(!requires_reauth(&unavailable));
    }

    #[test]
    fn test_not_found() {
        let failure = RpcFailure::status(Code::NotFound, "Book not found");
        assert_eq!(classify(&failure), "Book not found");
        assert!(is_not_found(&failure));

        let empty = RpcFailure::status(Code::NotFound, "");
        assert_eq!(classify(&empty), "Resource not found");
    }

    #[test]
    fn test_failed_precondition() {
        let failure = RpcFailure::status(Code::FailedPrecondition, "Copy already borrowed");
        assert_eq!(classify(&failure), "Copy already borrowed");
        assert_eq!(
            classify(&RpcFailure::status(Code::FailedPrecondition, "")),
            "Operation not allowed"
        );
    }

    #[test]
    fn test_other_codes() {
        assert_eq!(classify(&RpcFailure::status(Code::Other(3), "Invalid ISBN")), "Invalid ISBN");
        assert_eq!(classify(&RpcFailure::status(Code::Other(13), "")), "An error occurred");
        assert!(!requires_reauth(&RpcFailure::status(Code::Other(7), "")));
    }

    #[test]
    fn test_generic_failures() {
        assert_eq!(classify(&RpcFailure::generic("network timeout")), MSG_CONNECTIVITY);
        assert_eq!(classify(&RpcFailure::generic("Failed to fetch")), MSG_CONNECTIVITY);
        assert_eq!(classify(&RpcFailure::generic("boom")), "boom");
        assert_eq!(classify(&RpcFailure::generic("")), MSG_UNEXPECTED);
        assert_eq!(classify(&RpcFailure::Unknown), MSG_UNEXPECTED);
        assert!(!requires_reauth(&RpcFailure::generic("network timeout")));
        assert!(!is_not_found(&RpcFailure::Unknown));
    }

    #[test]
    fn test_from_payload() {
        assert_eq!(
            RpcFailure::from_payload(&json!({"code": 5, "message": "Member not found"})),
            RpcFailure::status(Code::NotFound, "Member not found")
        );
        assert_eq!(
            RpcFailure::from_payload(&json!({"code": 16})),
            RpcFailure::status(Code::Unauthenticated, "")
        );
        assert_eq!(
            RpcFailure::from_payload(&json!({"message": "bad gateway"})),
            RpcFailure::generic("bad gateway")
        );
        assert_eq!(
            RpcFailure::from_payload(&json!("plain text")),
            RpcFailure::generic("plain text")
        );
        assert_eq!(RpcFailure::from_payload(&json!(null)), RpcFailure::Unknown);
        assert_eq!(RpcFailure::from_payload(&json!(42)), RpcFailure::Unknown);
        assert_eq!(RpcFailure::from_payload(&json!({"code": "5"})), RpcFailure::Unknown);
    }

    #[test]
    fn test_every_failure_has_a_message() {
        let failures = [
            RpcFailure::status(Code::Unauthenticated, ""),
            RpcFailure::status(Code::Unavailable, ""),
            RpcFailure::status(Code::DeadlineExceeded, ""),
            RpcFailure::status(Code::FailedPrecondition, ""),
            RpcFailure::status(Code::NotFound, ""),
            RpcFailure::status(Code::Other(2), ""),
            RpcFailure::generic(""),
            RpcFailure::Unknown,
        ];
        for failure in &failures {
            assert!(!classify(failure).is_empty(), "{:?}", failure);
        }
    }
}
