//! Backend status codes (gRPC numbering)

use std::fmt;

/// Outcome classification of a backend call.
///
/// Only the codes the console reacts to get their own variant; every other
/// numeric value is kept as [`Code::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    DeadlineExceeded,
    NotFound,
    FailedPrecondition,
    Unavailable,
    Unauthenticated,
    Other(i32),
}

impl Code {
    pub const DEADLINE_EXCEEDED: i32 = 4;
    pub const NOT_FOUND: i32 = 5;
    pub const FAILED_PRECONDITION: i32 = 9;
    pub const UNAVAILABLE: i32 = 14;
    pub const UNAUTHENTICATED: i32 = 16;

    pub fn from_i32(value: i32) -> Self {
        match value {
            Self::DEADLINE_EXCEEDED => Code::DeadlineExceeded,
            Self::NOT_FOUND => Code::NotFound,
            Self::FAILED_PRECONDITION => Code::FailedPrecondition,
            Self::UNAVAILABLE => Code::Unavailable,
            Self::UNAUTHENTICATED => Code::Unauthenticated,
            other => Code::Other(other),
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Code::DeadlineExceeded => write!(f, "deadline exceeded"),
            Code::NotFound => write!(f, "not found"),
            Code::FailedPrecondition => write!(f, "failed precondition"),
            Code::Unavailable => write!(f, "unavailable"),
            Code::Unauthenticated => write!(f, "unauthenticated"),
            Code::Other(value) => write!(f, "code {}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(Code::from_i32(16), Code::Unauthenticated);
        assert_eq!(Code::from_i32(14), Code::Unavailable);
        assert_eq!(Code::from_i32(4), Code::DeadlineExceeded);
        assert_eq!(Code::from_i32(9), Code::FailedPrecondition);
        assert_eq!(Code::from_i32(5), Code::NotFound);
    }

    #[test]
    fn test_other_codes_keep_value() {
        assert_eq!(Code::from_i32(3), Code::Other(3));
        assert_eq!(Code::from_i32(-1).to_string(), "code -1");
    }
}
