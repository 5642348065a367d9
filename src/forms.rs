//! Form submissions of the console pages
//!
//! Every field is optional at the type level: an absent field and a blank one
//! are both reported by [`validate`](LoginForm::validate) as required.

use serde::{Deserialize, Serialize};

use crate::validation::{trim, validate_all, ValidationErrors};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginForm {
    pub fn validate(&self) -> ValidationErrors {
        validate_all([
            ("username", self.username.as_deref()),
            ("password", self.password.as_deref()),
        ])
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BookForm {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Optional
    pub isbn: Option<String>,
}

impl BookForm {
    pub fn validate(&self) -> ValidationErrors {
        validate_all([
            ("title", self.title.as_deref()),
            ("author", self.author.as_deref()),
        ])
    }

    pub fn isbn(&self) -> String {
        trim(self.isbn.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MemberForm {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl MemberForm {
    pub fn validate(&self) -> ValidationErrors {
        validate_all([
            ("name", self.name.as_deref()),
            ("email", self.email.as_deref()),
        ])
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CopyForm {
    pub book_id: Option<String>,
    pub copy_number: Option<String>,
}

impl CopyForm {
    pub fn validate(&self) -> ValidationErrors {
        validate_all([
            ("book_id", self.book_id.as_deref()),
            ("copy_number", self.copy_number.as_deref()),
        ])
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BorrowForm {
    pub copy_id: Option<String>,
    pub member_id: Option<String>,
}

impl BorrowForm {
    pub fn validate(&self) -> ValidationErrors {
        validate_all([
            ("copy_id", self.copy_id.as_deref()),
            ("member_id", self.member_id.as_deref()),
        ])
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReturnForm {
    pub copy_id: Option<String>,
}

impl ReturnForm {
    pub fn validate(&self) -> ValidationErrors {
        validate_all([("copy_id", self.copy_id.as_deref())])
    }
}
