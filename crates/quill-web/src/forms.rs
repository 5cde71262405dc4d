//! Typed form inputs and their validation.
//!
//! Each submitted form deserializes into a struct and is validated up
//! front; failures come back as [`FormErrors`], a per-field message map
//! the render layer feeds straight into the originating form. Handlers
//! append their own entries for things validation cannot see, like
//! taken usernames.

use serde::Deserialize;
use std::collections::HashMap;
use validator::{Validate, ValidationErrors};

/// Per-field error messages for re-rendering a submitted form.
#[derive(Debug, Default)]
pub struct FormErrors(HashMap<String, Vec<String>>);

impl FormErrors {
    /// Validate a form and collect whatever it reports.
    pub fn of(form: &impl Validate) -> Self {
        match form.validate() {
            Ok(()) => Self::default(),
            Err(errors) => errors.into(),
        }
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = Self::default();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {field}"));
                out.add(field, message);
            }
        }
        out
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 2, max = 32, message = "Username must be between 2 and 32 characters"))]
    pub username: String,

    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Checkbox; browsers omit the field entirely when unchecked.
    #[serde(default)]
    pub remember: Option<String>,
}

impl LoginForm {
    pub fn remember_me(&self) -> bool {
        self.remember.is_some()
    }
}

/// Username/email half of the account form; the picture arrives as a
/// separate multipart field.
#[derive(Debug, Deserialize, Validate)]
pub struct AccountForm {
    #[validate(length(min = 2, max = 32, message = "Username must be between 2 and 32 characters"))]
    pub username: String,

    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PostForm {
    #[validate(length(min = 1, max = 140, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(length(min = 1, message = "Comment cannot be empty"))]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        let form = register("alice", "alice@example.com", "hunter2", "hunter2");
        assert!(FormErrors::of(&form).is_empty());
    }

    #[test]
    fn registration_reports_every_bad_field() {
        let form = register("a", "not-an-email", "", "different");
        let errors = FormErrors::of(&form);

        assert!(!errors.field("username").is_empty());
        assert!(!errors.field("email").is_empty());
        assert!(!errors.field("password").is_empty());
        assert_eq!(errors.field("confirm_password"), ["Passwords must match"]);
    }

    #[test]
    fn mismatched_confirmation_is_the_only_error() {
        let form = register("alice", "alice@example.com", "hunter2", "hunter3");
        let errors = FormErrors::of(&form);

        assert!(errors.field("username").is_empty());
        assert_eq!(errors.field("confirm_password"), ["Passwords must match"]);
    }

    #[test]
    fn login_remember_flag() {
        let mut form = LoginForm {
            email: "alice@example.com".to_string(),
            password: "pw".to_string(),
            remember: None,
        };
        assert!(!form.remember_me());

        form.remember = Some("on".to_string());
        assert!(form.remember_me());
    }

    #[test]
    fn empty_post_is_rejected() {
        let form = PostForm {
            title: String::new(),
            content: String::new(),
        };
        let errors = FormErrors::of(&form);
        assert_eq!(errors.field("title"), ["Title is required"]);
        assert_eq!(errors.field("content"), ["Content is required"]);
    }

    #[test]
    fn handler_added_errors_accumulate() {
        let mut errors = FormErrors::default();
        assert!(errors.is_empty());

        errors.add("username", "That username is taken");
        assert_eq!(errors.field("username"), ["That username is taken"]);
        assert!(errors.field("email").is_empty());
        assert!(!errors.is_empty());
    }
}
