//! Demo sign-in.
//!
//! A [`Session`] is a plain value: holding one means signed in. Nothing is
//! persisted and there is no hashing; the demo account is hard-coded.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};

/// The one account that may sign in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Credentials for a custom account.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }

    /// `user@nextmail.com` / `123456`.
    pub fn demo() -> Self {
        Credentials::new("user@nextmail.com", "123456")
    }

    fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email.trim() && self.password == password
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Credentials::demo()
    }
}

/// Proof of a successful sign-in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    email: String,
    signed_in_at: DateTime<Utc>,
}

impl Session {
    /// Sign in against `expected`.
    ///
    /// ```
    /// use invoice_kit::session::{Credentials, Session};
    ///
    /// let demo = Credentials::demo();
    /// let session = Session::login("user@nextmail.com", "123456", &demo).unwrap();
    /// assert_eq!(session.email(), "user@nextmail.com");
    ///
    /// let err = Session::login("user@nextmail.com", "nope", &demo).unwrap_err();
    /// assert_eq!(err.to_string(), "Invalid credentials. Please try again.");
    /// ```
    ///
    /// # Errors
    /// Returns `Error::Unauthorized` when the pair does not match.
    pub fn login(email: &str, password: &str, expected: &Credentials) -> Result<Session> {
        if !expected.matches(email, password) {
            warn!("Login rejected for {}", email);
            return Err(Error::Unauthorized);
        }

        info!("Login: {}", expected.email);
        Ok(Session {
            email: expected.email.clone(),
            signed_in_at: Utc::now(),
        })
    }

    /// Signed-in account.
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn signed_in_at(&self) -> DateTime<Utc> {
        self.signed_in_at
    }
}
