//! The logged-in user record.
//!
//! The "login" is a label, not a credential system: its only job is to
//! gate analytics recording and visibility.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
}

impl User {
    /// Build a user from login input. Input is trimmed; empty input is
    /// rejected.
    pub fn from_login(input: &str) -> Option<Self> {
        let username = input.trim();
        if username.is_empty() {
            return None;
        }
        Some(Self {
            username: username.to_string(),
        })
    }
}
