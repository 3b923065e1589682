//! Authentication context injected by `require_auth`

use crate::domain::surveys::UserData;

/// Who the current request acts as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Session-authenticated user via JWT
    Session { username: String },
    /// Default local user (--no-auth mode)
    LocalDefault { username: String },
}

impl AuthContext {
    pub fn username(&self) -> &str {
        match self {
            Self::Session { username } | Self::LocalDefault { username } => username,
        }
    }

    pub fn user_data(&self) -> UserData {
        UserData::new(self.username())
    }
}
