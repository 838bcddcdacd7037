use serde::{Deserialize, Serialize};
use std::fmt;

/// Signed-in user. Authentication is a local mock; there is no server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub is_pro: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginProvider {
    Google,
    Email,
}

impl LoginProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "google" => Some(LoginProvider::Google),
            "email" => Some(LoginProvider::Email),
            _ => None,
        }
    }
}

impl User {
    /// The mock account handed out by every login.
    pub fn mock(provider: LoginProvider) -> Self {
        match provider {
            LoginProvider::Google => User {
                id: "user_123".into(),
                name: "Google User".into(),
                email: "user@gmail.com".into(),
                avatar: Some("https://api.dicebear.com/7.x/avataaars/svg?seed=Felix".into()),
                is_pro: false,
            },
            LoginProvider::Email => User {
                id: "user_123".into(),
                name: "Email User".into(),
                email: "user@email.com".into(),
                avatar: None,
                is_pro: false,
            },
        }
    }
}

/// Features reserved for premium users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    CsvExport,
    CloudSync,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::CsvExport => write!(f, "CSV export"),
            Feature::CloudSync => write!(f, "cloud sync"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    SignInRequired,
    UpgradeRequired,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::SignInRequired => write!(f, "sign in required"),
            DenialReason::UpgradeRequired => write!(f, "upgrade to PRO required"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied(DenialReason),
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allowed)
    }
}

/// Decide whether `user` may use `feature`.
pub fn check_access(user: Option<&User>, feature: Feature) -> Access {
    match (user, feature) {
        (None, _) => Access::Denied(DenialReason::SignInRequired),
        (Some(user), Feature::CsvExport | Feature::CloudSync) if user.is_pro => Access::Allowed,
        (Some(_), _) => Access::Denied(DenialReason::UpgradeRequired),
    }
}
