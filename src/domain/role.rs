use serde::{Deserialize, Serialize};
use std::fmt;

/// Strongly-typed role identifier.
///
/// Roles are plain names. A few are well known and carry implicit meaning
/// when a member's effective roles are computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub String);

impl RoleId {
    /// Held by every caller, anonymous included
    pub const ALL: &'static str = "All";
    /// Held by every authenticated member
    pub const REGISTERED: &'static str = "Registered";
    /// Grants the administration API
    pub const ADMIN: &'static str = "Admin";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn all() -> Self {
        Self::new(Self::ALL)
    }

    pub fn registered() -> Self {
        Self::new(Self::REGISTERED)
    }

    pub fn admin() -> Self {
        Self::new(Self::ADMIN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RoleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RoleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
