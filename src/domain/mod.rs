/// Forum domain types shared by the repository, security and HTTP layers
pub mod forum;
pub mod member;
pub mod permission;
pub mod role;

pub use forum::{Category, Forum};
pub use member::{Member, MemberStatus};
pub use permission::{PermissionCommand, PermissionSet, PermissionType};
pub use role::RoleId;

use serde::{Deserialize, Serialize};

/// Publication status carried by categories, forums and permission sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusType {
    #[default]
    Published,
    Deleted,
}

impl StatusType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusType::Published => "published",
            StatusType::Deleted => "deleted",
        }
    }

    pub fn from_db(value: &str) -> Self {
        match value {
            "deleted" => StatusType::Deleted,
            _ => StatusType::Published,
        }
    }
}
