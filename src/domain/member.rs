use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RoleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MemberStatus {
    #[default]
    Active,
    Suspended,
    Deleted,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Suspended => "suspended",
            MemberStatus::Deleted => "deleted",
        }
    }

    pub fn from_db(value: &str) -> Self {
        match value {
            "suspended" => MemberStatus::Suspended,
            "deleted" => MemberStatus::Deleted,
            _ => MemberStatus::Active,
        }
    }
}

/// Registered member of a site with the roles assigned to them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub site_id: Uuid,
    pub display_name: String,
    #[serde(default)]
    pub roles: Vec<RoleId>,
    #[serde(default)]
    pub status: MemberStatus,
}

impl Member {
    pub fn is_suspended(&self) -> bool {
        self.status == MemberStatus::Suspended
    }

    pub fn is_deleted(&self) -> bool {
        self.status == MemberStatus::Deleted
    }
}
