use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{RoleId, StatusType};

/// Capability a role can be granted on a forum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionType {
    Read,
    Start,
    Reply,
    Edit,
    Delete,
    Moderate,
}

impl PermissionType {
    pub const ALL: [PermissionType; 6] = [
        PermissionType::Read,
        PermissionType::Start,
        PermissionType::Reply,
        PermissionType::Edit,
        PermissionType::Delete,
        PermissionType::Moderate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionType::Read => "Read",
            PermissionType::Start => "Start",
            PermissionType::Reply => "Reply",
            PermissionType::Edit => "Edit",
            PermissionType::Delete => "Delete",
            PermissionType::Moderate => "Moderate",
        }
    }
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown permission type: {0}")]
pub struct UnknownPermissionType(pub String);

impl FromStr for PermissionType {
    type Err = UnknownPermissionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PermissionType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPermissionType(s.to_string()))
    }
}

/// A single role-to-capability rule inside a permission set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCommand {
    pub role_id: RoleId,
    pub permission_type: PermissionType,
    #[serde(default = "default_allowed")]
    pub is_allowed: bool,
}

fn default_allowed() -> bool {
    true
}

impl PermissionCommand {
    pub fn allow(role_id: impl Into<RoleId>, permission_type: PermissionType) -> Self {
        Self {
            role_id: role_id.into(),
            permission_type,
            is_allowed: true,
        }
    }

    pub fn deny(role_id: impl Into<RoleId>, permission_type: PermissionType) -> Self {
        Self {
            role_id: role_id.into(),
            permission_type,
            is_allowed: false,
        }
    }
}

/// Named collection of role-to-capability rules owned by a site.
///
/// Entries are keyed by `(role_id, permission_type)`: a later command for the
/// same key replaces the earlier one in place, so the set never holds two
/// effective entries for one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionSet {
    pub id: Uuid,
    pub site_id: Uuid,
    pub name: String,
    pub status: StatusType,
    permissions: Vec<PermissionCommand>,
}

impl PermissionSet {
    pub fn new(
        id: Uuid,
        site_id: Uuid,
        name: impl Into<String>,
        permissions: impl IntoIterator<Item = PermissionCommand>,
    ) -> Self {
        let mut set = Self {
            id,
            site_id,
            name: name.into(),
            status: StatusType::Published,
            permissions: Vec::new(),
        };
        set.replace_permissions(permissions);
        set
    }

    pub fn permissions(&self) -> &[PermissionCommand] {
        &self.permissions
    }

    pub fn is_deleted(&self) -> bool {
        self.status == StatusType::Deleted
    }

    pub fn update_details(
        &mut self,
        name: impl Into<String>,
        permissions: impl IntoIterator<Item = PermissionCommand>,
    ) {
        self.name = name.into();
        self.replace_permissions(permissions);
    }

    pub fn delete(&mut self) {
        self.status = StatusType::Deleted;
    }

    fn replace_permissions(&mut self, permissions: impl IntoIterator<Item = PermissionCommand>) {
        self.permissions.clear();
        for command in permissions {
            match self.permissions.iter_mut().find(|existing| {
                existing.role_id == command.role_id
                    && existing.permission_type == command.permission_type
            }) {
                Some(existing) => existing.is_allowed = command.is_allowed,
                None => self.permissions.push(command),
            }
        }
    }
}
