use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::PermissionType;

use super::context::MemberContext;
use super::model::PermissionModel;
use super::service::has_permission;

/// What a member may do in one forum.
///
/// Suspended members keep read access and lose everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ForumPermissions {
    pub can_read: bool,
    pub can_start: bool,
    pub can_reply: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_moderate: bool,
}

impl ForumPermissions {
    pub fn resolve(ctx: &MemberContext, models: &[PermissionModel]) -> Self {
        let roles = ctx.effective_roles();
        let active = !ctx.is_suspended();
        let check = |permission_type| has_permission(permission_type, &roles, models);

        Self {
            can_read: check(PermissionType::Read),
            can_start: check(PermissionType::Start) && active,
            can_reply: check(PermissionType::Reply) && active,
            can_edit: check(PermissionType::Edit) && active,
            can_delete: check(PermissionType::Delete) && active,
            can_moderate: check(PermissionType::Moderate) && active,
        }
    }

    pub fn allows(&self, permission_type: PermissionType) -> bool {
        match permission_type {
            PermissionType::Read => self.can_read,
            PermissionType::Start => self.can_start,
            PermissionType::Reply => self.can_reply,
            PermissionType::Edit => self.can_edit,
            PermissionType::Delete => self.can_delete,
            PermissionType::Moderate => self.can_moderate,
        }
    }
}

/// Operation a caller wants to perform in a forum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ForumAction {
    Read,
    Start,
    Reply,
    /// Edit a post written by `owner_id`
    Edit {
        owner_id: Uuid,
        #[serde(default)]
        locked: bool,
    },
    /// Delete a post written by `owner_id`
    Delete { owner_id: Uuid },
    /// Pin, lock or otherwise moderate content
    Moderate,
}

impl ForumAction {
    pub fn name(&self) -> &'static str {
        match self {
            ForumAction::Read => "read",
            ForumAction::Start => "start",
            ForumAction::Reply => "reply",
            ForumAction::Edit { .. } => "edit",
            ForumAction::Delete { .. } => "delete",
            ForumAction::Moderate => "moderate",
        }
    }
}

/// Decide whether `ctx` may perform `action` given its forum permissions.
///
/// Owners may edit their unlocked posts and delete their posts when the
/// forum grants Edit/Delete; moderators may do both regardless.
pub fn authorize(permissions: &ForumPermissions, ctx: &MemberContext, action: &ForumAction) -> bool {
    let is_owner = |owner_id: &Uuid| ctx.member_id().as_ref() == Some(owner_id);

    match action {
        ForumAction::Read => permissions.can_read,
        ForumAction::Start => permissions.can_start,
        ForumAction::Reply => permissions.can_reply,
        ForumAction::Edit { owner_id, locked } => {
            (permissions.can_edit && is_owner(owner_id) && !locked) || permissions.can_moderate
        }
        ForumAction::Delete { owner_id } => {
            (permissions.can_delete && is_owner(owner_id)) || permissions.can_moderate
        }
        ForumAction::Moderate => permissions.can_moderate,
    }
}
