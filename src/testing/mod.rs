//! Builders for seeding an in-memory site in tests.

use std::sync::Arc;
use uuid::Uuid;

use crate::database::{ForumData, ForumRepository, MemoryForumRepository};
use crate::domain::{
    Category, Forum, Member, MemberStatus, PermissionCommand, PermissionSet, PermissionType, RoleId,
    StatusType,
};

/// Accumulates the entities of one site, then hands out a repository
pub struct SiteBuilder {
    pub id: Uuid,
    data: ForumData,
}

impl Default for SiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            data: ForumData::default(),
        }
    }

    pub fn permission_set(&mut self, name: &str, grants: &[(&str, PermissionType)]) -> Uuid {
        let set = PermissionSet::new(
            Uuid::new_v4(),
            self.id,
            name,
            grants
                .iter()
                .map(|(role, permission_type)| PermissionCommand::allow(*role, *permission_type)),
        );
        let id = set.id;
        self.data.permission_sets.push(set);
        id
    }

    pub fn delete_permission_set(&mut self, id: Uuid) {
        if let Some(set) = self.data.permission_sets.iter_mut().find(|s| s.id == id) {
            set.delete();
        }
    }

    pub fn category(&mut self, name: &str, permission_set_id: Option<Uuid>) -> Uuid {
        let category = Category {
            id: Uuid::new_v4(),
            site_id: self.id,
            name: name.to_string(),
            sort_order: self.data.categories.len() as i32 + 1,
            permission_set_id,
            status: StatusType::Published,
        };
        let id = category.id;
        self.data.categories.push(category);
        id
    }

    pub fn delete_category(&mut self, id: Uuid) {
        if let Some(category) = self.data.categories.iter_mut().find(|c| c.id == id) {
            category.status = StatusType::Deleted;
        }
    }

    pub fn forum(&mut self, category_id: Uuid, name: &str, permission_set_id: Option<Uuid>) -> Uuid {
        let forum = Forum {
            id: Uuid::new_v4(),
            category_id,
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            sort_order: self.data.forums.len() as i32 + 1,
            permission_set_id,
            status: StatusType::Published,
        };
        let id = forum.id;
        self.data.forums.push(forum);
        id
    }

    pub fn delete_forum(&mut self, id: Uuid) {
        if let Some(forum) = self.data.forums.iter_mut().find(|f| f.id == id) {
            forum.status = StatusType::Deleted;
        }
    }

    pub fn member(&mut self, display_name: &str, roles: &[&str]) -> Member {
        self.member_with_status(display_name, roles, MemberStatus::Active)
    }

    pub fn suspended_member(&mut self, display_name: &str, roles: &[&str]) -> Member {
        self.member_with_status(display_name, roles, MemberStatus::Suspended)
    }

    fn member_with_status(&mut self, display_name: &str, roles: &[&str], status: MemberStatus) -> Member {
        let member = Member {
            id: Uuid::new_v4(),
            site_id: self.id,
            display_name: display_name.to_string(),
            roles: roles.iter().map(|r| RoleId::from(*r)).collect(),
            status,
        };
        self.data.members.push(member.clone());
        member
    }

    /// Copy another site's entities in, so one repository serves both
    pub fn include(&mut self, other: &SiteBuilder) {
        self.data.permission_sets.extend(other.data.permission_sets.iter().cloned());
        self.data.categories.extend(other.data.categories.iter().cloned());
        self.data.forums.extend(other.data.forums.iter().cloned());
        self.data.members.extend(other.data.members.iter().cloned());
    }

    /// Snapshot of everything added so far
    pub fn repository(&self) -> Arc<dyn ForumRepository> {
        Arc::new(MemoryForumRepository::new(self.data.clone()))
    }
}
