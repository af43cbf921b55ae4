use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

use crate::database::memory::ForumData;
use crate::domain::{
    Category, Forum, Member, MemberStatus, PermissionCommand, PermissionSet, RoleId, StatusType,
};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid fixture YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Fixture forum '{forum}' references unknown category {category_id}")]
    UnknownCategory { forum: String, category_id: Uuid },

    #[error("Fixture references unknown permission set {0}")]
    UnknownPermissionSet(Uuid),
}

/// YAML description of a single site's forum tree.
///
/// ```yaml
/// site_id: 6f1c2a9e-...
/// permission_sets:
///   - id: ...
///     name: Default
///     permissions:
///       - { role_id: All, permission_type: Read }
/// categories:
///   - { id: ..., name: General, permission_set_id: ... }
/// forums:
///   - { id: ..., category_id: ..., name: Welcome, slug: welcome }
/// members:
///   - { id: ..., display_name: alice, roles: [Moderator] }
/// ```
#[derive(Debug, Deserialize)]
pub struct SiteFixture {
    pub site_id: Uuid,
    #[serde(default)]
    pub permission_sets: Vec<PermissionSetFixture>,
    #[serde(default)]
    pub categories: Vec<CategoryFixture>,
    #[serde(default)]
    pub forums: Vec<Forum>,
    #[serde(default)]
    pub members: Vec<MemberFixture>,
}

#[derive(Debug, Deserialize)]
pub struct PermissionSetFixture {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<PermissionCommand>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub permission_set_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct MemberFixture {
    pub id: Uuid,
    pub display_name: String,
    #[serde(default)]
    pub roles: Vec<RoleId>,
    #[serde(default)]
    pub suspended: bool,
}

impl SiteFixture {
    pub fn from_yaml(source: &str) -> Result<Self, FixtureError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&source)
    }

    /// Check cross references and convert into repository seed data
    pub fn into_data(self) -> Result<ForumData, FixtureError> {
        let site_id = self.site_id;
        let set_ids: Vec<Uuid> = self.permission_sets.iter().map(|s| s.id).collect();
        let category_ids: Vec<Uuid> = self.categories.iter().map(|c| c.id).collect();

        let check_set = |id: Option<Uuid>| match id {
            Some(id) if !set_ids.contains(&id) => Err(FixtureError::UnknownPermissionSet(id)),
            _ => Ok(()),
        };

        for category in &self.categories {
            check_set(category.permission_set_id)?;
        }
        for forum in &self.forums {
            if !category_ids.contains(&forum.category_id) {
                return Err(FixtureError::UnknownCategory {
                    forum: forum.name.clone(),
                    category_id: forum.category_id,
                });
            }
            check_set(forum.permission_set_id)?;
        }

        Ok(ForumData {
            permission_sets: self
                .permission_sets
                .into_iter()
                .map(|s| PermissionSet::new(s.id, site_id, s.name, s.permissions))
                .collect(),
            categories: self
                .categories
                .into_iter()
                .map(|c| Category {
                    id: c.id,
                    site_id,
                    name: c.name,
                    sort_order: c.sort_order,
                    permission_set_id: c.permission_set_id,
                    status: StatusType::Published,
                })
                .collect(),
            forums: self.forums,
            members: self
                .members
                .into_iter()
                .map(|m| Member {
                    id: m.id,
                    site_id,
                    display_name: m.display_name,
                    roles: m.roles,
                    status: if m.suspended {
                        MemberStatus::Suspended
                    } else {
                        MemberStatus::Active
                    },
                })
                .collect(),
        })
    }
}
