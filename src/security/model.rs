use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::database::{DatabaseError, ForumRepository};
use crate::domain::{Category, Forum, PermissionSet, PermissionType, RoleId};

#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("Forum {forum_id} not found in site {site_id}")]
    ForumNotFound { site_id: Uuid, forum_id: Uuid },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// One resolved rule, built fresh for each request and never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionModel {
    pub role_id: RoleId,
    pub permission_type: PermissionType,
    pub is_allowed: bool,
}

impl PermissionModel {
    fn rows_for(set: &PermissionSet) -> Vec<PermissionModel> {
        set.permissions()
            .iter()
            .map(|command| PermissionModel {
                role_id: command.role_id.clone(),
                permission_type: command.permission_type,
                is_allowed: command.is_allowed,
            })
            .collect()
    }
}

/// Resolves the permission set that applies to a forum: the forum's own
/// override when it has one, otherwise the set of its category.
#[derive(Clone)]
pub struct PermissionModelBuilder {
    repository: Arc<dyn ForumRepository>,
}

impl PermissionModelBuilder {
    pub fn new(repository: Arc<dyn ForumRepository>) -> Self {
        Self { repository }
    }

    /// Rows for a single forum. An unknown forum, or one that is deleted or
    /// sits in a deleted category, is an error; a forum without a usable
    /// permission set yields no rows.
    pub async fn build_permission_models_by_forum_id(
        &self,
        site_id: Uuid,
        forum_id: Uuid,
    ) -> Result<Vec<PermissionModel>, SecurityError> {
        let forum = self
            .repository
            .forum(site_id, forum_id)
            .await?
            .filter(|f| !f.is_deleted())
            .ok_or(SecurityError::ForumNotFound { site_id, forum_id })?;

        let category = self
            .repository
            .category(site_id, forum.category_id)
            .await?
            .filter(|c| !c.is_deleted())
            .ok_or(SecurityError::ForumNotFound { site_id, forum_id })?;

        let Some(set_id) = Self::effective_permission_set_id(&forum, Some(&category)) else {
            debug!(%site_id, %forum_id, "No permission set configured for forum");
            return Ok(vec![]);
        };

        self.rows_for_set(site_id, forum_id, set_id).await
    }

    /// Rows for every live forum of a site, keyed by forum id
    pub async fn build_permission_models_by_site(
        &self,
        site_id: Uuid,
    ) -> Result<HashMap<Uuid, Vec<PermissionModel>>, SecurityError> {
        let categories: HashMap<Uuid, Category> = self
            .repository
            .categories(site_id)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let sets: HashMap<Uuid, PermissionSet> = self
            .repository
            .permission_sets(site_id)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let forums = self.repository.forums(site_id).await?;

        Ok(forums
            .into_iter()
            .filter(|f| !f.is_deleted())
            .filter(|f| categories.get(&f.category_id).is_some_and(|c| !c.is_deleted()))
            .map(|f| {
                let rows = Self::effective_permission_set_id(&f, categories.get(&f.category_id))
                    .and_then(|id| sets.get(&id))
                    .map(PermissionModel::rows_for)
                    .unwrap_or_default();
                (f.id, rows)
            })
            .collect())
    }

    fn effective_permission_set_id(forum: &Forum, category: Option<&Category>) -> Option<Uuid> {
        forum
            .permission_set_id
            .or_else(|| category.and_then(|c| c.permission_set_id))
    }

    async fn rows_for_set(
        &self,
        site_id: Uuid,
        forum_id: Uuid,
        set_id: Uuid,
    ) -> Result<Vec<PermissionModel>, SecurityError> {
        match self.repository.permission_set(site_id, set_id).await? {
            Some(set) if !set.is_deleted() => Ok(PermissionModel::rows_for(&set)),
            _ => {
                warn!(%site_id, %forum_id, permission_set_id = %set_id,
                    "Forum references a missing permission set; denying all");
                Ok(vec![])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SiteBuilder;

    #[tokio::test]
    async fn falls_back_to_category_permission_set() {
        let mut site = SiteBuilder::new();
        let set = site.permission_set("Default", &[("A", PermissionType::Read)]);
        let category = site.category("General", Some(set));
        let forum = site.forum(category, "Welcome", None);
        let builder = PermissionModelBuilder::new(site.repository());

        let rows = builder
            .build_permission_models_by_forum_id(site.id, forum)
            .await
            .unwrap();

        assert_eq!(
            rows,
            vec![PermissionModel {
                role_id: RoleId::from("A"),
                permission_type: PermissionType::Read,
                is_allowed: true,
            }]
        );
    }

    #[tokio::test]
    async fn forum_override_replaces_category_set() {
        let mut site = SiteBuilder::new();
        let category_set = site.permission_set("Default", &[("A", PermissionType::Moderate)]);
        let forum_set = site.permission_set("Staff", &[("B", PermissionType::Moderate)]);
        let category = site.category("General", Some(category_set));
        let forum = site.forum(category, "Staff room", Some(forum_set));
        let builder = PermissionModelBuilder::new(site.repository());

        let rows = builder
            .build_permission_models_by_forum_id(site.id, forum)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].role_id, RoleId::from("B"));
    }

    #[tokio::test]
    async fn no_permission_set_yields_empty_rows() {
        let mut site = SiteBuilder::new();
        let category = site.category("General", None);
        let forum = site.forum(category, "Welcome", None);
        let builder = PermissionModelBuilder::new(site.repository());

        let rows = builder
            .build_permission_models_by_forum_id(site.id, forum)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn deleted_permission_set_yields_empty_rows() {
        let mut site = SiteBuilder::new();
        let set = site.permission_set("Default", &[("A", PermissionType::Read)]);
        site.delete_permission_set(set);
        let category = site.category("General", Some(set));
        let forum = site.forum(category, "Welcome", None);
        let builder = PermissionModelBuilder::new(site.repository());

        let rows = builder
            .build_permission_models_by_forum_id(site.id, forum)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn unknown_forum_is_not_found() {
        let site = SiteBuilder::new();
        let builder = PermissionModelBuilder::new(site.repository());

        let err = builder
            .build_permission_models_by_forum_id(site.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, SecurityError::ForumNotFound { .. }));
    }

    #[tokio::test]
    async fn forum_of_another_site_is_not_found() {
        let mut site = SiteBuilder::new();
        let category = site.category("General", None);
        let forum = site.forum(category, "Welcome", None);
        let builder = PermissionModelBuilder::new(site.repository());

        let err = builder
            .build_permission_models_by_forum_id(Uuid::new_v4(), forum)
            .await
            .unwrap_err();
        assert!(matches!(err, SecurityError::ForumNotFound { .. }));
    }

    #[tokio::test]
    async fn builds_rows_for_every_live_forum_of_site() {
        let mut site = SiteBuilder::new();
        let set = site.permission_set("Default", &[("All", PermissionType::Read)]);
        let category = site.category("General", Some(set));
        let open = site.forum(category, "Open", None);
        let closed = site.forum(category, "Closed", None);
        site.delete_forum(closed);
        let builder = PermissionModelBuilder::new(site.repository());

        let by_forum = builder.build_permission_models_by_site(site.id).await.unwrap();

        assert_eq!(by_forum.len(), 1);
        assert_eq!(by_forum[&open].len(), 1);
    }

    #[tokio::test]
    async fn override_to_deleted_set_does_not_fall_back_to_category() {
        let mut site = SiteBuilder::new();
        let category_set = site.permission_set("Default", &[("All", PermissionType::Read)]);
        let forum_set = site.permission_set("Retired", &[("All", PermissionType::Read)]);
        site.delete_permission_set(forum_set);
        let category = site.category("General", Some(category_set));
        let forum = site.forum(category, "Archive", Some(forum_set));
        let builder = PermissionModelBuilder::new(site.repository());

        let rows = builder
            .build_permission_models_by_forum_id(site.id, forum)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn override_to_missing_set_does_not_fall_back_to_category() {
        let mut site = SiteBuilder::new();
        let category_set = site.permission_set("Default", &[("All", PermissionType::Read)]);
        let category = site.category("General", Some(category_set));
        let forum = site.forum(category, "Orphan", Some(Uuid::new_v4()));
        let builder = PermissionModelBuilder::new(site.repository());

        let rows = builder
            .build_permission_models_by_forum_id(site.id, forum)
            .await
            .unwrap();
        assert!(rows.is_empty());

        let by_forum = builder.build_permission_models_by_site(site.id).await.unwrap();
        assert!(by_forum[&forum].is_empty());
    }

    #[tokio::test]
    async fn forum_in_deleted_category_is_not_found() {
        let mut site = SiteBuilder::new();
        let set = site.permission_set("Default", &[("All", PermissionType::Read)]);
        let category = site.category("General", Some(set));
        let forum = site.forum(category, "Welcome", Some(set));
        site.delete_category(category);
        let builder = PermissionModelBuilder::new(site.repository());

        let err = builder
            .build_permission_models_by_forum_id(site.id, forum)
            .await
            .unwrap_err();
        assert!(matches!(err, SecurityError::ForumNotFound { .. }));

        let by_forum = builder.build_permission_models_by_site(site.id).await.unwrap();
        assert!(!by_forum.contains_key(&forum));
    }

    #[tokio::test]
    async fn site_models_honour_forum_override() {
        let mut site = SiteBuilder::new();
        let category_set = site.permission_set("Default", &[("A", PermissionType::Read)]);
        let forum_set = site.permission_set("Staff", &[("B", PermissionType::Moderate)]);
        let category = site.category("General", Some(category_set));
        let lobby = site.forum(category, "Lobby", None);
        let staff_room = site.forum(category, "Staff room", Some(forum_set));
        let builder = PermissionModelBuilder::new(site.repository());

        let by_forum = builder.build_permission_models_by_site(site.id).await.unwrap();

        assert_eq!(by_forum.len(), 2);
        assert_eq!(by_forum[&lobby][0].role_id, RoleId::from("A"));
        assert_eq!(
            by_forum[&staff_room],
            vec![PermissionModel {
                role_id: RoleId::from("B"),
                permission_type: PermissionType::Moderate,
                is_allowed: true,
            }]
        );
    }
}
