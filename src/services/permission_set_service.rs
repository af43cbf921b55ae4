use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::database::{DatabaseError, ForumRepository};
use crate::domain::{PermissionCommand, PermissionSet};

const MAX_NAME_LENGTH: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum PermissionSetError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Invalid permission set name: {0}")]
    InvalidName(String),
    #[error("A permission set named '{0}' already exists")]
    DuplicateName(String),
    #[error("Permission set already exists: {0}")]
    AlreadyExists(Uuid),
    #[error("Permission set not found: {0}")]
    NotFound(Uuid),
    #[error("Permission set {0} is still used by a category or forum")]
    InUse(Uuid),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePermissionSet {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<PermissionCommand>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePermissionSet {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<PermissionCommand>,
}

/// Row of the administration index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionSetSummary {
    pub id: Uuid,
    pub name: String,
}

/// Administration of a site's permission sets
#[derive(Clone)]
pub struct PermissionSetService {
    repository: Arc<dyn ForumRepository>,
}

impl PermissionSetService {
    pub fn new(repository: Arc<dyn ForumRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, site_id: Uuid) -> Result<Vec<PermissionSetSummary>, PermissionSetError> {
        let sets = self.repository.permission_sets(site_id).await?;
        Ok(sets
            .into_iter()
            .map(|s| PermissionSetSummary { id: s.id, name: s.name })
            .collect())
    }

    pub async fn get(&self, site_id: Uuid, id: Uuid) -> Result<PermissionSet, PermissionSetError> {
        self.repository
            .permission_set(site_id, id)
            .await?
            .filter(|s| !s.is_deleted())
            .ok_or(PermissionSetError::NotFound(id))
    }

    pub async fn create(
        &self,
        site_id: Uuid,
        member_id: Option<Uuid>,
        command: CreatePermissionSet,
    ) -> Result<PermissionSet, PermissionSetError> {
        let name = self.validate_name(site_id, &command.name, None).await?;

        if self.repository.permission_set(site_id, command.id).await?.is_some() {
            return Err(PermissionSetError::AlreadyExists(command.id));
        }

        let set = PermissionSet::new(command.id, site_id, name, command.permissions);
        self.repository
            .save_permission_set(&set)
            .await
            .map_err(|err| match err {
                DatabaseError::Conflict(_) => PermissionSetError::AlreadyExists(set.id),
                other => other.into(),
            })?;

        info!(%site_id, member_id = ?member_id, permission_set_id = %set.id,
            permissions = set.permissions().len(), "Permission set created");
        Ok(set)
    }

    pub async fn update(
        &self,
        site_id: Uuid,
        member_id: Option<Uuid>,
        id: Uuid,
        command: UpdatePermissionSet,
    ) -> Result<PermissionSet, PermissionSetError> {
        let mut set = self.get(site_id, id).await?;
        let name = self.validate_name(site_id, &command.name, Some(id)).await?;

        set.update_details(name, command.permissions);
        self.repository.save_permission_set(&set).await?;

        info!(%site_id, member_id = ?member_id, permission_set_id = %set.id,
            permissions = set.permissions().len(), "Permission set updated");
        Ok(set)
    }

    /// Soft delete; refused while a category or forum still points at the set
    pub async fn delete(
        &self,
        site_id: Uuid,
        member_id: Option<Uuid>,
        id: Uuid,
    ) -> Result<(), PermissionSetError> {
        let mut set = self.get(site_id, id).await?;

        if self.repository.is_permission_set_in_use(site_id, id).await? {
            return Err(PermissionSetError::InUse(id));
        }

        set.delete();
        self.repository.save_permission_set(&set).await?;

        info!(%site_id, member_id = ?member_id, permission_set_id = %id, "Permission set deleted");
        Ok(())
    }

    /// Name rules: required, at most 50 characters, unique among the
    /// site's live sets. Returns the trimmed name.
    async fn validate_name(
        &self,
        site_id: Uuid,
        name: &str,
        current_id: Option<Uuid>,
    ) -> Result<String, PermissionSetError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(PermissionSetError::InvalidName("Name is required".to_string()));
        }

        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(PermissionSetError::InvalidName(format!(
                "Name must be at most {} characters",
                MAX_NAME_LENGTH
            )));
        }

        let taken = self
            .repository
            .permission_sets(site_id)
            .await?
            .iter()
            .any(|s| Some(s.id) != current_id && s.name.eq_ignore_ascii_case(name));
        if taken {
            return Err(PermissionSetError::DuplicateName(name.to_string()));
        }

        Ok(name.to_string())
    }
}
