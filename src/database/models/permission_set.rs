use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::domain::{PermissionCommand, PermissionSet, PermissionType, RoleId, StatusType};

#[derive(Debug, Clone, FromRow)]
pub struct PermissionSetRow {
    pub id: Uuid,
    pub site_id: Uuid,
    pub name: String,
    pub status: String,
}

/// One entry of the `permissions` table, ordered by `position`
#[derive(Debug, Clone, FromRow)]
pub struct PermissionRow {
    pub permission_set_id: Uuid,
    pub role_id: String,
    pub permission_type: String,
    pub is_allowed: bool,
    pub position: i32,
}

impl PermissionRow {
    pub fn into_command(self) -> Result<PermissionCommand, DatabaseError> {
        let permission_type: PermissionType = self
            .permission_type
            .parse()
            .map_err(|e: crate::domain::permission::UnknownPermissionType| {
                DatabaseError::QueryError(e.to_string())
            })?;
        Ok(PermissionCommand {
            role_id: RoleId::from(self.role_id),
            permission_type,
            is_allowed: self.is_allowed,
        })
    }
}

impl PermissionSetRow {
    /// Assemble the domain set from its header row and its entries
    pub fn into_permission_set(
        self,
        rows: Vec<PermissionRow>,
    ) -> Result<PermissionSet, DatabaseError> {
        let commands = rows
            .into_iter()
            .map(PermissionRow::into_command)
            .collect::<Result<Vec<_>, _>>()?;
        let mut set = PermissionSet::new(self.id, self.site_id, self.name, commands);
        set.status = StatusType::from_db(&self.status);
        Ok(set)
    }
}
