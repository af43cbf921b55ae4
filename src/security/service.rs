use crate::domain::{PermissionType, RoleId};

use super::model::PermissionModel;

/// True iff some row grants `permission_type` to one of `roles`.
///
/// Rows with `is_allowed == false` never grant anything; they do not veto
/// an allow coming from another held role. No rows, no access.
pub fn has_permission(
    permission_type: PermissionType,
    roles: &[RoleId],
    models: &[PermissionModel],
) -> bool {
    models.iter().any(|model| {
        model.is_allowed && model.permission_type == permission_type && roles.contains(&model.role_id)
    })
}
