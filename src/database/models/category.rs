use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::{Category, StatusType};

#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: Uuid,
    pub site_id: Uuid,
    pub name: String,
    pub sort_order: i32,
    pub permission_set_id: Option<Uuid>,
    pub status: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            site_id: row.site_id,
            name: row.name,
            sort_order: row.sort_order,
            permission_set_id: row.permission_set_id,
            status: StatusType::from_db(&row.status),
        }
    }
}
