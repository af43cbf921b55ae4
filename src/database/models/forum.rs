use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::{Forum, StatusType};

#[derive(Debug, Clone, FromRow)]
pub struct ForumRow {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
    pub permission_set_id: Option<Uuid>,
    pub status: String,
}

impl From<ForumRow> for Forum {
    fn from(row: ForumRow) -> Self {
        Self {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            slug: row.slug,
            sort_order: row.sort_order,
            permission_set_id: row.permission_set_id,
            status: StatusType::from_db(&row.status),
        }
    }
}
