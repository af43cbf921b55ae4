use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::{Member, MemberStatus, RoleId};

#[derive(Debug, Clone, FromRow)]
pub struct MemberRow {
    pub id: Uuid,
    pub site_id: Uuid,
    pub display_name: String,
    pub roles: Vec<String>,
    pub status: String,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Self {
            id: row.id,
            site_id: row.site_id,
            display_name: row.display_name,
            roles: row.roles.into_iter().map(RoleId::from).collect(),
            status: MemberStatus::from_db(&row.status),
        }
    }
}
