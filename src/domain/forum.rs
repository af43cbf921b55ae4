use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StatusType;

/// Top-level grouping of forums within a site. Its permission set is
/// inherited by every forum that does not override it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub site_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub permission_set_id: Option<Uuid>,
    #[serde(default)]
    pub status: StatusType,
}

impl Category {
    pub fn is_deleted(&self) -> bool {
        self.status == StatusType::Deleted
    }
}

/// Forum inside a category. `permission_set_id` is an override; when absent
/// the category's set applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forum {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub permission_set_id: Option<Uuid>,
    #[serde(default)]
    pub status: StatusType,
}

impl Forum {
    pub fn is_deleted(&self) -> bool {
        self.status == StatusType::Deleted
    }
}
