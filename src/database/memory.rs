use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::repository::ForumRepository;
use crate::domain::{Category, Forum, Member, PermissionSet};

/// Plain collection of forum entities, used to seed the in-memory repository
#[derive(Debug, Clone, Default)]
pub struct ForumData {
    pub permission_sets: Vec<PermissionSet>,
    pub categories: Vec<Category>,
    pub forums: Vec<Forum>,
    pub members: Vec<Member>,
}

#[derive(Default)]
struct MemoryState {
    permission_sets: HashMap<Uuid, PermissionSet>,
    categories: HashMap<Uuid, Category>,
    forums: HashMap<Uuid, Forum>,
    members: HashMap<Uuid, Member>,
}

/// Repository held entirely in memory. Backs the test suite, the CLI and
/// fixture-driven local runs.
#[derive(Default)]
pub struct MemoryForumRepository {
    state: RwLock<MemoryState>,
}

impl MemoryForumRepository {
    pub fn new(data: ForumData) -> Self {
        let state = MemoryState {
            permission_sets: data.permission_sets.into_iter().map(|s| (s.id, s)).collect(),
            categories: data.categories.into_iter().map(|c| (c.id, c)).collect(),
            forums: data.forums.into_iter().map(|f| (f.id, f)).collect(),
            members: data.members.into_iter().map(|m| (m.id, m)).collect(),
        };
        Self {
            state: RwLock::new(state),
        }
    }
}

impl MemoryState {
    fn site_of_forum(&self, forum: &Forum) -> Option<Uuid> {
        self.categories.get(&forum.category_id).map(|c| c.site_id)
    }
}

#[async_trait]
impl ForumRepository for MemoryForumRepository {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn forum(&self, site_id: Uuid, forum_id: Uuid) -> Result<Option<Forum>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .forums
            .get(&forum_id)
            .filter(|f| state.site_of_forum(f) == Some(site_id))
            .cloned())
    }

    async fn forums(&self, site_id: Uuid) -> Result<Vec<Forum>, DatabaseError> {
        let state = self.state.read().await;
        let mut forums: Vec<(i32, Forum)> = state
            .forums
            .values()
            .filter_map(|f| {
                let category = state.categories.get(&f.category_id)?;
                (category.site_id == site_id).then(|| (category.sort_order, f.clone()))
            })
            .collect();
        forums.sort_by(|(a_order, a), (b_order, b)| {
            a_order
                .cmp(b_order)
                .then(a.sort_order.cmp(&b.sort_order))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(forums.into_iter().map(|(_, f)| f).collect())
    }

    async fn category(
        &self,
        site_id: Uuid,
        category_id: Uuid,
    ) -> Result<Option<Category>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .categories
            .get(&category_id)
            .filter(|c| c.site_id == site_id)
            .cloned())
    }

    async fn categories(&self, site_id: Uuid) -> Result<Vec<Category>, DatabaseError> {
        let state = self.state.read().await;
        let mut categories: Vec<Category> = state
            .categories
            .values()
            .filter(|c| c.site_id == site_id)
            .cloned()
            .collect();
        categories.sort_by_key(|c| c.sort_order);
        Ok(categories)
    }

    async fn permission_set(
        &self,
        site_id: Uuid,
        permission_set_id: Uuid,
    ) -> Result<Option<PermissionSet>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .permission_sets
            .get(&permission_set_id)
            .filter(|s| s.site_id == site_id)
            .cloned())
    }

    async fn permission_sets(&self, site_id: Uuid) -> Result<Vec<PermissionSet>, DatabaseError> {
        let state = self.state.read().await;
        let mut sets: Vec<PermissionSet> = state
            .permission_sets
            .values()
            .filter(|s| s.site_id == site_id && !s.is_deleted())
            .cloned()
            .collect();
        sets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sets)
    }

    async fn save_permission_set(&self, set: &PermissionSet) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.permission_sets.get(&set.id) {
            if existing.site_id != set.site_id {
                return Err(DatabaseError::Conflict(format!(
                    "permission set {} belongs to another site",
                    set.id
                )));
            }
        }
        state.permission_sets.insert(set.id, set.clone());
        Ok(())
    }

    async fn is_permission_set_in_use(
        &self,
        site_id: Uuid,
        permission_set_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let state = self.state.read().await;
        let in_categories = state.categories.values().any(|c| {
            c.site_id == site_id && !c.is_deleted() && c.permission_set_id == Some(permission_set_id)
        });
        let in_forums = state.forums.values().any(|f| {
            state.site_of_forum(f) == Some(site_id)
                && !f.is_deleted()
                && f.permission_set_id == Some(permission_set_id)
        });
        Ok(in_categories || in_forums)
    }

    async fn member(&self, site_id: Uuid, member_id: Uuid) -> Result<Option<Member>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .members
            .get(&member_id)
            .filter(|m| m.site_id == site_id)
            .cloned())
    }
}
