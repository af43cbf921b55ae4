use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{CategoryRow, ForumRow, MemberRow, PermissionRow, PermissionSetRow};
use crate::domain::{Category, Forum, Member, PermissionSet};

/// Identifier-based access to the forum entities the authorization gate needs.
///
/// Every lookup is scoped by site. Lookups return entities regardless of
/// status; callers decide what a deleted entity means for them. The one
/// exception is `permission_sets`, which lists only live sets.
#[async_trait]
pub trait ForumRepository: Send + Sync {
    /// Connectivity check used by the health endpoint
    async fn ping(&self) -> Result<(), DatabaseError>;

    async fn forum(&self, site_id: Uuid, forum_id: Uuid) -> Result<Option<Forum>, DatabaseError>;

    async fn forums(&self, site_id: Uuid) -> Result<Vec<Forum>, DatabaseError>;

    async fn category(
        &self,
        site_id: Uuid,
        category_id: Uuid,
    ) -> Result<Option<Category>, DatabaseError>;

    async fn categories(&self, site_id: Uuid) -> Result<Vec<Category>, DatabaseError>;

    async fn permission_set(
        &self,
        site_id: Uuid,
        permission_set_id: Uuid,
    ) -> Result<Option<PermissionSet>, DatabaseError>;

    async fn permission_sets(&self, site_id: Uuid) -> Result<Vec<PermissionSet>, DatabaseError>;

    /// Insert or replace a permission set together with its entries.
    /// Fails with `DatabaseError::Conflict` when the id is taken by another site.
    async fn save_permission_set(&self, set: &PermissionSet) -> Result<(), DatabaseError>;

    /// True when a live category or forum of the site references the set
    async fn is_permission_set_in_use(
        &self,
        site_id: Uuid,
        permission_set_id: Uuid,
    ) -> Result<bool, DatabaseError>;

    async fn member(&self, site_id: Uuid, member_id: Uuid) -> Result<Option<Member>, DatabaseError>;
}

/// PostgreSQL-backed repository (see `sql/schema.sql`)
pub struct PgForumRepository {
    pool: PgPool,
}

impl PgForumRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_permissions(&self, ids: &[Uuid]) -> Result<Vec<PermissionRow>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let rows = sqlx::query_as::<_, PermissionRow>(
            "SELECT permission_set_id, role_id, permission_type, is_allowed, position
             FROM permissions
             WHERE permission_set_id = ANY($1)
             ORDER BY permission_set_id, position",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl ForumRepository for PgForumRepository {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn forum(&self, site_id: Uuid, forum_id: Uuid) -> Result<Option<Forum>, DatabaseError> {
        let row = sqlx::query_as::<_, ForumRow>(
            "SELECT f.id, f.category_id, f.name, f.slug, f.sort_order, f.permission_set_id, f.status
             FROM forums f
             JOIN categories c ON c.id = f.category_id
             WHERE f.id = $1 AND c.site_id = $2",
        )
        .bind(forum_id)
        .bind(site_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Forum::from))
    }

    async fn forums(&self, site_id: Uuid) -> Result<Vec<Forum>, DatabaseError> {
        let rows = sqlx::query_as::<_, ForumRow>(
            "SELECT f.id, f.category_id, f.name, f.slug, f.sort_order, f.permission_set_id, f.status
             FROM forums f
             JOIN categories c ON c.id = f.category_id
             WHERE c.site_id = $1
             ORDER BY c.sort_order, f.sort_order, f.name",
        )
        .bind(site_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Forum::from).collect())
    }

    async fn category(
        &self,
        site_id: Uuid,
        category_id: Uuid,
    ) -> Result<Option<Category>, DatabaseError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, site_id, name, sort_order, permission_set_id, status
             FROM categories
             WHERE id = $1 AND site_id = $2",
        )
        .bind(category_id)
        .bind(site_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Category::from))
    }

    async fn categories(&self, site_id: Uuid) -> Result<Vec<Category>, DatabaseError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, site_id, name, sort_order, permission_set_id, status
             FROM categories
             WHERE site_id = $1
             ORDER BY sort_order",
        )
        .bind(site_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn permission_set(
        &self,
        site_id: Uuid,
        permission_set_id: Uuid,
    ) -> Result<Option<PermissionSet>, DatabaseError> {
        let header = sqlx::query_as::<_, PermissionSetRow>(
            "SELECT id, site_id, name, status
             FROM permission_sets
             WHERE id = $1 AND site_id = $2",
        )
        .bind(permission_set_id)
        .bind(site_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let rows = self.load_permissions(&[header.id]).await?;
        header.into_permission_set(rows).map(Some)
    }

    async fn permission_sets(&self, site_id: Uuid) -> Result<Vec<PermissionSet>, DatabaseError> {
        let headers = sqlx::query_as::<_, PermissionSetRow>(
            "SELECT id, site_id, name, status
             FROM permission_sets
             WHERE site_id = $1 AND status <> 'deleted'
             ORDER BY name",
        )
        .bind(site_id)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = headers.iter().map(|h| h.id).collect();
        let mut rows = self.load_permissions(&ids).await?;

        headers
            .into_iter()
            .map(|header| {
                let (own, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut rows)
                    .into_iter()
                    .partition(|r| r.permission_set_id == header.id);
                rows = rest;
                header.into_permission_set(own)
            })
            .collect()
    }

    async fn save_permission_set(&self, set: &PermissionSet) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // The upsert only touches rows of the same site
        let upserted = sqlx::query(
            "INSERT INTO permission_sets (id, site_id, name, status)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, status = EXCLUDED.status
             WHERE permission_sets.site_id = EXCLUDED.site_id",
        )
        .bind(set.id)
        .bind(set.site_id)
        .bind(&set.name)
        .bind(set.status.as_str())
        .execute(&mut *tx)
        .await?;

        if upserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DatabaseError::Conflict(format!(
                "permission set {} belongs to another site",
                set.id
            )));
        }

        sqlx::query("DELETE FROM permissions WHERE permission_set_id = $1")
            .bind(set.id)
            .execute(&mut *tx)
            .await?;

        for (position, command) in set.permissions().iter().enumerate() {
            sqlx::query(
                "INSERT INTO permissions (permission_set_id, role_id, permission_type, is_allowed, position)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(set.id)
            .bind(command.role_id.as_str())
            .bind(command.permission_type.as_str())
            .bind(command.is_allowed)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn is_permission_set_in_use(
        &self,
        site_id: Uuid,
        permission_set_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM categories
                 WHERE site_id = $1 AND permission_set_id = $2 AND status <> 'deleted')
              + (SELECT COUNT(*) FROM forums f JOIN categories c ON c.id = f.category_id
                 WHERE c.site_id = $1 AND f.permission_set_id = $2 AND f.status <> 'deleted')",
        )
        .bind(site_id)
        .bind(permission_set_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0 > 0)
    }

    async fn member(&self, site_id: Uuid, member_id: Uuid) -> Result<Option<Member>, DatabaseError> {
        let row = sqlx::query_as::<_, MemberRow>(
            "SELECT id, site_id, display_name, roles, status
             FROM members
             WHERE id = $1 AND site_id = $2",
        )
        .bind(member_id)
        .bind(site_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Member::from))
    }
}
