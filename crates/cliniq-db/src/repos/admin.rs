//! Admin repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AdminPatch, DbAdmin};
use crate::store::{AdminStore, NewAdmin};
use crate::{DbError, DbResult};

/// Admin repository over PostgreSQL
pub struct AdminRepo {
    pool: PgPool,
}

impl AdminRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminStore for AdminRepo {
    async fn create(&self, admin: NewAdmin) -> DbResult<DbAdmin> {
        let created = sqlx::query_as::<_, DbAdmin>(
            r#"
            INSERT INTO admins (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(&admin.username)
        .bind(&admin.password_hash)
        .bind(&admin.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.constraint() == Some("admins_username_key") {
                    return DbError::Duplicate(format!(
                        "Username {} already exists",
                        admin.username
                    ));
                }
            }
            DbError::Query(e)
        })?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbAdmin>> {
        let admin = sqlx::query_as::<_, DbAdmin>(
            r#"
            SELECT id, username, password_hash, role, created_at, updated_at
            FROM admins
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn find_by_username(&self, username: &str) -> DbResult<Option<DbAdmin>> {
        let admin = sqlx::query_as::<_, DbAdmin>(
            r#"
            SELECT id, username, password_hash, role, created_at, updated_at
            FROM admins
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn find_superadmin(&self) -> DbResult<Option<DbAdmin>> {
        let admin = sqlx::query_as::<_, DbAdmin>(
            r#"
            SELECT id, username, password_hash, role, created_at, updated_at
            FROM admins
            WHERE role = 'superadmin'
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn list(&self) -> DbResult<Vec<DbAdmin>> {
        let admins = sqlx::query_as::<_, DbAdmin>(
            r#"
            SELECT id, username, password_hash, role, created_at, updated_at
            FROM admins
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(admins)
    }

    async fn update(&self, id: Uuid, patch: AdminPatch) -> DbResult<DbAdmin> {
        let admin = sqlx::query_as::<_, DbAdmin>(
            r#"
            UPDATE admins
            SET username = COALESCE($2, username),
                password_hash = COALESCE($3, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.username)
        .bind(patch.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.constraint() == Some("admins_username_key") {
                    return DbError::Duplicate("Username already exists".to_string());
                }
            }
            DbError::Query(e)
        })?
        .ok_or_else(|| DbError::NotFound("Admin not found".to_string()))?;

        Ok(admin)
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("Admin not found".to_string()));
        }

        Ok(())
    }
}
