//! Slot repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{DbSlot, SlotPatch};
use crate::store::{NewSlot, SlotStore};
use crate::{DbError, DbResult};

/// Doctor schedule slot repository over PostgreSQL
pub struct SlotRepo {
    pool: PgPool,
}

impl SlotRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotStore for SlotRepo {
    async fn create(&self, slot: NewSlot) -> DbResult<DbSlot> {
        let created = sqlx::query_as::<_, DbSlot>(
            r#"
            INSERT INTO slots (doctor_id, date, time, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, doctor_id, date, time, status, created_at, updated_at
            "#,
        )
        .bind(slot.doctor_id)
        .bind(slot.date)
        .bind(&slot.time)
        .bind(&slot.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.constraint() == Some("slots_doctor_id_fkey") {
                    return DbError::InvalidInput("Doctor does not exist".to_string());
                }
            }
            DbError::Query(e)
        })?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbSlot>> {
        let slot = sqlx::query_as::<_, DbSlot>(
            r#"
            SELECT id, doctor_id, date, time, status, created_at, updated_at
            FROM slots
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(slot)
    }

    async fn list(&self) -> DbResult<Vec<DbSlot>> {
        let slots = sqlx::query_as::<_, DbSlot>(
            r#"
            SELECT id, doctor_id, date, time, status, created_at, updated_at
            FROM slots
            ORDER BY date, time
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(slots)
    }

    async fn update(&self, id: Uuid, patch: SlotPatch) -> DbResult<DbSlot> {
        let slot = sqlx::query_as::<_, DbSlot>(
            r#"
            UPDATE slots
            SET date = COALESCE($2, date),
                time = COALESCE($3, time),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, doctor_id, date, time, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.date)
        .bind(patch.time)
        .bind(patch.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound("Slot not found".to_string()))?;

        Ok(slot)
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM slots WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("Slot not found".to_string()));
        }

        Ok(())
    }
}
