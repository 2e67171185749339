//! Doctor repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{DbDoctor, DoctorPatch};
use crate::store::{DoctorStore, NewDoctor};
use crate::{DbError, DbResult};

/// Doctor repository over PostgreSQL
pub struct DoctorRepo {
    pool: PgPool,
}

impl DoctorRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DoctorStore for DoctorRepo {
    async fn create(&self, doctor: NewDoctor) -> DbResult<DbDoctor> {
        let created = sqlx::query_as::<_, DbDoctor>(
            r#"
            INSERT INTO doctors (phone_number, full_name, specialty)
            VALUES ($1, $2, $3)
            RETURNING id, phone_number, full_name, specialty, created_at, updated_at
            "#,
        )
        .bind(&doctor.phone_number)
        .bind(&doctor.full_name)
        .bind(&doctor.specialty)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.constraint() == Some("doctors_phone_number_key") {
                    return DbError::Duplicate(format!(
                        "Phone number {} already exists",
                        doctor.phone_number
                    ));
                }
            }
            DbError::Query(e)
        })?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbDoctor>> {
        let doctor = sqlx::query_as::<_, DbDoctor>(
            r#"
            SELECT id, phone_number, full_name, specialty, created_at, updated_at
            FROM doctors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(doctor)
    }

    async fn find_by_phone(&self, phone_number: &str) -> DbResult<Option<DbDoctor>> {
        let doctor = sqlx::query_as::<_, DbDoctor>(
            r#"
            SELECT id, phone_number, full_name, specialty, created_at, updated_at
            FROM doctors
            WHERE phone_number = $1
            "#,
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(doctor)
    }

    async fn list(&self) -> DbResult<Vec<DbDoctor>> {
        let doctors = sqlx::query_as::<_, DbDoctor>(
            r#"
            SELECT id, phone_number, full_name, specialty, created_at, updated_at
            FROM doctors
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(doctors)
    }

    async fn update(&self, id: Uuid, patch: DoctorPatch) -> DbResult<DbDoctor> {
        let doctor = sqlx::query_as::<_, DbDoctor>(
            r#"
            UPDATE doctors
            SET phone_number = COALESCE($2, phone_number),
                full_name = COALESCE($3, full_name),
                specialty = COALESCE($4, specialty),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, phone_number, full_name, specialty, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.phone_number)
        .bind(patch.full_name)
        .bind(patch.specialty)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.constraint() == Some("doctors_phone_number_key") {
                    return DbError::Duplicate("Phone number already exists".to_string());
                }
            }
            DbError::Query(e)
        })?
        .ok_or_else(|| DbError::NotFound("Doctor not found".to_string()))?;

        Ok(doctor)
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM doctors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("Doctor not found".to_string()));
        }

        Ok(())
    }
}
