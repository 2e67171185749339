//! Patient repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{DbPatient, PatientPatch};
use crate::store::{NewPatient, PatientStore};
use crate::{DbError, DbResult};

/// Patient repository over PostgreSQL
pub struct PatientRepo {
    pool: PgPool,
}

impl PatientRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatientStore for PatientRepo {
    async fn create(&self, patient: NewPatient) -> DbResult<DbPatient> {
        let created = sqlx::query_as::<_, DbPatient>(
            r#"
            INSERT INTO patients (phone_number, full_name, password_hash, address, age, gender)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, phone_number, full_name, password_hash, address, age, gender,
                      created_at, updated_at
            "#,
        )
        .bind(&patient.phone_number)
        .bind(&patient.full_name)
        .bind(&patient.password_hash)
        .bind(&patient.address)
        .bind(patient.age)
        .bind(&patient.gender)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.constraint() == Some("patients_phone_number_key") {
                    return DbError::Duplicate(format!(
                        "Phone number {} already exists",
                        patient.phone_number
                    ));
                }
            }
            DbError::Query(e)
        })?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbPatient>> {
        let patient = sqlx::query_as::<_, DbPatient>(
            r#"
            SELECT id, phone_number, full_name, password_hash, address, age, gender,
                   created_at, updated_at
            FROM patients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(patient)
    }

    async fn find_by_phone(&self, phone_number: &str) -> DbResult<Option<DbPatient>> {
        let patient = sqlx::query_as::<_, DbPatient>(
            r#"
            SELECT id, phone_number, full_name, password_hash, address, age, gender,
                   created_at, updated_at
            FROM patients
            WHERE phone_number = $1
            "#,
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(patient)
    }

    async fn list(&self) -> DbResult<Vec<DbPatient>> {
        let patients = sqlx::query_as::<_, DbPatient>(
            r#"
            SELECT id, phone_number, full_name, password_hash, address, age, gender,
                   created_at, updated_at
            FROM patients
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(patients)
    }

    async fn update(&self, id: Uuid, patch: PatientPatch) -> DbResult<DbPatient> {
        let patient = sqlx::query_as::<_, DbPatient>(
            r#"
            UPDATE patients
            SET phone_number = COALESCE($2, phone_number),
                full_name = COALESCE($3, full_name),
                password_hash = COALESCE($4, password_hash),
                address = COALESCE($5, address),
                age = COALESCE($6, age),
                gender = COALESCE($7, gender),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, phone_number, full_name, password_hash, address, age, gender,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.phone_number)
        .bind(patch.full_name)
        .bind(patch.password_hash)
        .bind(patch.address)
        .bind(patch.age)
        .bind(patch.gender)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.constraint() == Some("patients_phone_number_key") {
                    return DbError::Duplicate("Phone number already exists".to_string());
                }
            }
            DbError::Query(e)
        })?
        .ok_or_else(|| DbError::NotFound("Patient not found".to_string()))?;

        Ok(patient)
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("Patient not found".to_string()));
        }

        Ok(())
    }
}
