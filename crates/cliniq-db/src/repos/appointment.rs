//! Appointment repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AppointmentPatch, DbAppointment};
use crate::store::{AppointmentStore, NewAppointment};
use crate::{DbError, DbResult};

/// Appointment repository over PostgreSQL
pub struct AppointmentRepo {
    pool: PgPool,
}

impl AppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentStore for AppointmentRepo {
    async fn create(&self, appointment: NewAppointment) -> DbResult<DbAppointment> {
        let created = sqlx::query_as::<_, DbAppointment>(
            r#"
            INSERT INTO appointments (patient_id, slot_id, complaint, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, patient_id, slot_id, complaint, status, created_at, updated_at
            "#,
        )
        .bind(appointment.patient_id)
        .bind(appointment.slot_id)
        .bind(&appointment.complaint)
        .bind(&appointment.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                match db_err.constraint() {
                    Some("appointments_patient_id_fkey") => {
                        return DbError::InvalidInput("Patient does not exist".to_string())
                    }
                    Some("appointments_slot_id_fkey") => {
                        return DbError::InvalidInput("Slot does not exist".to_string())
                    }
                    _ => {}
                }
            }
            DbError::Query(e)
        })?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbAppointment>> {
        let appointment = sqlx::query_as::<_, DbAppointment>(
            r#"
            SELECT id, patient_id, slot_id, complaint, status, created_at, updated_at
            FROM appointments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }

    async fn list(&self) -> DbResult<Vec<DbAppointment>> {
        let appointments = sqlx::query_as::<_, DbAppointment>(
            r#"
            SELECT id, patient_id, slot_id, complaint, status, created_at, updated_at
            FROM appointments
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    async fn update(&self, id: Uuid, patch: AppointmentPatch) -> DbResult<DbAppointment> {
        let appointment = sqlx::query_as::<_, DbAppointment>(
            r#"
            UPDATE appointments
            SET complaint = COALESCE($2, complaint),
                status = COALESCE($3, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, patient_id, slot_id, complaint, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.complaint)
        .bind(patch.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound("Appointment not found".to_string()))?;

        Ok(appointment)
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("Appointment not found".to_string()));
        }

        Ok(())
    }
}
