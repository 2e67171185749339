//! Appointment DTOs

use chrono::{DateTime, Utc};
use cliniq_db::DbAppointment;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validate_appointment_status;

/// Body for booking an appointment against a slot
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub slot_id: Uuid,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub complaint: String,
    #[validate(custom(function = validate_appointment_status))]
    pub status: String,
}

/// Appointment patch; absent fields keep their value
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub complaint: Option<String>,
    #[validate(custom(function = validate_appointment_status))]
    pub status: Option<String>,
}

/// Appointment record as exposed to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub slot_id: Uuid,
    pub complaint: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbAppointment> for AppointmentView {
    fn from(appointment: DbAppointment) -> Self {
        Self {
            id: appointment.id,
            patient_id: appointment.patient_id,
            slot_id: appointment.slot_id,
            complaint: appointment.complaint,
            status: appointment.status,
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let ok = CreateAppointmentRequest {
            patient_id: Uuid::new_v4(),
            slot_id: Uuid::new_v4(),
            complaint: "headache".to_string(),
            status: "pending".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_status = CreateAppointmentRequest {
            status: "scheduled".to_string(),
            ..ok
        };
        assert!(bad_status.validate().is_err());
    }
}
