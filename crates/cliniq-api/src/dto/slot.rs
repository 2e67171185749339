//! Schedule slot DTOs

use chrono::{DateTime, NaiveDate, Utc};
use cliniq_db::DbSlot;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{validate_slot_status, TIME_RE};

/// Body for slot creation (doctor-level route)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlotRequest {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    #[validate(regex(path = *TIME_RE, message = "must be HH:MM"))]
    pub time: String,
    #[validate(custom(function = validate_slot_status))]
    pub status: String,
}

/// Slot patch; absent fields keep their value
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSlotRequest {
    pub date: Option<NaiveDate>,
    #[validate(regex(path = *TIME_RE, message = "must be HH:MM"))]
    pub time: Option<String>,
    #[validate(custom(function = validate_slot_status))]
    pub status: Option<String>,
}

/// Slot record as exposed to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbSlot> for SlotView {
    fn from(slot: DbSlot) -> Self {
        Self {
            id: slot.id,
            doctor_id: slot.doctor_id,
            date: slot.date,
            time: slot.time,
            status: slot.status,
            created_at: slot.created_at,
            updated_at: slot.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let ok = CreateSlotRequest {
            doctor_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            time: "09:30".to_string(),
            status: "free".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_time = CreateSlotRequest {
            time: "25:00".to_string(),
            ..ok.clone()
        };
        assert!(bad_time.validate().is_err());

        let bad_status = CreateSlotRequest {
            status: "taken".to_string(),
            ..ok
        };
        assert!(bad_status.validate().is_err());
    }
}
