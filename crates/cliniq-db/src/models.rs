//! Database models
//!
//! Row types returned by the repositories. Role, status, and gender columns
//! are stored as text and constrained by CHECK clauses in the migrations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Admin account. `role` is either `superadmin` or `admin`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DbAdmin {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Doctor profile. Doctors have no password and sign in via OTP.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DbDoctor {
    pub id: Uuid,
    pub phone_number: String,
    pub full_name: String,
    pub specialty: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Patient account. `gender` is `male` or `female`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DbPatient {
    pub id: Uuid,
    pub phone_number: String,
    pub full_name: String,
    pub password_hash: String,
    pub address: String,
    pub age: i32,
    pub gender: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Doctor schedule slot. `time` is "HH:MM"; `status` is `free` or `busy`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DbSlot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Appointment booked by a patient against a slot.
/// `status` is `pending`, `completed`, or `rejected`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub slot_id: Uuid,
    pub complaint: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for an admin. `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct AdminPatch {
    pub username: Option<String>,
    pub password_hash: Option<String>,
}

/// Partial update for a doctor.
#[derive(Debug, Clone, Default)]
pub struct DoctorPatch {
    pub phone_number: Option<String>,
    pub full_name: Option<String>,
    pub specialty: Option<String>,
}

/// Partial update for a patient.
#[derive(Debug, Clone, Default)]
pub struct PatientPatch {
    pub phone_number: Option<String>,
    pub full_name: Option<String>,
    pub password_hash: Option<String>,
    pub address: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

/// Partial update for a slot.
#[derive(Debug, Clone, Default)]
pub struct SlotPatch {
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub status: Option<String>,
}

/// Partial update for an appointment.
#[derive(Debug, Clone, Default)]
pub struct AppointmentPatch {
    pub complaint: Option<String>,
    pub status: Option<String>,
}
