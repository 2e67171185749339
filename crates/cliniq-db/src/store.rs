//! Store contracts
//!
//! Async traits over the clinic record stores. Two implementations exist:
//! the PostgreSQL repositories in [`crate::repos`] and the in-memory store in
//! [`crate::memory`] used by tests and local development.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::{
    AdminPatch, AppointmentPatch, DbAdmin, DbAppointment, DbDoctor, DbPatient, DbSlot,
    DoctorPatch, PatientPatch, SlotPatch,
};

/// Fields for a new admin record
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

/// Fields for a new doctor record
#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub phone_number: String,
    pub full_name: String,
    pub specialty: String,
}

/// Fields for a new patient record
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub phone_number: String,
    pub full_name: String,
    pub password_hash: String,
    pub address: String,
    pub age: i32,
    pub gender: String,
}

/// Fields for a new slot record
#[derive(Debug, Clone)]
pub struct NewSlot {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub status: String,
}

/// Fields for a new appointment record
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub slot_id: Uuid,
    pub complaint: String,
    pub status: String,
}

/// Admin credential and profile store
#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn create(&self, admin: NewAdmin) -> DbResult<DbAdmin>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbAdmin>>;
    async fn find_by_username(&self, username: &str) -> DbResult<Option<DbAdmin>>;
    /// At most one superadmin exists; creation enforces this.
    async fn find_superadmin(&self) -> DbResult<Option<DbAdmin>>;
    async fn list(&self) -> DbResult<Vec<DbAdmin>>;
    async fn update(&self, id: Uuid, patch: AdminPatch) -> DbResult<DbAdmin>;
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}

/// Doctor profile store
#[async_trait]
pub trait DoctorStore: Send + Sync {
    async fn create(&self, doctor: NewDoctor) -> DbResult<DbDoctor>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbDoctor>>;
    async fn find_by_phone(&self, phone_number: &str) -> DbResult<Option<DbDoctor>>;
    async fn list(&self) -> DbResult<Vec<DbDoctor>>;
    async fn update(&self, id: Uuid, patch: DoctorPatch) -> DbResult<DbDoctor>;
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}

/// Patient credential and profile store
#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn create(&self, patient: NewPatient) -> DbResult<DbPatient>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbPatient>>;
    async fn find_by_phone(&self, phone_number: &str) -> DbResult<Option<DbPatient>>;
    async fn list(&self) -> DbResult<Vec<DbPatient>>;
    async fn update(&self, id: Uuid, patch: PatientPatch) -> DbResult<DbPatient>;
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}

/// Doctor schedule slot store
#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn create(&self, slot: NewSlot) -> DbResult<DbSlot>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbSlot>>;
    async fn list(&self) -> DbResult<Vec<DbSlot>>;
    async fn update(&self, id: Uuid, patch: SlotPatch) -> DbResult<DbSlot>;
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}

/// Appointment store
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn create(&self, appointment: NewAppointment) -> DbResult<DbAppointment>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbAppointment>>;
    async fn list(&self) -> DbResult<Vec<DbAppointment>>;
    async fn update(&self, id: Uuid, patch: AppointmentPatch) -> DbResult<DbAppointment>;
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}
