//! In-memory store
//!
//! Implements every store trait over `parking_lot` guarded maps. Used by the
//! API integration tests and for local development without PostgreSQL.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::{
    AdminPatch, AppointmentPatch, DbAdmin, DbAppointment, DbDoctor, DbPatient, DbSlot,
    DoctorPatch, PatientPatch, SlotPatch,
};
use crate::store::{
    AdminStore, AppointmentStore, DoctorStore, NewAdmin, NewAppointment, NewDoctor, NewPatient,
    NewSlot, PatientStore, SlotStore,
};
use crate::{DbError, DbResult};

/// In-memory implementation of all clinic stores
#[derive(Default)]
pub struct MemoryStore {
    admins: RwLock<HashMap<Uuid, DbAdmin>>,
    doctors: RwLock<HashMap<Uuid, DbDoctor>>,
    patients: RwLock<HashMap<Uuid, DbPatient>>,
    slots: RwLock<HashMap<Uuid, DbSlot>>,
    appointments: RwLock<HashMap<Uuid, DbAppointment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdminStore for MemoryStore {
    async fn create(&self, admin: NewAdmin) -> DbResult<DbAdmin> {
        let mut admins = self.admins.write();
        if admins.values().any(|a| a.username == admin.username) {
            return Err(DbError::Duplicate(format!(
                "Username {} already exists",
                admin.username
            )));
        }
        let now = Utc::now();
        let created = DbAdmin {
            id: Uuid::new_v4(),
            username: admin.username,
            password_hash: admin.password_hash,
            role: admin.role,
            created_at: now,
            updated_at: now,
        };
        admins.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbAdmin>> {
        Ok(self.admins.read().get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> DbResult<Option<DbAdmin>> {
        Ok(self
            .admins
            .read()
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn find_superadmin(&self) -> DbResult<Option<DbAdmin>> {
        Ok(self
            .admins
            .read()
            .values()
            .find(|a| a.role == "superadmin")
            .cloned())
    }

    async fn list(&self) -> DbResult<Vec<DbAdmin>> {
        let mut admins: Vec<_> = self.admins.read().values().cloned().collect();
        admins.sort_by_key(|a| a.created_at);
        Ok(admins)
    }

    async fn update(&self, id: Uuid, patch: AdminPatch) -> DbResult<DbAdmin> {
        let mut admins = self.admins.write();
        if let Some(ref username) = patch.username {
            if admins
                .values()
                .any(|a| a.id != id && &a.username == username)
            {
                return Err(DbError::Duplicate("Username already exists".to_string()));
            }
        }
        let admin = admins
            .get_mut(&id)
            .ok_or_else(|| DbError::NotFound("Admin not found".to_string()))?;
        if let Some(username) = patch.username {
            admin.username = username;
        }
        if let Some(password_hash) = patch.password_hash {
            admin.password_hash = password_hash;
        }
        admin.updated_at = Utc::now();
        Ok(admin.clone())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.admins
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::NotFound("Admin not found".to_string()))
    }
}

#[async_trait]
impl DoctorStore for MemoryStore {
    async fn create(&self, doctor: NewDoctor) -> DbResult<DbDoctor> {
        let mut doctors = self.doctors.write();
        if doctors
            .values()
            .any(|d| d.phone_number == doctor.phone_number)
        {
            return Err(DbError::Duplicate(format!(
                "Phone number {} already exists",
                doctor.phone_number
            )));
        }
        let now = Utc::now();
        let created = DbDoctor {
            id: Uuid::new_v4(),
            phone_number: doctor.phone_number,
            full_name: doctor.full_name,
            specialty: doctor.specialty,
            created_at: now,
            updated_at: now,
        };
        doctors.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbDoctor>> {
        Ok(self.doctors.read().get(&id).cloned())
    }

    async fn find_by_phone(&self, phone_number: &str) -> DbResult<Option<DbDoctor>> {
        Ok(self
            .doctors
            .read()
            .values()
            .find(|d| d.phone_number == phone_number)
            .cloned())
    }

    async fn list(&self) -> DbResult<Vec<DbDoctor>> {
        let mut doctors: Vec<_> = self.doctors.read().values().cloned().collect();
        doctors.sort_by_key(|d| d.created_at);
        Ok(doctors)
    }

    async fn update(&self, id: Uuid, patch: DoctorPatch) -> DbResult<DbDoctor> {
        let mut doctors = self.doctors.write();
        if let Some(ref phone) = patch.phone_number {
            if doctors.values().any(|d| d.id != id && &d.phone_number == phone) {
                return Err(DbError::Duplicate("Phone number already exists".to_string()));
            }
        }
        let doctor = doctors
            .get_mut(&id)
            .ok_or_else(|| DbError::NotFound("Doctor not found".to_string()))?;
        if let Some(phone_number) = patch.phone_number {
            doctor.phone_number = phone_number;
        }
        if let Some(full_name) = patch.full_name {
            doctor.full_name = full_name;
        }
        if let Some(specialty) = patch.specialty {
            doctor.specialty = specialty;
        }
        doctor.updated_at = Utc::now();
        Ok(doctor.clone())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.doctors
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::NotFound("Doctor not found".to_string()))
    }
}

#[async_trait]
impl PatientStore for MemoryStore {
    async fn create(&self, patient: NewPatient) -> DbResult<DbPatient> {
        let mut patients = self.patients.write();
        if patients
            .values()
            .any(|p| p.phone_number == patient.phone_number)
        {
            return Err(DbError::Duplicate(format!(
                "Phone number {} already exists",
                patient.phone_number
            )));
        }
        let now = Utc::now();
        let created = DbPatient {
            id: Uuid::new_v4(),
            phone_number: patient.phone_number,
            full_name: patient.full_name,
            password_hash: patient.password_hash,
            address: patient.address,
            age: patient.age,
            gender: patient.gender,
            created_at: now,
            updated_at: now,
        };
        patients.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbPatient>> {
        Ok(self.patients.read().get(&id).cloned())
    }

    async fn find_by_phone(&self, phone_number: &str) -> DbResult<Option<DbPatient>> {
        Ok(self
            .patients
            .read()
            .values()
            .find(|p| p.phone_number == phone_number)
            .cloned())
    }

    async fn list(&self) -> DbResult<Vec<DbPatient>> {
        let mut patients: Vec<_> = self.patients.read().values().cloned().collect();
        patients.sort_by_key(|p| p.created_at);
        Ok(patients)
    }

    async fn update(&self, id: Uuid, patch: PatientPatch) -> DbResult<DbPatient> {
        let mut patients = self.patients.write();
        if let Some(ref phone) = patch.phone_number {
            if patients.values().any(|p| p.id != id && &p.phone_number == phone) {
                return Err(DbError::Duplicate("Phone number already exists".to_string()));
            }
        }
        let patient = patients
            .get_mut(&id)
            .ok_or_else(|| DbError::NotFound("Patient not found".to_string()))?;
        if let Some(phone_number) = patch.phone_number {
            patient.phone_number = phone_number;
        }
        if let Some(full_name) = patch.full_name {
            patient.full_name = full_name;
        }
        if let Some(password_hash) = patch.password_hash {
            patient.password_hash = password_hash;
        }
        if let Some(address) = patch.address {
            patient.address = address;
        }
        if let Some(age) = patch.age {
            patient.age = age;
        }
        if let Some(gender) = patch.gender {
            patient.gender = gender;
        }
        patient.updated_at = Utc::now();
        Ok(patient.clone())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.patients
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::NotFound("Patient not found".to_string()))
    }
}

#[async_trait]
impl SlotStore for MemoryStore {
    async fn create(&self, slot: NewSlot) -> DbResult<DbSlot> {
        if !self.doctors.read().contains_key(&slot.doctor_id) {
            return Err(DbError::InvalidInput("Doctor does not exist".to_string()));
        }
        let now = Utc::now();
        let created = DbSlot {
            id: Uuid::new_v4(),
            doctor_id: slot.doctor_id,
            date: slot.date,
            time: slot.time,
            status: slot.status,
            created_at: now,
            updated_at: now,
        };
        self.slots.write().insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbSlot>> {
        Ok(self.slots.read().get(&id).cloned())
    }

    async fn list(&self) -> DbResult<Vec<DbSlot>> {
        let mut slots: Vec<_> = self.slots.read().values().cloned().collect();
        slots.sort_by(|a, b| (a.date, a.time.clone()).cmp(&(b.date, b.time.clone())));
        Ok(slots)
    }

    async fn update(&self, id: Uuid, patch: SlotPatch) -> DbResult<DbSlot> {
        let mut slots = self.slots.write();
        let slot = slots
            .get_mut(&id)
            .ok_or_else(|| DbError::NotFound("Slot not found".to_string()))?;
        if let Some(date) = patch.date {
            slot.date = date;
        }
        if let Some(time) = patch.time {
            slot.time = time;
        }
        if let Some(status) = patch.status {
            slot.status = status;
        }
        slot.updated_at = Utc::now();
        Ok(slot.clone())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.slots
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::NotFound("Slot not found".to_string()))
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn create(&self, appointment: NewAppointment) -> DbResult<DbAppointment> {
        if !self.patients.read().contains_key(&appointment.patient_id) {
            return Err(DbError::InvalidInput("Patient does not exist".to_string()));
        }
        if !self.slots.read().contains_key(&appointment.slot_id) {
            return Err(DbError::InvalidInput("Slot does not exist".to_string()));
        }
        let now = Utc::now();
        let created = DbAppointment {
            id: Uuid::new_v4(),
            patient_id: appointment.patient_id,
            slot_id: appointment.slot_id,
            complaint: appointment.complaint,
            status: appointment.status,
            created_at: now,
            updated_at: now,
        };
        self.appointments
            .write()
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbAppointment>> {
        Ok(self.appointments.read().get(&id).cloned())
    }

    async fn list(&self) -> DbResult<Vec<DbAppointment>> {
        let mut appointments: Vec<_> = self.appointments.read().values().cloned().collect();
        appointments.sort_by_key(|a| a.created_at);
        Ok(appointments)
    }

    async fn update(&self, id: Uuid, patch: AppointmentPatch) -> DbResult<DbAppointment> {
        let mut appointments = self.appointments.write();
        let appointment = appointments
            .get_mut(&id)
            .ok_or_else(|| DbError::NotFound("Appointment not found".to_string()))?;
        if let Some(complaint) = patch.complaint {
            appointment.complaint = complaint;
        }
        if let Some(status) = patch.status {
            appointment.status = status;
        }
        appointment.updated_at = Utc::now();
        Ok(appointment.clone())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.appointments
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::NotFound("Appointment not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_admin(username: &str) -> NewAdmin {
        NewAdmin {
            username: username.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: "admin".to_string(),
        }
    }

    #[tokio::test]
    async fn test_admin_duplicate_username() {
        let store = MemoryStore::new();
        AdminStore::create(&store, sample_admin("akmal")).await.unwrap();

        let result = AdminStore::create(&store, sample_admin("akmal")).await;
        assert!(matches!(result, Err(DbError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_find_superadmin() {
        let store = MemoryStore::new();
        assert!(store.find_superadmin().await.unwrap().is_none());

        let mut admin = sample_admin("boss");
        admin.role = "superadmin".to_string();
        AdminStore::create(&store, admin).await.unwrap();

        let found = store.find_superadmin().await.unwrap().unwrap();
        assert_eq!(found.username, "boss");
    }

    #[tokio::test]
    async fn test_update_missing_admin() {
        let store = MemoryStore::new();
        let result = AdminStore::update(&store, Uuid::new_v4(), AdminPatch::default()).await;
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_slot_requires_doctor() {
        let store = MemoryStore::new();
        let result = SlotStore::create(
            &store,
            NewSlot {
                doctor_id: Uuid::new_v4(),
                date: chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                time: "09:30".to_string(),
                status: "free".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(DbError::InvalidInput(_))));
    }
}
