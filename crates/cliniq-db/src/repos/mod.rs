//! PostgreSQL repositories

mod admin;
mod appointment;
mod doctor;
mod patient;
mod slot;

pub use admin::AdminRepo;
pub use appointment::AppointmentRepo;
pub use doctor::DoctorRepo;
pub use patient::PatientRepo;
pub use slot::SlotRepo;
