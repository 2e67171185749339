//! OpenAPI documentation

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::dto;
use crate::error::ErrorResponse;
use crate::handlers;

/// Cliniq API documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cliniq API",
        description = "Clinic appointment booking backend: multi-role authentication with OTP verification, dual-token sessions, and scheduling CRUD.",
        version = "1.0.0",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development")
    ),
    paths(
        // Health
        handlers::health::health_check,
        // Admin
        handlers::admin::create_superadmin,
        handlers::admin::create_admin,
        handlers::admin::signin,
        handlers::admin::confirm_signin,
        handlers::admin::get_access_token,
        handlers::admin::signout,
        handlers::admin::list_admins,
        handlers::admin::get_admin,
        handlers::admin::update_admin,
        handlers::admin::delete_admin,
        // Doctor
        handlers::doctor::create_doctor,
        handlers::doctor::signin,
        handlers::doctor::confirm_signin,
        handlers::doctor::get_access_token,
        handlers::doctor::signout,
        handlers::doctor::list_doctors,
        handlers::doctor::get_doctor,
        handlers::doctor::update_doctor,
        handlers::doctor::delete_doctor,
        // Patient
        handlers::patient::signup,
        handlers::patient::signin,
        handlers::patient::get_access_token,
        handlers::patient::signout,
        handlers::patient::list_patients,
        handlers::patient::get_patient,
        handlers::patient::update_patient,
        handlers::patient::delete_patient,
        // Slot
        handlers::slot::create_slot,
        handlers::slot::list_slots,
        handlers::slot::get_slot,
        handlers::slot::update_slot,
        handlers::slot::delete_slot,
        // Appointment
        handlers::appointment::create_appointment,
        handlers::appointment::list_appointments,
        handlers::appointment::get_appointment,
        handlers::appointment::update_appointment,
        handlers::appointment::delete_appointment,
    ),
    components(
        schemas(
            ErrorResponse,
            handlers::health::HealthResponse,
            // Admin
            dto::CreateAdminRequest,
            dto::AdminSigninRequest,
            dto::ConfirmAdminSigninRequest,
            dto::UpdateAdminRequest,
            dto::AdminView,
            // Doctor
            dto::CreateDoctorRequest,
            dto::DoctorSigninRequest,
            dto::ConfirmDoctorSigninRequest,
            dto::UpdateDoctorRequest,
            dto::DoctorView,
            // Patient
            dto::SignupPatientRequest,
            dto::PatientSigninRequest,
            dto::UpdatePatientRequest,
            dto::PatientView,
            // Slot
            dto::CreateSlotRequest,
            dto::UpdateSlotRequest,
            dto::SlotView,
            // Appointment
            dto::CreateAppointmentRequest,
            dto::UpdateAppointmentRequest,
            dto::AppointmentView,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Admin", description = "Admin accounts and two-step OTP auth"),
        (name = "Doctor", description = "Doctor profiles and two-step OTP auth"),
        (name = "Patient", description = "Patient accounts and single-step auth"),
        (name = "Slot", description = "Doctor schedule slots"),
        (name = "Appointment", description = "Appointments against slots"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
