//! Route guards
//!
//! Each route declares an ordered chain of guard steps evaluated against the
//! verified caller identity. Steps are pure predicates; evaluation
//! short-circuits on the first rejection and every rejection maps to the same
//! 401 so callers cannot probe which step failed.

use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::types::Identity;

/// A single authorization predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStep {
    /// Caller must hold the superadmin role
    SuperAdmin,
    /// Caller must be an admin or superadmin
    Admin,
    /// Caller must be admin-level or a doctor
    Doctor,
    /// Caller is the superadmin or the target record itself
    SelfOnly,
    /// Caller is admin-level, a doctor, or the target patient themself
    SelfPatient,
}

impl GuardStep {
    /// Evaluate this step. `resource` is the path id of the target record,
    /// absent on collection routes.
    pub fn check(&self, identity: &Identity, resource: Option<Uuid>) -> AuthResult<()> {
        let allowed = match self {
            Self::SuperAdmin => identity.is_superadmin(),
            Self::Admin => identity.is_admin_level(),
            Self::Doctor => identity.is_doctor_level(),
            Self::SelfOnly => {
                identity.is_superadmin() || resource.is_some_and(|id| identity.subject == id)
            }
            Self::SelfPatient => {
                identity.is_doctor_level() || resource.is_some_and(|id| identity.subject == id)
            }
        };

        if allowed {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

/// Evaluate an ordered guard chain, stopping at the first rejection
pub fn evaluate(steps: &[GuardStep], identity: &Identity, resource: Option<Uuid>) -> AuthResult<()> {
    for step in steps {
        step.check(identity, resource)?;
    }
    Ok(())
}
