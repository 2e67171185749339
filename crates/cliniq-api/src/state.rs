//! Application state

use cliniq_auth::AuthService;
use cliniq_db::Stores;

/// Shared application state for all handlers
pub struct AppState {
    /// Record stores (PostgreSQL or in-memory)
    pub stores: Stores,
    /// Authentication services
    pub auth: AuthService,
}

impl AppState {
    pub fn new(stores: Stores, auth: AuthService) -> Self {
        Self { stores, auth }
    }
}
