//! Refresh token cookies
//!
//! Refresh tokens travel in httpOnly cookies scoped per channel, so an admin,
//! a doctor and a patient session can coexist in one browser. Signout clears
//! only the caller's channel cookie.

use cookie::{Cookie, SameSite};
use time::Duration;

use crate::config::CookieConfig;

/// Which session cookie a flow reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieChannel {
    Admin,
    Doctor,
    Patient,
}

impl CookieChannel {
    /// Cookie name for this channel
    pub fn cookie_name(&self) -> &'static str {
        match self {
            Self::Admin => "refreshTokenAdmin",
            Self::Doctor => "refreshTokenDoctor",
            Self::Patient => "refreshTokenPatient",
        }
    }
}

/// Builds and clears refresh cookies
#[derive(Debug, Clone)]
pub struct SessionCookieWriter {
    secure: bool,
    max_age: Duration,
}

impl SessionCookieWriter {
    pub fn new(config: &CookieConfig) -> Self {
        Self {
            secure: config.secure,
            max_age: Duration::seconds(config.max_age.as_secs() as i64),
        }
    }

    /// Build the refresh cookie for a channel
    pub fn issue(&self, channel: CookieChannel, refresh_token: &str) -> Cookie<'static> {
        Cookie::build((channel.cookie_name(), refresh_token.to_string()))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(self.max_age)
            .build()
    }

    /// Build a removal cookie for a channel
    pub fn clear(&self, channel: CookieChannel) -> Cookie<'static> {
        Cookie::build((channel.cookie_name(), ""))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(Duration::ZERO)
            .build()
    }
}

impl Default for SessionCookieWriter {
    fn default() -> Self {
        Self::new(&CookieConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names() {
        assert_eq!(CookieChannel::Admin.cookie_name(), "refreshTokenAdmin");
        assert_eq!(CookieChannel::Doctor.cookie_name(), "refreshTokenDoctor");
        assert_eq!(CookieChannel::Patient.cookie_name(), "refreshTokenPatient");
    }

    #[test]
    fn test_issued_cookie_attributes() {
        let writer = SessionCookieWriter::default();
        let cookie = writer.issue(CookieChannel::Patient, "tok");

        assert_eq!(cookie.name(), "refreshTokenPatient");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::days(30)));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let writer = SessionCookieWriter::default();
        let cookie = writer.clear(CookieChannel::Doctor);

        assert_eq!(cookie.name(), "refreshTokenDoctor");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
