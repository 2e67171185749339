//! OTP delivery
//!
//! Delivery is behind a trait so signin flows can run against an SMTP relay
//! in production, a tracing sink in development, and an in-memory recorder in
//! tests. Codes are cached before dispatch, so a delivery failure leaves a
//! verifiable challenge behind.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use parking_lot::Mutex;

use crate::error::{AuthError, AuthResult};

/// Delivers one-time codes to an out-of-band channel
#[async_trait]
pub trait OtpNotifier: Send + Sync {
    /// Send `code` to the recipient identified by `recipient`
    async fn send_code(&self, recipient: &str, code: &str) -> AuthResult<()>;
}

/// SMTP relay configuration
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Relay hostname
    pub host: String,
    /// Account username
    pub username: String,
    /// Account password
    pub password: String,
    /// From address for outgoing mail
    pub from_address: String,
}

impl SmtpConfig {
    /// Read SMTP settings from the environment, if fully configured
    pub fn from_env() -> Option<Self> {
        Some(Self {
            host: std::env::var("SMTP_HOST").ok()?,
            username: std::env::var("SMTP_USER").ok()?,
            password: std::env::var("SMTP_PASSWORD").ok()?,
            from_address: std::env::var("SMTP_FROM").ok()?,
        })
    }
}

/// Sends codes over an authenticated SMTP relay
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> AuthResult<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| AuthError::Config(format!("Invalid SMTP relay: {}", e)))?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let from = config
            .from_address
            .parse()
            .map_err(|_| AuthError::Config("Invalid SMTP from address".to_string()))?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl OtpNotifier for SmtpNotifier {
    async fn send_code(&self, recipient: &str, code: &str) -> AuthResult<()> {
        // Admin challenges are keyed by username rather than an address;
        // anything that is not a mailbox goes to the operator inbox.
        let to: Mailbox = match recipient.parse() {
            Ok(mailbox) => mailbox,
            Err(_) => self.from.clone(),
        };

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("Your verification code")
            .body(format!("Your one-time verification code is {}", code))
            .map_err(|e| AuthError::Internal(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AuthError::Internal(format!("Failed to send message: {}", e)))?;

        Ok(())
    }
}

/// Logs codes instead of sending them. Development only.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl OtpNotifier for LogNotifier {
    async fn send_code(&self, recipient: &str, code: &str) -> AuthResult<()> {
        tracing::info!(recipient = %recipient, code = %code, "OTP issued");
        Ok(())
    }
}

/// Records delivered codes for assertions in tests
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<(String, String)>>,
    fail: Mutex<bool>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail
    pub fn fail_next_sends(&self, fail: bool) {
        *self.fail.lock() = fail;
    }

    /// Last code sent to `recipient`
    pub fn last_code_for(&self, recipient: &str) -> Option<String> {
        self.sent
            .lock()
            .iter()
            .rev()
            .find(|(r, _)| r == recipient)
            .map(|(_, code)| code.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl OtpNotifier for MemoryNotifier {
    async fn send_code(&self, recipient: &str, code: &str) -> AuthResult<()> {
        if *self.fail.lock() {
            return Err(AuthError::Internal("Delivery failed".to_string()));
        }
        self.sent
            .lock()
            .push((recipient.to_string(), code.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_notifier_records_sends() {
        let notifier = MemoryNotifier::new();
        notifier.send_code("akmal", "111111").await.unwrap();
        notifier.send_code("akmal", "222222").await.unwrap();

        assert_eq!(notifier.sent_count(), 2);
        assert_eq!(notifier.last_code_for("akmal"), Some("222222".to_string()));
        assert_eq!(notifier.last_code_for("ghost"), None);
    }

    #[tokio::test]
    async fn test_memory_notifier_can_fail() {
        let notifier = MemoryNotifier::new();
        notifier.fail_next_sends(true);

        assert!(notifier.send_code("akmal", "111111").await.is_err());
        assert_eq!(notifier.sent_count(), 0);
    }
}
