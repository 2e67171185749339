//! OTP challenge cache
//!
//! One live challenge per identifier with a cache-wide TTL. `set` overwrites
//! unconditionally (last write wins), `get` evicts expired entries on read.
//! Successful verification does NOT remove the challenge; entries die by TTL
//! only. Time comes from an injectable [`Clock`] so expiry is testable.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use rand::Rng;

use crate::config::OtpConfig;

/// Time source for the challenge cache
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for tests
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}

struct Challenge {
    code: String,
    issued_at: DateTime<Utc>,
}

/// In-process OTP challenge cache keyed by identifier (username or phone)
pub struct OtpCache {
    entries: DashMap<String, Challenge>,
    digits: u32,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl OtpCache {
    /// Create a cache using wall-clock time
    pub fn new(config: &OtpConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit time source
    pub fn with_clock(config: &OtpConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            digits: config.digits,
            ttl: Duration::from_std(config.ttl).unwrap_or_else(|_| Duration::seconds(300)),
            clock,
        }
    }

    /// Generate a zero-padded numeric code
    pub fn generate(&self) -> String {
        let bound = 10u32.pow(self.digits);
        let code = rand::thread_rng().gen_range(0..bound);
        format!("{:0width$}", code, width = self.digits as usize)
    }

    /// Generate a fresh code and store it for `key`, returning the code
    pub fn issue(&self, key: &str) -> String {
        let code = self.generate();
        self.set(key, &code);
        code
    }

    /// Store a challenge for `key`, replacing any previous one
    pub fn set(&self, key: &str, code: &str) {
        self.entries.insert(
            key.to_string(),
            Challenge {
                code: code.to_string(),
                issued_at: self.clock.now(),
            },
        );
    }

    /// Fetch the live challenge for `key`. Expired entries read as absent and
    /// are evicted; there is no distinction between expired and never issued.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        if let Some(entry) = self.entries.get(key) {
            if now - entry.issued_at < self.ttl {
                return Some(entry.code.clone());
            }
        } else {
            return None;
        }
        self.entries.remove(key);
        None
    }

    /// Check a submitted code against the live challenge
    pub fn matches(&self, key: &str, code: &str) -> bool {
        self.get(key).map(|c| c == code).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cache(clock: Arc<ManualClock>) -> OtpCache {
        OtpCache::with_clock(&OtpConfig::default(), clock)
    }

    #[test]
    fn test_generate_is_zero_padded() {
        let cache = OtpCache::new(&OtpConfig::default());
        for _ in 0..20 {
            let code = cache.generate();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_set_overwrites_previous_challenge() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = test_cache(clock);

        cache.set("akmal", "111111");
        cache.set("akmal", "222222");

        assert_eq!(cache.get("akmal"), Some("222222".to_string()));
        assert!(!cache.matches("akmal", "111111"));
    }

    #[test]
    fn test_expired_challenge_reads_as_absent() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = test_cache(clock.clone());

        cache.set("akmal", "123456");
        clock.advance(Duration::seconds(301));

        assert_eq!(cache.get("akmal"), None);
        // Evicted on read, stays absent even if the clock rolls back.
        assert_eq!(cache.get("akmal"), None);
    }

    #[test]
    fn test_challenge_survives_until_ttl() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = test_cache(clock.clone());

        cache.set("akmal", "123456");
        clock.advance(Duration::seconds(299));

        assert!(cache.matches("akmal", "123456"));
    }

    #[test]
    fn test_successful_match_keeps_challenge() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = test_cache(clock);

        cache.set("akmal", "123456");
        assert!(cache.matches("akmal", "123456"));
        // Not cleared by verification; only TTL removes it.
        assert!(cache.matches("akmal", "123456"));
    }

    #[test]
    fn test_never_issued_reads_as_absent() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = test_cache(clock);
        assert_eq!(cache.get("ghost"), None);
    }
}
