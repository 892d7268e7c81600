// ── Runtime connection configuration ──
//
// Describes how to reach and sign in to the lotto platform. Carries
// credentials and tuning but never touches disk; the CLI builds a
// `PlatformConfig` from its profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use secrecy::SecretString;
use url::Url;

/// Platform wall clock: Malaysia Time, UTC+8, no DST.
pub const MYT_OFFSET_SECS: i32 = 8 * 3600;

/// Malaysia Time as a chrono offset.
pub fn myt() -> FixedOffset {
    FixedOffset::east_opt(MYT_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Trust an extra CA certificate from a PEM file.
    CustomCa(PathBuf),
}

/// Configuration for one platform account.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// API base URL (e.g. `https://api.example.com/api`).
    pub url: Url,
    /// Agent phone number used to sign in.
    pub phone: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Local offset used for date keys and slot times.
    pub utc_offset: FixedOffset,
}

impl PlatformConfig {
    pub fn new(url: Url, phone: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            phone: phone.into(),
            password,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            utc_offset: myt(),
        }
    }

    /// Override the local offset (minutes east of UTC). Out-of-range
    /// values keep the current offset.
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        if let Some(offset) = FixedOffset::east_opt(minutes.saturating_mul(60)) {
            self.utc_offset = offset;
        }
        self
    }
}
