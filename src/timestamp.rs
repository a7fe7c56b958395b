use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

/// Source of `oauth_timestamp` and `oauth_nonce` values.
pub trait TimestampService: Send + Sync {
    /// Current Unix time in seconds.
    fn timestamp_in_seconds(&self) -> String;

    /// A fresh value for every call.
    fn nonce(&self) -> String;
}

/// Wall clock plus 128 random bits per nonce.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimestampService;

impl TimestampService for SystemTimestampService {
    fn timestamp_in_seconds(&self) -> String {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
            .to_string()
    }

    fn nonce(&self) -> String {
        let bytes: [u8; 16] = rand::thread_rng().gen();
        hex::encode(bytes)
    }
}

/// Always answers with the same timestamp and nonce.
///
/// Useful for reproducing the signatures published in provider
/// documentation. Never use it against a real provider: repeated nonces are
/// rejected as replays.
#[derive(Debug, Clone)]
pub struct FixedTimestampService {
    timestamp: String,
    nonce: String,
}

impl FixedTimestampService {
    pub fn new<TTimestamp, TNonce>(timestamp: TTimestamp, nonce: TNonce) -> Self
    where
        TTimestamp: Into<String>,
        TNonce: Into<String>,
    {
        FixedTimestampService {
            timestamp: timestamp.into(),
            nonce: nonce.into(),
        }
    }
}

impl TimestampService for FixedTimestampService {
    fn timestamp_in_seconds(&self) -> String {
        self.timestamp.clone()
    }

    fn nonce(&self) -> String {
        self.nonce.clone()
    }
}
