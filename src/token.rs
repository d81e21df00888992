//! Session token codec.
//!
//! A token is base64 over the JSON claims. It is reversible and carries no
//! signature: anyone with storage access can mint one. It only caches who
//! is currently active.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Role, User};

pub const DEFAULT_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub email: String,
    pub role: Role,
    /// Expiry in milliseconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    pub fn for_user(user: &User, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            id: user.id.clone(),
            email: user.fields.email.clone(),
            role: user.fields.role,
            // Past the calendar's end the token simply never expires.
            exp: now
                .checked_add_signed(ttl)
                .map_or(i64::MAX, |t| t.timestamp_millis()),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp_millis()
    }
}

pub fn encode(claims: &Claims) -> String {
    // Claims hold only strings, an enum and an integer; serialization cannot fail.
    let payload = serde_json::to_vec(claims).unwrap_or_default();
    STANDARD.encode(payload)
}

/// `None` for anything that is not a well-formed token. Callers cannot tell
/// corruption from tampering.
pub fn decode(token: &str) -> Option<Claims> {
    let bytes = STANDARD.decode(token.trim()).ok()?;
    serde_json::from_slice(&bytes).ok()
}
