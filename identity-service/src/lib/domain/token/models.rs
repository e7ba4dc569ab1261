use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::identity::models::IdentityId;

/// Fixed policy: setup links die 48 hours after issuance.
pub const SETUP_TOKEN_TTL_HOURS: i64 = 48;

/// Single-use, time-boxed secret that lets a freshly provisioned identity
/// set its own password and activate.
///
/// Valid iff `!used && now < expires_at`; the expiry bound is exclusive.
/// Lifecycle: Active -> Consumed or Expired -> Purged. Nothing resurrects a
/// purged token.
#[derive(Debug, Clone)]
pub struct SetupToken {
    pub id: TokenId,
    pub identity_id: IdentityId,
    /// Opaque unguessable value, unique across all tokens.
    pub secret: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl SetupToken {
    /// Mint a fresh token for an identity, secret drawn from the CSPRNG.
    pub fn issue(identity_id: IdentityId, now: DateTime<Utc>) -> Self {
        Self {
            id: TokenId::new(),
            identity_id,
            secret: auth::generate_setup_secret(),
            expires_at: now + Duration::hours(SETUP_TOKEN_TTL_HOURS),
            used: false,
            created_at: now,
        }
    }

    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.used && now < self.expires_at
    }
}

/// Setup token unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(pub Uuid);

impl TokenId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TokenId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
