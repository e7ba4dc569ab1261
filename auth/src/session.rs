use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::roles::Role;

/// Stateless session claim established at login and presented on every
/// subsequent request.
///
/// Never stored server-side; the signature and `exp` are the only things
/// binding it. Not revocable before expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaim {
    /// Identity id of the authenticated principal.
    pub sub: Uuid,

    /// Role granted to the principal.
    pub role: Role,

    /// Employee record backing this identity, when it originates from one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<Uuid>,

    /// Issued-at (Unix timestamp).
    pub iat: i64,

    /// Expiration (Unix timestamp).
    pub exp: i64,
}

impl SessionClaim {
    /// Issue a claim expiring `ttl_hours` from now.
    pub fn issue(sub: Uuid, role: Role, employee_id: Option<Uuid>, ttl_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub,
            role,
            employee_id,
            iat: now.timestamp(),
            exp: (now + Duration::hours(ttl_hours)).timestamp(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Session token operation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session token has expired")]
    Expired,

    #[error("Failed to encode session token: {0}")]
    EncodingFailed(String),

    #[error("Session token is invalid: {0}")]
    Invalid(String),
}

/// Encodes and validates session claims as HS256 JWTs.
pub struct SessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl SessionCodec {
    /// Create a codec from a shared secret.
    ///
    /// The secret should be at least 256 bits and come from configuration,
    /// never from code.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    pub fn encode(&self, claim: &SessionClaim) -> Result<String, SessionError> {
        let header = Header::new(self.algorithm);

        encode(&header, claim, &self.encoding_key)
            .map_err(|e| SessionError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a session token.
    ///
    /// Signature and `exp` are both enforced; an expired claim never comes
    /// back out of here.
    pub fn decode(&self, token: &str) -> Result<SessionClaim, SessionError> {
        let validation = Validation::new(self.algorithm);

        decode::<SessionClaim>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::Invalid(e.to_string()),
            })
    }
}
