use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::identity::models::IdentityId;
use crate::domain::token::errors::NotifierError;
use crate::domain::token::errors::TokenError;
use crate::domain::token::models::SetupToken;

/// Port for the setup-token workflow (issue, consume, probe, sweep).
#[async_trait]
pub trait SetupServicePort: Send + Sync + 'static {
    /// Issue and persist a setup token for an identity, then notify the
    /// contact address best-effort.
    ///
    /// Delivery failure is logged and swallowed; it never rolls back the
    /// persisted token and is not observable from the result.
    ///
    /// # Errors
    /// * `DatabaseError` - Token could not be persisted
    async fn issue(
        &self,
        identity_id: IdentityId,
        display_name: &str,
        address: &str,
    ) -> Result<SetupToken, TokenError>;

    /// Redeem a token and activate its identity with the new password.
    ///
    /// Exactly one of any number of concurrent attempts on the same secret
    /// succeeds; every other outcome (unknown, used, expired, lost race)
    /// is `TokenInvalid`.
    ///
    /// # Errors
    /// * `TokenInvalid` - Secret unknown, already used, or expired
    /// * `WeakPassword` - Password fails the minimum-length policy
    async fn consume(&self, secret: &str, new_password: &str) -> Result<(), TokenError>;

    /// Read-only probe used by the setup UI before showing the form.
    ///
    /// # Errors
    /// * `TokenInvalid` - Secret unknown, already used, or expired
    async fn validate(&self, secret: &str) -> Result<(), TokenError>;

    /// Purge every token whose expiry has passed, used or not.
    ///
    /// # Returns
    /// Number of tokens deleted
    async fn sweep(&self, now: DateTime<Utc>) -> Result<u64, TokenError>;
}

/// Persistence operations for setup tokens.
#[async_trait]
pub trait SetupTokenRepository: Send + Sync + 'static {
    /// Persist a new token.
    ///
    /// # Errors
    /// * `DatabaseError` - Storage operation failed
    async fn create(&self, token: SetupToken) -> Result<SetupToken, TokenError>;

    /// Retrieve a token by its secret, `None` if absent. Read-only.
    async fn find_by_secret(&self, secret: &str) -> Result<Option<SetupToken>, TokenError>;

    /// The load-bearing conditional update: in one atomic storage action,
    /// flip `used = true` iff the row still shows `used == false` and
    /// `now < expires_at`, and set the owning identity's password hash and
    /// `active = true`.
    ///
    /// Returns the redeemed token only when this call is the one that
    /// flipped `used`; every competing caller sees `None`. Implementations
    /// must not decompose this into a separate read and write.
    async fn redeem(
        &self,
        secret: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SetupToken>, TokenError>;

    /// Delete all tokens with `expires_at < now`, regardless of used state.
    ///
    /// # Returns
    /// Number of rows deleted
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, TokenError>;
}

/// Best-effort delivery collaborator. May fail; may even fail silently.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn send(&self, address: &str, subject: &str, body: &str) -> Result<(), NotifierError>;
}
