use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::identity::models::IdentityId;
use crate::domain::token::errors::TokenError;
use crate::domain::token::models::SetupToken;
use crate::domain::token::models::SETUP_TOKEN_TTL_HOURS;
use crate::domain::token::ports::Notifier;
use crate::domain::token::ports::SetupServicePort;
use crate::domain::token::ports::SetupTokenRepository;

/// Minimum password length accepted by the setup flow.
const MIN_PASSWORD_CHARS: usize = 8;

/// Setup-token workflow: issuance, consumption, probing and reaping.
///
/// Concrete implementation of SetupServicePort with dependency injection.
pub struct SetupService<TR, N>
where
    TR: SetupTokenRepository,
    N: Notifier,
{
    repository: Arc<TR>,
    notifier: Arc<N>,
    password_hasher: PasswordHasher,
    setup_link_base: String,
}

impl<TR, N> SetupService<TR, N>
where
    TR: SetupTokenRepository,
    N: Notifier,
{
    /// Create a new setup service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Token persistence implementation
    /// * `notifier` - Best-effort delivery implementation
    /// * `setup_link_base` - Base URL the setup link in notifications points at
    pub fn new(repository: Arc<TR>, notifier: Arc<N>, setup_link_base: String) -> Self {
        Self {
            repository,
            notifier,
            password_hasher: PasswordHasher::new(),
            setup_link_base,
        }
    }

    fn setup_message(&self, display_name: &str, secret: &str) -> String {
        format!(
            "Hello {},\n\n\
             Your employee account has been created.\n\n\
             Please set your password using the link below:\n\
             {}/set-password?token={}\n\n\
             This link expires in {} hours.\n\n\
             - JASIQ Labs",
            display_name, self.setup_link_base, secret, SETUP_TOKEN_TTL_HOURS
        )
    }
}

#[async_trait]
impl<TR, N> SetupServicePort for SetupService<TR, N>
where
    TR: SetupTokenRepository,
    N: Notifier,
{
    async fn issue(
        &self,
        identity_id: IdentityId,
        display_name: &str,
        address: &str,
    ) -> Result<SetupToken, TokenError> {
        let token = SetupToken::issue(identity_id, Utc::now());

        // Persist first; delivery never decides the token's fate.
        let token = self.repository.create(token).await?;

        let body = self.setup_message(display_name, &token.secret);
        if let Err(e) = self
            .notifier
            .send(address, "Set up your JASIQ CoreOps account", &body)
            .await
        {
            tracing::warn!(
                address = %address,
                error = %e,
                "Failed to deliver password setup notification"
            );
        }

        Ok(token)
    }

    async fn consume(&self, secret: &str, new_password: &str) -> Result<(), TokenError> {
        if new_password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(TokenError::WeakPassword {
                min: MIN_PASSWORD_CHARS,
            });
        }

        // Hash before touching the token so a hashing failure cannot burn it.
        let password_hash = self
            .password_hasher
            .hash(new_password)
            .map_err(|e| TokenError::Hashing(e.to_string()))?;

        match self
            .repository
            .redeem(secret, &password_hash, Utc::now())
            .await?
        {
            Some(token) => {
                tracing::info!(identity_id = %token.identity_id, "Setup token redeemed");
                Ok(())
            }
            None => Err(TokenError::TokenInvalid),
        }
    }

    async fn validate(&self, secret: &str) -> Result<(), TokenError> {
        match self.repository.find_by_secret(secret).await? {
            Some(token) if token.is_valid(Utc::now()) => Ok(()),
            _ => Err(TokenError::TokenInvalid),
        }
    }

    async fn sweep(&self, now: DateTime<Utc>) -> Result<u64, TokenError> {
        let deleted = self.repository.purge_expired(now).await?;
        if deleted > 0 {
            tracing::info!(deleted, "Purged expired setup tokens");
        }
        Ok(deleted)
    }
}
