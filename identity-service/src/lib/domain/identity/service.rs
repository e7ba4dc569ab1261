use std::sync::Arc;

use async_trait::async_trait;
use auth::SessionClaim;
use auth::SessionCodec;

use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::EmployeeId;
use crate::domain::employee::ports::EmployeeRepository;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::LoginGrant;
use crate::domain::identity::ports::CredentialVerifier;
use crate::domain::identity::ports::IdentityRepository;
use crate::domain::identity::ports::IdentityServicePort;
use crate::domain::token::ports::SetupServicePort;

/// Identity workflow: account provisioning and the authentication gate.
///
/// Concrete implementation of IdentityServicePort with dependency injection.
pub struct IdentityService<IR, ER, SS, CV>
where
    IR: IdentityRepository,
    ER: EmployeeRepository,
    SS: SetupServicePort,
    CV: CredentialVerifier,
{
    identities: Arc<IR>,
    employees: Arc<ER>,
    setup: Arc<SS>,
    verifier: Arc<CV>,
    session_codec: Arc<SessionCodec>,
    session_ttl_hours: i64,
}

impl<IR, ER, SS, CV> IdentityService<IR, ER, SS, CV>
where
    IR: IdentityRepository,
    ER: EmployeeRepository,
    SS: SetupServicePort,
    CV: CredentialVerifier,
{
    pub fn new(
        identities: Arc<IR>,
        employees: Arc<ER>,
        setup: Arc<SS>,
        verifier: Arc<CV>,
        session_codec: Arc<SessionCodec>,
        session_ttl_hours: i64,
    ) -> Self {
        Self {
            identities,
            employees,
            setup,
            verifier,
            session_codec,
            session_ttl_hours,
        }
    }
}

#[async_trait]
impl<IR, ER, SS, CV> IdentityServicePort for IdentityService<IR, ER, SS, CV>
where
    IR: IdentityRepository,
    ER: EmployeeRepository,
    SS: SetupServicePort,
    CV: CredentialVerifier,
{
    async fn provision(&self, employee_id: EmployeeId) -> Result<(), IdentityError> {
        let employee = self
            .employees
            .find_by_id(&employee_id)
            .await
            .map_err(|e| IdentityError::DatabaseError(e.to_string()))?
            .ok_or_else(|| IdentityError::EmployeeNotFound(employee_id.to_string()))?;

        // Advisory pre-check; the unique-email constraint below is what
        // actually guarantees a single identity under concurrency.
        if self
            .identities
            .find_by_email(&employee.email)
            .await?
            .is_some()
        {
            tracing::debug!(
                employee_id = %employee_id,
                "Identity already provisioned, skipping"
            );
            return Ok(());
        }

        let identity = Identity::provisioned(employee.email.clone(), employee.id);
        let identity = match self.identities.create(identity).await {
            Ok(identity) => identity,
            Err(IdentityError::EmailTaken(_)) => {
                tracing::debug!(
                    employee_id = %employee_id,
                    "Lost provisioning race, identity already exists"
                );
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        self.setup
            .issue(identity.id, &employee.display_name(), employee.email.as_str())
            .await
            .map_err(|e| IdentityError::Issuance(e.to_string()))?;

        tracing::info!(
            employee_id = %employee_id,
            identity_id = %identity.id,
            "Provisioned inactive identity with setup token"
        );

        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, IdentityError> {
        let email = EmailAddress::new(email.to_string())
            .map_err(|_| IdentityError::InvalidCredentials)?;

        let identity = self
            .identities
            .find_by_email(&email)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        if !identity.active {
            return Err(IdentityError::AccountInactive);
        }

        let stored_hash = identity
            .password_hash
            .as_deref()
            .ok_or(IdentityError::InvalidCredentials)?;

        let matches = self
            .verifier
            .verify(password, stored_hash)
            .map_err(|e| {
                tracing::warn!(error = %e, "Credential verification failed");
                IdentityError::InvalidCredentials
            })?;

        if !matches {
            return Err(IdentityError::InvalidCredentials);
        }

        let claim = SessionClaim::issue(
            identity.id.0,
            identity.role,
            identity.employee_id.map(|id| id.0),
            self.session_ttl_hours,
        );

        let access_token = self
            .session_codec
            .encode(&claim)
            .map_err(|e| IdentityError::Session(e.to_string()))?;

        Ok(LoginGrant {
            claim,
            access_token,
        })
    }
}
