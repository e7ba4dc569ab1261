use async_trait::async_trait;
use auth::PasswordError;

use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::EmployeeId;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::LoginGrant;

/// Port for identity workflow operations.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Provision a login identity for an employee.
    ///
    /// Idempotent: if an identity already exists for the employee's email
    /// (including losing a concurrent race on the uniqueness constraint),
    /// this returns Ok without effect.
    ///
    /// # Errors
    /// * `EmployeeNotFound` - No such employee
    /// * `Issuance` - Setup token could not be issued
    /// * `DatabaseError` - Storage operation failed
    async fn provision(&self, employee_id: EmployeeId) -> Result<(), IdentityError>;

    /// Validate a login attempt and issue a session credential.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email, wrong password, or verifier failure
    /// * `AccountInactive` - Identity exists but has not set a password yet
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, IdentityError>;
}

/// Persistence operations for the identity principal.
///
/// No delete and no general update: activation happens exclusively through
/// the setup-token redeem primitive (see the token ports).
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Persist a new identity.
    ///
    /// # Errors
    /// * `EmailTaken` - Unique-email violation; callers treat a lost
    ///   provisioning race as an idempotent no-op
    /// * `DatabaseError` - Storage operation failed
    async fn create(&self, identity: Identity) -> Result<Identity, IdentityError>;

    /// Retrieve an identity by email, `None` if absent.
    async fn find_by_email(&self, email: &EmailAddress)
        -> Result<Option<Identity>, IdentityError>;

    /// Retrieve an identity by identifier, `None` if absent.
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError>;
}

/// Opaque credential verification collaborator.
///
/// The gate never inspects hashes itself; mismatches come back as
/// `Ok(false)`, anything else is an error the caller normalizes.
pub trait CredentialVerifier: Send + Sync + 'static {
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError>;
}
