use auth::PasswordError;
use auth::PasswordHasher;

use crate::domain::identity::ports::CredentialVerifier;

/// Argon2id-backed credential verifier, the production implementation of the
/// gate's verification collaborator.
pub struct ArgonCredentialVerifier {
    hasher: PasswordHasher,
}

impl ArgonCredentialVerifier {
    pub fn new() -> Self {
        Self {
            hasher: PasswordHasher::new(),
        }
    }
}

impl Default for ArgonCredentialVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialVerifier for ArgonCredentialVerifier {
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.hasher.verify(password, stored_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verifies_real_argon2_hashes() {
        let hash = PasswordHasher::new().hash("P@ssw0rd1").unwrap();
        let verifier = ArgonCredentialVerifier::new();

        assert!(verifier.verify("P@ssw0rd1", &hash).unwrap());
        assert!(!verifier.verify("other", &hash).unwrap());
    }
}
