use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Random bytes per setup secret (256 bits).
const SECRET_BYTES: usize = 32;

/// Generate an unguessable secret for a password-setup token.
///
/// Draws 32 bytes from the operating system CSPRNG (the same source our
/// Argon2 salts come from) and encodes them base64url without padding so the
/// value survives query strings and email links unescaped.
pub fn generate_setup_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_length() {
        // 32 bytes -> 43 base64url chars without padding
        assert_eq!(generate_setup_secret().len(), 43);
    }

    #[test]
    fn test_secret_is_url_safe() {
        let secret = generate_setup_secret();
        assert!(secret
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_secrets_differ() {
        assert_ne!(generate_setup_secret(), generate_setup_secret());
    }
}
