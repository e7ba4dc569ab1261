//! Authentication building blocks for the HR platform
//!
//! Provides the credential primitives the identity service composes:
//! - Password hashing (Argon2id)
//! - Setup-secret generation for the password-setup flow
//! - Session claims encoded as signed JWTs
//! - The closed role set
//!
//! The service defines its own ports around these types; this crate stays
//! free of HTTP and storage concerns.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Session Claims
//! ```
//! use auth::{Role, SessionClaim, SessionCodec};
//! use uuid::Uuid;
//!
//! let codec = SessionCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let claim = SessionClaim::issue(Uuid::new_v4(), Role::Employee, None, 8);
//! let token = codec.encode(&claim).unwrap();
//! let decoded = codec.decode(&token).unwrap();
//! assert_eq!(decoded, claim);
//! ```

pub mod password;
pub mod roles;
pub mod secret;
pub mod session;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use roles::Role;
pub use secret::generate_setup_secret;
pub use session::SessionClaim;
pub use session::SessionCodec;
pub use session::SessionError;
