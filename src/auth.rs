//! Password hashing and token issuance.

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};
use uuid::Uuid;

/// Hash a password with a freshly generated per-record salt.
pub fn hash_password(plain: &str) -> Result<String, BcryptError> {
    hash(plain, DEFAULT_COST)
}

/// Verify a plaintext password against a stored hash. A malformed stored
/// hash counts as a failed verification rather than an error.
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    verify(plain, hashed).unwrap_or(false)
}

/// Issue a fresh opaque bearer token. Not a verified session credential;
/// possession of the string is the whole scheme.
pub fn issue_token() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hashed = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hashed));
        assert!(!verify_password("hunter3", &hashed));
    }

    #[test]
    fn malformed_hash_fails_verification() {
        assert!(!verify_password("hunter2", "not-a-bcrypt-hash"));
    }

    #[test]
    fn tokens_are_distinct() {
        assert_ne!(issue_token(), issue_token());
    }
}
