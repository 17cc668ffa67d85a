use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// Hash a password with a fresh salt
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Check a password against a stored digest
///
/// A malformed digest never matches.
pub fn verify_password(password: &str, digest: &str) -> bool {
    verify(password, digest).unwrap_or(false)
}
