use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// One-way hash of a credential password with a fresh random salt.
/// Work factor is Argon2's default and never varies per call.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// `Ok(false)` for a merely-wrong password; `Err` only for a malformed
/// stored digest, which is an internal fault, not a client one.
pub fn verify_password(plain: &str, digest: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(digest).map_err(|e| {
        error!(error = %e, "argon2 parse digest error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "password123";
        let digest = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &digest).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let digest = hash_password("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &digest).expect("verify should not error"));
    }

    #[test]
    fn digest_never_contains_plaintext_and_salts_differ() {
        let password = "password123";
        let a = hash_password(password).unwrap();
        let b = hash_password(password).unwrap();
        assert!(!a.contains(password));
        assert_ne!(a, b, "fresh salt per hash");
    }

    #[test]
    fn verify_errors_on_malformed_digest() {
        let err = verify_password("anything", "not-a-valid-digest").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
