use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use sha2::{Digest, Sha256};
use time::{Duration, OffsetDateTime};

/// Fixed policy: a reset token is good for 15 minutes.
pub const TOKEN_TTL_MINUTES: i64 = 15;

/// Alphanumeric length; ~5.95 bits per char gives well over 160 bits of entropy.
const TOKEN_LENGTH: usize = 32;

/// A freshly minted reset token. Only `digest` is ever persisted; the
/// plaintext travels to the user over email and is then forgotten.
#[derive(Debug)]
pub struct ResetToken {
    pub plaintext: String,
    pub digest: String,
    pub expires_at: OffsetDateTime,
}

pub fn generate() -> ResetToken {
    let plaintext: String = OsRng
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect();
    ResetToken {
        digest: digest(&plaintext),
        expires_at: OffsetDateTime::now_utc() + Duration::minutes(TOKEN_TTL_MINUTES),
        plaintext,
    }
}

/// Deterministic SHA-256 digest, hex-encoded. Used both when storing a new
/// token and when redeeming a presented one.
pub fn digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_random_and_well_formed() {
        let a = generate();
        let b = generate();
        assert_eq!(a.plaintext.len(), TOKEN_LENGTH);
        assert!(a.plaintext.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a.plaintext, b.plaintext);
    }

    #[test]
    fn digest_is_deterministic_and_hides_plaintext() {
        let token = generate();
        assert_eq!(digest(&token.plaintext), token.digest);
        assert_ne!(token.digest, token.plaintext);
        assert_eq!(token.digest.len(), 64); // hex sha-256
    }

    #[test]
    fn expiry_is_fifteen_minutes_out() {
        let token = generate();
        let delta = token.expires_at - OffsetDateTime::now_utc();
        assert!(delta > Duration::minutes(14));
        assert!(delta <= Duration::minutes(15));
    }
}
