//! Salted one-way credential hashing.
//!
//! PBKDF2-HMAC-SHA256 in the `pbkdf2:sha256:<iterations>$<salt>$<digest>`
//! shape the application has always stored, so hashes written by earlier
//! deployments keep verifying.

use std::num::NonZeroU32;

use ring::rand::{SecureRandom, SystemRandom};
use ring::pbkdf2;

use crate::error::{MigrateResult, MigrationError};

const PBKDF2_ITERATIONS: NonZeroU32 = NonZeroU32::new(600_000).unwrap();
const SALT_LEN: usize = 16;
const DIGEST_LEN: usize = 32;
const SCHEME: &str = "pbkdf2:sha256";

/// Salt alphabet; the salt field is stored verbatim and fed to the KDF
/// as its ASCII bytes, exactly as the application has always done.
const SALT_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> MigrateResult<String> {
    let mut raw = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut raw)
        .map_err(|_| MigrationError::database("system RNG unavailable"))?;
    let salt: String = raw
        .iter()
        .map(|b| SALT_CHARSET[*b as usize % SALT_CHARSET.len()] as char)
        .collect();

    let mut digest = [0u8; DIGEST_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        PBKDF2_ITERATIONS,
        salt.as_bytes(),
        password.as_bytes(),
        &mut digest,
    );

    Ok(format!(
        "{}:{}${}${}",
        SCHEME,
        PBKDF2_ITERATIONS,
        salt,
        hex::encode(digest)
    ))
}

/// Verify a password against a stored hash.
///
/// Malformed hashes verify as `false` rather than erroring; a corrupt
/// stored credential reads the same as a wrong password.
pub fn verify_password(stored: &str, password: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(header), Some(salt), Some(digest_hex)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    let Some(iterations) = header
        .strip_prefix(SCHEME)
        .and_then(|rest| rest.strip_prefix(':'))
        .and_then(|n| n.parse::<u32>().ok())
        .and_then(NonZeroU32::new)
    else {
        return false;
    };

    let Ok(digest) = hex::decode(digest_hex) else {
        return false;
    };

    // The salt field is not encoded; its ASCII bytes are the salt.
    pbkdf2::verify(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt.as_bytes(),
        password.as_bytes(),
        &digest,
    )
    .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_round_trips() {
        let hash = hash_password("admin@123").unwrap();
        assert!(verify_password(&hash, "admin@123"));
        assert!(!verify_password(&hash, "admin@124"));
    }

    #[test]
    fn test_hash_format() {
        let hash = hash_password("secret").unwrap();
        assert!(hash.starts_with("pbkdf2:sha256:600000$"));
        assert_eq!(hash.split('$').count(), 3);

        let salt = hash.split('$').nth(1).unwrap();
        assert_eq!(salt.len(), 16);
        assert!(salt.bytes().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_verifies_hash_from_previous_deployment() {
        // Stored by the application's earlier stack; the salt field is
        // plain ASCII, not an encoding of anything.
        let stored = "pbkdf2:sha256:600000$NUmRmyOsBQbyvWW3$\
                      8aa406abaf6b70dde0b7f21d0f87b8e3c6a3157ea0b5a31a3991ebcd119028e6";
        assert!(verify_password(stored, "admin@123"));
        assert!(!verify_password(stored, "admin@124"));
    }

    #[test]
    fn test_salts_are_unique() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
        // Both still verify.
        assert!(verify_password(&a, "same password"));
        assert!(verify_password(&b, "same password"));
    }

    #[test]
    fn test_malformed_hashes_reject() {
        assert!(!verify_password("", "x"));
        assert!(!verify_password("not a hash", "x"));
        assert!(!verify_password("pbkdf2:sha256:0$aa$bb", "x"));
        assert!(!verify_password("pbkdf2:sha256:600000$zz$bb", "x"));
        assert!(!verify_password("scrypt:600000$aa$bb", "x"));
    }
}
