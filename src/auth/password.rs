//! Reader passwords, stored as argon2 PHC strings in `users.password`.

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

fn argon2_failure(stage: &'static str, e: password_hash::Error) -> anyhow::Error {
    error!(error = %e, stage, "argon2 failure");
    anyhow::anyhow!("{stage}: {e}")
}

/// Fresh salt on every call, so two readers with the same password never
/// share a stored value.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let phc = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| argon2_failure("hash password", e))?;
    Ok(phc.to_string())
}

/// A wrong password is `Ok(false)`. Only an unparseable stored hash errors.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let stored = PasswordHash::new(stored).map_err(|e| argon2_failure("parse stored hash", e))?;
    let matches = Argon2::default()
        .verify_password(plain.as_bytes(), &stored)
        .is_ok();
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_lets_the_reader_back_in() {
        let stored = hash_password("the-dark-is-rising").unwrap();
        assert!(stored.starts_with("$argon2"));
        assert!(!stored.contains("the-dark-is-rising"));
        assert!(verify_password("the-dark-is-rising", &stored).unwrap());
    }

    #[test]
    fn two_readers_same_password_distinct_rows() {
        let a = hash_password("dune1965").unwrap();
        let b = hash_password("dune1965").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("dune1965", &a).unwrap());
        assert!(verify_password("dune1965", &b).unwrap());
    }

    #[test]
    fn wrong_password_is_a_plain_no() {
        let stored = hash_password("krondor").unwrap();
        assert!(!verify_password("Krondor", &stored).unwrap());
        assert!(!verify_password("", &stored).unwrap());
    }

    #[test]
    fn corrupt_users_row_is_an_error() {
        let err = verify_password("krondor", "plaintext-left-by-old-loader").unwrap_err();
        assert!(err.to_string().starts_with("parse stored hash"), "{err}");
    }
}
