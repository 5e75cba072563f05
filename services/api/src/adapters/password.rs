//! services/api/src/adapters/password.rs
//!
//! Argon2id implementation of the `PasswordService` port. Hashes are stored as
//! PHC-format strings (e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use todo_core::ports::{PasswordService, PortError, PortResult};

/// A `PasswordService` using the default Argon2id parameters.
#[derive(Clone, Default)]
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash_password(&self, password: &str) -> PortResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PortError::Unexpected(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, password: &str, hash: &str) -> PortResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PortError::Unexpected(format!("Invalid password hash: {}", e)))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let service = Argon2PasswordService::new();
        let hash = service.hash_password("password123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify_password("password123", &hash).unwrap());
        assert!(!service.verify_password("password124", &hash).unwrap());
    }

    #[test]
    fn salts_differ() {
        let service = Argon2PasswordService::new();
        let a = service.hash_password("password123").unwrap();
        let b = service.hash_password("password123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let service = Argon2PasswordService::new();
        assert!(service.verify_password("password123", "plaintext").is_err());
    }
}
