//! Argon2id password hashing.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use linkden_core::ports::{AuthError, PasswordService};

/// Argon2-based password service.
///
/// Hashes are PHC strings, so verification uses the parameters embedded in
/// the stored hash rather than the ones configured here.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    /// Service with the crate's recommended default cost.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Service with explicit cost parameters (memory in KiB).
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Reads `ARGON2_MEMORY_KIB` and `ARGON2_ITERATIONS`; defaults otherwise.
    pub fn from_env() -> Self {
        let memory = std::env::var("ARGON2_MEMORY_KIB")
            .ok()
            .and_then(|s| s.parse().ok());
        let iterations = std::env::var("ARGON2_ITERATIONS")
            .ok()
            .and_then(|s| s.parse().ok());

        match (memory, iterations) {
            (None, None) => Self::new(),
            (memory, iterations) => Self::with_params(
                memory.unwrap_or(Params::DEFAULT_M_COST),
                iterations.unwrap_or(Params::DEFAULT_T_COST),
                Params::DEFAULT_P_COST,
            )
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Invalid Argon2 parameters, using defaults");
                Self::new()
            }),
        }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

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
    fn test_hash_and_verify() {
        let service = Argon2PasswordService::with_params(1024, 1, 1).unwrap();
        let password = "secure_password_123";

        let hash = service.hash(password).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify(password, &hash).unwrap());
        assert!(!service.verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_uses_parameters_from_hash() {
        let cheap = Argon2PasswordService::with_params(1024, 1, 1).unwrap();
        let hash = cheap.hash("hunter22").unwrap();

        let other = Argon2PasswordService::with_params(2048, 2, 1).unwrap();
        assert!(other.verify("hunter22", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let service = Argon2PasswordService::new();
        assert!(matches!(
            service.verify("password", "not-a-phc-string"),
            Err(AuthError::HashingError(_))
        ));
    }

    #[test]
    fn test_invalid_params() {
        assert!(Argon2PasswordService::with_params(1, 1, 1).is_err());
    }
}
