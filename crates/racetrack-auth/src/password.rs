//! Password hashing capability.

use crate::error::{AuthError, AuthResult};
use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher as _, PasswordVerifier as _,
    SaltString, rand_core::OsRng,
};
use argon2::{Algorithm, Argon2, Params, Version};

/// Turns passwords into opaque digests and checks candidates against them.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> impl Future<Output = AuthResult<String>> + Send;

    /// `Ok(false)` for a mismatch; `Err` only when the digest is unusable.
    fn verify(
        &self,
        password: &str,
        digest: &str,
    ) -> impl Future<Output = AuthResult<bool>> + Send;
}

/// Argon2id with a random salt per password, producing PHC strings.
///
/// The work runs on the blocking pool so a login only suspends its own
/// request.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2Hasher {
    /// Custom memory (KiB) and iteration costs. Verification reads the
    /// costs from the digest, so existing hashes keep working.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> AuthResult<Self> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(params: Params) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }
}

impl PasswordHasher for Argon2Hasher {
    async fn hash(&self, password: &str) -> AuthResult<String> {
        let password = password.to_owned();
        let params = self.params.clone();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Self::argon2(params)
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AuthError::Hashing(e.to_string()))
        })
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    async fn verify(&self, password: &str, digest: &str) -> AuthResult<bool> {
        let password = password.to_owned();
        let digest = digest.to_owned();
        let params = self.params.clone();

        tokio::task::spawn_blocking(move || {
            let parsed =
                PasswordHash::new(&digest).map_err(|e| AuthError::Hashing(e.to_string()))?;
            match Self::argon2(params).verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(PasswordHashError::Password) => Ok(false),
                Err(e) => Err(AuthError::Hashing(e.to_string())),
            }
        })
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
    }
}
