//! Salted PBKDF2 password hashing.

use std::num::NonZeroU32;

use base64::{engine::general_purpose::STANDARD, Engine};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};

use crate::auth::models::Credential;
use crate::errors::{Error, Result};

/// Raw salt length before base64 encoding.
pub const SALT_LEN: usize = 24;
/// Derived key length before base64 encoding.
pub const HASH_LEN: usize = 24;
/// Lowest iteration count the hasher accepts.
pub const MIN_ITERATIONS: u32 = 10_000;

static ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

const DEFAULT_ITERATIONS: NonZeroU32 = match NonZeroU32::new(MIN_ITERATIONS) {
    Some(value) => value,
    None => panic!("MIN_ITERATIONS must be non-zero"),
};

/// Generates and verifies salted password hashes.
///
/// The key derivation is fed the UTF-8 bytes of the password and of the
/// base64-encoded salt string, so a stored `{hash, salt}` pair is
/// self-contained text.
#[derive(Clone)]
pub struct PasswordHasher {
    iterations: NonZeroU32,
    rng: SystemRandom,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").field("iterations", &self.iterations).finish()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { iterations: DEFAULT_ITERATIONS, rng: SystemRandom::new() }
    }
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Result<Self> {
        if iterations < MIN_ITERATIONS {
            return Err(Error::config(format!(
                "hash iterations must be at least {}, got {}",
                MIN_ITERATIONS, iterations
            )));
        }
        let iterations = NonZeroU32::new(iterations)
            .ok_or_else(|| Error::config("hash iterations must be non-zero"))?;
        Ok(Self { iterations, rng: SystemRandom::new() })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations.get()
    }

    /// Hash `password` under a freshly generated salt.
    pub fn hash(&self, password: &str) -> Result<Credential> {
        let mut salt_bytes = [0u8; SALT_LEN];
        self.rng
            .fill(&mut salt_bytes)
            .map_err(|_| Error::internal("failed to generate password salt"))?;
        let salt = STANDARD.encode(salt_bytes);

        let mut derived = [0u8; HASH_LEN];
        pbkdf2::derive(ALGORITHM, self.iterations, salt.as_bytes(), password.as_bytes(), &mut derived);

        Ok(Credential { hash: STANDARD.encode(derived), salt })
    }

    /// Check `password` against a stored hash and salt in constant time.
    ///
    /// A stored hash that is not valid base64 never matches.
    pub fn verify(&self, password: &str, hash: &str, salt: &str) -> bool {
        let Ok(expected) = STANDARD.decode(hash) else {
            return false;
        };
        pbkdf2::verify(ALGORITHM, self.iterations, salt.as_bytes(), password.as_bytes(), &expected)
            .is_ok()
    }
}
