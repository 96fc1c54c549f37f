//! Credential hashing for user passwords.
//!
//! Produces the stored form of a password: a PHC string that embeds the
//! algorithm, version, cost parameters, salt and derived key, so a verifier
//! needs nothing besides the string itself.

use core::str::FromStr;

use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Salt length in bytes; a fresh salt is drawn for every call.
pub const SALT_LEN: usize = 16;

/// Argon2 iteration count (t_cost).
pub const ITERATIONS: u32 = 256;

/// Argon2 lane count (p_cost).
pub const PARALLELISM: u32 = 1;

/// Argon2 memory cost in KiB (m_cost).
pub const MEMORY_COST_KIB: u32 = 4096;

/// Derived key length in bytes.
pub const HASH_LEN: usize = 32;

/// Password algorithm identifiers as stored on user records.
///
/// Users imported from other systems keep their original algorithm tag, so
/// the set is wider than what [`encrypt_password`] can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsersPasswordAlgorithm {
    Argon2i,
    Argon2id,
    Argon2d,
    #[serde(rename = "SHA1")]
    Sha1,
    #[serde(rename = "SHA256")]
    Sha256,
    #[serde(rename = "MD5")]
    Md5,
    Bcrypt,
    Legacy,
}

impl UsersPasswordAlgorithm {
    pub const ALL: [UsersPasswordAlgorithm; 8] = [
        UsersPasswordAlgorithm::Argon2i,
        UsersPasswordAlgorithm::Argon2id,
        UsersPasswordAlgorithm::Argon2d,
        UsersPasswordAlgorithm::Sha1,
        UsersPasswordAlgorithm::Sha256,
        UsersPasswordAlgorithm::Md5,
        UsersPasswordAlgorithm::Bcrypt,
        UsersPasswordAlgorithm::Legacy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UsersPasswordAlgorithm::Argon2i => "Argon2i",
            UsersPasswordAlgorithm::Argon2id => "Argon2id",
            UsersPasswordAlgorithm::Argon2d => "Argon2d",
            UsersPasswordAlgorithm::Sha1 => "SHA1",
            UsersPasswordAlgorithm::Sha256 => "SHA256",
            UsersPasswordAlgorithm::Md5 => "MD5",
            UsersPasswordAlgorithm::Bcrypt => "Bcrypt",
            UsersPasswordAlgorithm::Legacy => "Legacy",
        }
    }
}

impl core::fmt::Display for UsersPasswordAlgorithm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UsersPasswordAlgorithm {
    type Err = PasswordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| PasswordError::UnknownAlgorithm(s.to_string()))
    }
}

/// Password hashing error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// The algorithm is a known identifier but cannot be used for new hashes.
    #[error("unsupported encryption method: {0}")]
    UnsupportedAlgorithm(UsersPasswordAlgorithm),

    /// The identifier is not part of the algorithm set at all.
    #[error("unsupported encryption method: {0}")]
    UnknownAlgorithm(String),

    /// Key derivation failed (parameters or encoding rejected by argon2).
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Hash `password` for storage using `method`.
///
/// Only [`UsersPasswordAlgorithm::Argon2i`] is accepted; anything else fails
/// with [`PasswordError::UnsupportedAlgorithm`] before a salt is drawn or any
/// derivation runs.
pub fn encrypt_password(
    password: &str,
    method: UsersPasswordAlgorithm,
) -> Result<String, PasswordError> {
    let hasher = hasher_for(method)?;

    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    derive(&hasher, password, &salt)
}

/// Same as [`encrypt_password`] with a caller-provided salt, for reproducible
/// fixtures. Never reuse a salt for real credentials.
pub fn encrypt_password_with_salt(
    password: &str,
    method: UsersPasswordAlgorithm,
    salt: &[u8; SALT_LEN],
) -> Result<String, PasswordError> {
    let hasher = hasher_for(method)?;
    derive(&hasher, password, salt)
}

fn hasher_for(method: UsersPasswordAlgorithm) -> Result<Argon2<'static>, PasswordError> {
    let algorithm = match method {
        UsersPasswordAlgorithm::Argon2i => Algorithm::Argon2i,
        UsersPasswordAlgorithm::Argon2id
        | UsersPasswordAlgorithm::Argon2d
        | UsersPasswordAlgorithm::Sha1
        | UsersPasswordAlgorithm::Sha256
        | UsersPasswordAlgorithm::Md5
        | UsersPasswordAlgorithm::Bcrypt
        | UsersPasswordAlgorithm::Legacy => {
            tracing::warn!(method = %method, "rejected unsupported password algorithm");
            return Err(PasswordError::UnsupportedAlgorithm(method));
        }
    };

    let params = Params::new(MEMORY_COST_KIB, ITERATIONS, PARALLELISM, Some(HASH_LEN))
        .map_err(|e| PasswordError::Hashing(e.to_string()))?;

    Ok(Argon2::new(algorithm, Version::V0x13, params))
}

fn derive(hasher: &Argon2<'_>, password: &str, salt: &[u8]) -> Result<String, PasswordError> {
    let salt = SaltString::encode_b64(salt).map_err(|e| PasswordError::Hashing(e.to_string()))?;

    let hash = hasher
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hashing(e.to_string()))?;

    tracing::debug!(algorithm = %hash.algorithm, "password hashed");
    Ok(hash.to_string())
}
