//! Salt, hash and activation-token generation for new profiles.
//!
//! The hash is the raw 64-byte Argon2id output over password and salt,
//! hex-encoded to the 128 characters a profile stores.

use argon2::Argon2;
use argon2::password_hash::Output;

use crate::error::ValidationError;
use crate::profile::{ACTIVATION_TOKEN_LEN, HASH_LEN, SALT_LEN};
use crate::validate::{is_hex, normalize_hex};

/// Random 32-byte salt, hex-encoded.
pub fn generate_salt() -> String {
    let bytes: [u8; SALT_LEN / 2] = rand::random();
    hex::encode(bytes)
}

/// Random 16-byte activation token, hex-encoded.
pub fn generate_activation_token() -> String {
    let bytes: [u8; ACTIVATION_TOKEN_LEN / 2] = rand::random();
    hex::encode(bytes)
}

pub fn hash_password(password: &str, salt: &str) -> Result<String, ValidationError> {
    derive(password, salt).map(hex::encode)
}

/// Recompute the hash for `password` and compare it with the stored one.
///
/// The comparison goes through [`Output`], whose equality is constant-time.
pub fn verify_password(password: &str, salt: &str, hash: &str) -> bool {
    let Ok(computed) = derive(password, salt) else {
        return false;
    };
    let Ok(stored) = hex::decode(normalize_hex(hash)) else {
        return false;
    };
    match (Output::new(&computed), Output::new(&stored)) {
        (Ok(computed), Ok(stored)) => computed == stored,
        _ => false,
    }
}

fn derive(password: &str, salt: &str) -> Result<[u8; HASH_LEN / 2], ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::invalid("password", "empty"));
    }

    let salt = normalize_hex(salt);
    if !is_hex(&salt) || salt.len() != SALT_LEN {
        return Err(ValidationError::invalid(
            "profileSalt",
            format!("expected {SALT_LEN} hex characters"),
        ));
    }
    let salt_bytes = hex::decode(&salt)
        .map_err(|e| ValidationError::invalid("profileSalt", e.to_string()))?;

    let mut out = [0u8; HASH_LEN / 2];
    Argon2::default()
        .hash_password_into(password.as_bytes(), &salt_bytes, &mut out)
        .map_err(|e| ValidationError::invalid("password", e.to_string()))?;

    Ok(out)
}
