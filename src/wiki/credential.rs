/*
 * Copyright 2019-2020 Wren Powell
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use digest::Digest;
use rmp_serde::{from_read, to_vec};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sodiumoxide::crypto::pwhash::argon2id13::{
    pwhash, pwhash_verify, HashedPassword, HASHEDPASSWORDBYTES, MEMLIMIT_INTERACTIVE,
    OPSLIMIT_INTERACTIVE,
};
use sodiumoxide::utils::memcmp;

use crate::env::init;

/// The prefix of a password hash produced by [`PasswordScheme::Argon2id`].
const ARGON2ID_PREFIX: &str = "$argon2id$";

/// The length of a hex-encoded SHA-256 digest.
const LEGACY_DIGEST_LEN: usize = 64;

/// A method of hashing passwords before they are stored.
///
/// Whichever scheme is configured, records written by either scheme can be verified, since the
/// format of a stored hash is detected from the hash itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PasswordScheme {
    /// Argon2id with a random per-record salt and interactive cost limits.
    Argon2id,

    /// The unsalted hex SHA-256 digest of `"{username}:{password}"`.
    ///
    /// This scheme is weak: identical credentials produce identical digests and the digests are
    /// cheap to brute force. It only exists to stay bit-compatible with existing records.
    LegacySha256,
}

impl Default for PasswordScheme {
    fn default() -> Self {
        PasswordScheme::Argon2id
    }
}

impl fmt::Display for PasswordScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordScheme::Argon2id => f.write_str("argon2id"),
            PasswordScheme::LegacySha256 => f.write_str("legacy-sha256"),
        }
    }
}

impl FromStr for PasswordScheme {
    type Err = crate::Error;

    fn from_str(value: &str) -> crate::Result<Self> {
        match value {
            "argon2id" => Ok(PasswordScheme::Argon2id),
            "legacy-sha256" => Ok(PasswordScheme::LegacySha256),
            _ => Err(crate::Error::InvalidConfig(format!(
                "unknown password scheme {:?}",
                value
            ))),
        }
    }
}

impl PasswordScheme {
    /// Hash the password of `username` for storage.
    pub fn hash(&self, username: &str, password: &str) -> crate::Result<String> {
        match self {
            PasswordScheme::Argon2id => {
                init();
                let hashed = pwhash(
                    password.as_bytes(),
                    OPSLIMIT_INTERACTIVE,
                    MEMLIMIT_INTERACTIVE,
                )
                .map_err(|_| anyhow!("Failed to hash password."))?;
                encode_hashed_password(&hashed)
            }
            PasswordScheme::LegacySha256 => Ok(legacy_digest(username, password)),
        }
    }
}

/// Return the hex SHA-256 digest of `"{username}:{password}"`.
fn legacy_digest(username: &str, password: &str) -> String {
    let digest = Sha256::digest(format!("{}:{}", username, password).as_bytes());
    format!("{:x}", digest)
}

/// Convert a NUL-padded Argon2id hash into the string stored in a record.
fn encode_hashed_password(hashed: &HashedPassword) -> crate::Result<String> {
    let bytes: &[u8] = hashed.as_ref();
    let end = bytes.iter().position(|&byte| byte == 0).unwrap_or(bytes.len());
    String::from_utf8(bytes[..end].to_vec()).map_err(|_| crate::Error::Corrupt)
}

/// Convert the string stored in a record back into a NUL-padded Argon2id hash.
fn decode_hashed_password(stored: &str) -> Option<HashedPassword> {
    if stored.len() > HASHEDPASSWORDBYTES {
        return None;
    }
    let mut bytes = stored.as_bytes().to_vec();
    bytes.resize(HASHEDPASSWORDBYTES, 0);
    HashedPassword::from_slice(&bytes)
}

/// Return whether `stored` looks like a digest produced by [`PasswordScheme::LegacySha256`].
fn is_legacy_digest(stored: &str) -> bool {
    stored.len() == LEGACY_DIGEST_LEN && stored.bytes().all(|byte| byte.is_ascii_hexdigit())
}

/// Return whether `password` matches the `stored` hash for `username`.
///
/// # Errors
/// - `Error::Corrupt`: The stored hash is in no known format.
pub fn verify_password(stored: &str, username: &str, password: &str) -> crate::Result<bool> {
    if stored.starts_with(ARGON2ID_PREFIX) {
        init();
        let hashed = decode_hashed_password(stored).ok_or(crate::Error::Corrupt)?;
        Ok(pwhash_verify(&hashed, password.as_bytes()))
    } else if is_legacy_digest(stored) {
        init();
        let expected = legacy_digest(username, password);
        Ok(memcmp(
            expected.as_bytes(),
            stored.to_ascii_lowercase().as_bytes(),
        ))
    } else {
        Err(crate::Error::Corrupt)
    }
}

/// The record stored for each admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct AdminRecord {
    pub password_hash: String,
    pub role: String,
}

impl AdminRecord {
    pub fn encode(&self) -> crate::Result<Vec<u8>> {
        to_vec(self).map_err(|error| crate::Error::Store(anyhow::Error::from(error)))
    }

    pub fn decode(data: &[u8]) -> crate::Result<Self> {
        from_read(data).map_err(|_| crate::Error::Corrupt)
    }
}

/// Decode the body of a user credential blob.
pub(crate) fn decode_user_record(data: Vec<u8>) -> crate::Result<String> {
    String::from_utf8(data).map_err(|_| crate::Error::Corrupt)
}
