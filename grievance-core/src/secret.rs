//! At-rest encryption of sensitive grievance fields
//!
//! Stored values are tagged: everything written by [`SecretStore::encrypt`] carries
//! the `enc:v1:` prefix followed by base64(nonce || AES-256-GCM ciphertext).
//! Untagged values are legacy rows persisted before encryption was introduced and
//! are passed through as plaintext by [`SecretStore::reveal`].

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::SecretError;

/// Wire prefix marking a value as encrypted (version 1).
pub const ENC_PREFIX: &str = "enc:v1:";

/// Marker returned when a tagged value fails authentication (wrong key or
/// corrupted row). Callers display it instead of failing a whole listing.
pub const DECRYPT_FAILED: &str = "[decryption failed]";

const NONCE_LEN: usize = 12;

/// Insecure development fallback used when no key is configured. The service
/// logs a warning at startup when this is in effect.
pub const FALLBACK_PASSPHRASE: &str = "insecure-dev-encryption-key-change-me";

/// How a stored value is represented at rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredText<'a> {
    /// Tagged ciphertext; payload is the base64 portion after the prefix.
    Encrypted(&'a str),
    /// Legacy row written before encryption was introduced.
    Plaintext(&'a str),
}

impl<'a> StoredText<'a> {
    pub fn classify(stored: &'a str) -> Self {
        match stored.strip_prefix(ENC_PREFIX) {
            Some(payload) => StoredText::Encrypted(payload),
            None => StoredText::Plaintext(stored),
        }
    }
}

/// Reversible field encryption with a process-wide symmetric key.
#[derive(Clone)]
pub struct SecretStore {
    key: [u8; 32],
}

impl std::fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretStore").finish_non_exhaustive()
    }
}

impl SecretStore {
    /// Derive the AES-256 key from a configured passphrase.
    pub fn new(passphrase: &str) -> Self {
        let digest = Sha256::digest(passphrase.as_bytes());
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self { key }
    }

    /// Fallback store for deployments that never configured a key.
    pub fn insecure_fallback() -> Self {
        Self::new(FALLBACK_PASSPHRASE)
    }

    fn cipher(&self) -> Result<Aes256Gcm, SecretError> {
        Aes256Gcm::new_from_slice(&self.key).map_err(|_| SecretError::Crypto)
    }

    /// Encrypt a field. Empty input maps to empty output.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, SecretError> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }
        let cipher = self.cipher()?;
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);
        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| SecretError::Crypto)?;
        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);
        Ok(format!("{ENC_PREFIX}{}", BASE64.encode(blob)))
    }

    /// Decrypt a tagged value. Empty input maps to empty output; untagged input
    /// is an error (use [`SecretStore::reveal`] for legacy-tolerant reads).
    pub fn decrypt(&self, stored: &str) -> Result<String, SecretError> {
        if stored.is_empty() {
            return Ok(String::new());
        }
        let payload = match StoredText::classify(stored) {
            StoredText::Encrypted(payload) => payload,
            StoredText::Plaintext(_) => return Err(SecretError::Crypto),
        };
        let blob = BASE64.decode(payload.as_bytes())?;
        if blob.len() <= NONCE_LEN {
            return Err(SecretError::Crypto);
        }
        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
        let cipher = self.cipher()?;
        let nonce = Nonce::from_slice(nonce_bytes);
        let plaintext = cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| SecretError::Crypto)?;
        String::from_utf8(plaintext).map_err(|_| SecretError::Crypto)
    }

    /// Read a stored value for display: tagged values are decrypted (failures
    /// surface [`DECRYPT_FAILED`] rather than an error), legacy untagged values
    /// pass through unchanged.
    pub fn reveal(&self, stored: &str) -> String {
        match StoredText::classify(stored) {
            StoredText::Plaintext(plain) => plain.to_string(),
            StoredText::Encrypted(_) => self
                .decrypt(stored)
                .unwrap_or_else(|_| DECRYPT_FAILED.to_string()),
        }
    }
}
