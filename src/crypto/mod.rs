// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Cryptography Helpers
//!
//! Thin wrappers over well-known primitives, used to mint and protect tokens:
//!
//! - [`rsa`]: RSA key generation and PEM import/export (PKCS#1 private, PKIX public)
//! - [`encryption`]: AES-CFB over a base64 payload with a random IV prefix
//! - [`hashing`]: bcrypt password hashing
//! - [`secret_key`]: random alphanumeric secrets

pub mod encryption;
pub mod hashing;
pub mod rsa;
pub mod secret_key;

pub use encryption::{decrypt, encrypt};
pub use hashing::{compare_password_hash, generate_password_hash};
pub use secret_key::generate_secret_key;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("failed to parse PEM block: {0}")]
    Pem(#[from] pem::PemError),

    #[error("invalid PKCS#1 key: {0}")]
    Pkcs1(#[from] ::rsa::pkcs1::Error),

    #[error("invalid PKIX public key: {0}")]
    Spki(#[from] ::rsa::pkcs8::spki::Error),

    #[error("RSA error: {0}")]
    Rsa(#[from] ::rsa::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid key size {0}: must be 16, 24 or 32 bytes")]
    InvalidKeyLength(usize),

    #[error("ciphertext too short")]
    CiphertextTooShort,

    #[error("decrypted payload is not valid base64")]
    MalformedPayload,

    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}
