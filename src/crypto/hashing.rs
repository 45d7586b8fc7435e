// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! bcrypt password hashing.

use bcrypt::DEFAULT_COST;

use super::CryptoError;

/// Hash `password` with bcrypt at the default cost.
pub fn generate_password_hash(password: &[u8]) -> Result<String, CryptoError> {
    Ok(bcrypt::hash(password, DEFAULT_COST)?)
}

/// `true` only if `given` matches `hash`. A malformed hash never matches.
pub fn compare_password_hash(hash: &str, given: &[u8]) -> bool {
    bcrypt::verify(given, hash).unwrap_or(false)
}
