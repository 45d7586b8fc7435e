// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key resolution for signature verification.

use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, Header};

use super::error::KeyResolutionError;

/// Maps a parsed but unverified token header to the key that verifies it.
///
/// Implementations may inspect `kid` (or any other header field) to support
/// key rotation and multiple issuers, and may perform I/O. The validator
/// adds no timeout of its own around this call.
///
/// The resolver never decides which algorithm is acceptable; the validator
/// compares the pinned signing method against the header independently.
#[async_trait]
pub trait KeyResolver: Send + Sync {
    async fn resolve(&self, header: &Header) -> Result<DecodingKey, KeyResolutionError>;
}

#[async_trait]
impl<F> KeyResolver for F
where
    F: Fn(&Header) -> Result<DecodingKey, KeyResolutionError> + Send + Sync,
{
    async fn resolve(&self, header: &Header) -> Result<DecodingKey, KeyResolutionError> {
        self(header)
    }
}

/// Resolves every token to the same key.
#[derive(Clone)]
pub struct StaticKeyResolver {
    key: DecodingKey,
}

impl StaticKeyResolver {
    pub fn new(key: DecodingKey) -> Self {
        Self { key }
    }
}

#[async_trait]
impl KeyResolver for StaticKeyResolver {
    async fn resolve(&self, _header: &Header) -> Result<DecodingKey, KeyResolutionError> {
        Ok(self.key.clone())
    }
}

impl std::fmt::Debug for StaticKeyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("StaticKeyResolver").finish_non_exhaustive()
    }
}
