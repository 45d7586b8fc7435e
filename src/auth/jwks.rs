// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) backed key resolution.
//!
//! ## Security
//!
//! - Keys are cached with a configurable TTL
//! - Tokens carrying a `kid` only ever verify against the key with that id
//! - The algorithm advertised by a JWK is never trusted; the validator pins it
//!
//! ## Usage
//!
//! ```rust,ignore
//! let jwks = Arc::new(JwksResolver::new("https://issuer.example/.well-known/jwks.json")?);
//! let validator = JwtValidator::builder()
//!     .signing_method(Algorithm::RS256)
//!     .key_resolver_arc(jwks.clone())
//!     .build()?;
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet};
use jsonwebtoken::{DecodingKey, Header};
use tokio::sync::RwLock;

use super::error::KeyResolutionError;
use super::resolver::KeyResolver;

/// Default JWKS cache TTL (5 minutes).
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Timeout for a single JWKS fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// JWKS cache entry.
struct CacheEntry {
    jwks: JwkSet,
    fetched_at: Instant,
}

/// Key resolver that fetches and caches a remote key set.
#[derive(Clone)]
pub struct JwksResolver {
    /// JWKS endpoint
    jwks_url: String,
    /// Cache TTL
    cache_ttl: Duration,
    /// Cached JWKS
    cache: Arc<RwLock<Option<CacheEntry>>>,
    /// HTTP client
    client: reqwest::Client,
}

impl JwksResolver {
    /// Create a new JWKS resolver.
    ///
    /// # Arguments
    /// - `jwks_url`: The JWKS endpoint URL (e.g., `https://issuer.example/.well-known/jwks.json`)
    pub fn new(jwks_url: impl Into<String>) -> Result<Self, KeyResolutionError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| KeyResolutionError::JwksFetch(e.to_string()))?;

        Ok(Self {
            jwks_url: jwks_url.into(),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: Arc::new(RwLock::new(None)),
            client,
        })
    }

    /// Create with custom cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Get the JWKS URL.
    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Fetch JWKS (with caching).
    async fn get_jwks(&self) -> Result<JwkSet, KeyResolutionError> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = &*cache {
                if entry.fetched_at.elapsed() < self.cache_ttl {
                    return Ok(entry.jwks.clone());
                }
            }
        }

        let jwks = self.fetch_jwks().await?;
        self.store(jwks.clone()).await;
        Ok(jwks)
    }

    async fn store(&self, jwks: JwkSet) {
        let mut cache = self.cache.write().await;
        *cache = Some(CacheEntry {
            jwks,
            fetched_at: Instant::now(),
        });
    }

    /// Fetch JWKS from the endpoint.
    async fn fetch_jwks(&self) -> Result<JwkSet, KeyResolutionError> {
        tracing::debug!(url = %self.jwks_url, "fetching JWKS");

        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url = %self.jwks_url, error = %e, "JWKS request failed");
                KeyResolutionError::JwksFetch(e.to_string())
            })?;

        if !response.status().is_success() {
            tracing::warn!(url = %self.jwks_url, status = %response.status(), "JWKS endpoint returned an error");
            return Err(KeyResolutionError::JwksFetch(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| KeyResolutionError::JwksFetch(e.to_string()))
    }

    /// Force refresh the JWKS cache.
    pub async fn refresh(&self) -> Result<(), KeyResolutionError> {
        let jwks = self.fetch_jwks().await?;
        self.store(jwks).await;
        Ok(())
    }

    /// Check if JWKS is currently cached and valid.
    pub async fn is_cached(&self) -> bool {
        let cache = self.cache.read().await;
        match &*cache {
            Some(entry) => entry.fetched_at.elapsed() < self.cache_ttl,
            None => false,
        }
    }

    /// Seed the cache, e.g. from a key set bundled with the deployment.
    pub async fn prime(&self, jwks: JwkSet) {
        self.store(jwks).await;
    }
}

#[async_trait]
impl KeyResolver for JwksResolver {
    async fn resolve(&self, header: &Header) -> Result<DecodingKey, KeyResolutionError> {
        let jwks = self.get_jwks().await?;
        select_key(&jwks, header.kid.as_deref())
    }
}

/// Pick the verification key for a token.
///
/// With a `kid` only the matching key is eligible. Without one, the first
/// usable key in the set is taken.
fn select_key(jwks: &JwkSet, kid: Option<&str>) -> Result<DecodingKey, KeyResolutionError> {
    match kid {
        Some(kid) => {
            let jwk = jwks
                .keys
                .iter()
                .find(|k| k.common.key_id.as_deref() == Some(kid))
                .ok_or(KeyResolutionError::NoMatchingKey)?;
            jwk_to_decoding_key(jwk)
        }
        None => jwks
            .keys
            .iter()
            .find_map(|jwk| jwk_to_decoding_key(jwk).ok())
            .ok_or(KeyResolutionError::NoMatchingKey),
    }
}

/// Convert a JWK to a DecodingKey.
fn jwk_to_decoding_key(jwk: &Jwk) -> Result<DecodingKey, KeyResolutionError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
            .map_err(|e| KeyResolutionError::UnsupportedKey(format!("invalid RSA key: {e}"))),
        AlgorithmParameters::EllipticCurve(ec) => DecodingKey::from_ec_components(&ec.x, &ec.y)
            .map_err(|e| KeyResolutionError::UnsupportedKey(format!("invalid EC key: {e}"))),
        _ => Err(KeyResolutionError::UnsupportedKey(
            "unsupported key type in JWKS".to_string(),
        )),
    }
}

impl std::fmt::Debug for JwksResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksResolver")
            .field("jwks_url", &self.jwks_url)
            .field("cache_ttl", &self.cache_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;

    // Public half of a throwaway 2048-bit test key.
    const N: &str = "u1SU1LfVLPHCozMxH2Mo4lgOEePzNm0tRgeLezV6ffAt0gunVTLw7onLRnrq0_IzW7yWR7QkrmBL7jTKEn5u-qKhbwKfBstIs-bMY2Zkp18gnTxKLxoS2tFczGkPLPgizskuemMghRniWaoLcyehkd3qqGElvW_VDL5AaWTg0nLVkjRo9z-40RQzuVaE8AkAFmxZzow3x-VJYKdjykkJ0iT9wCS0DRTXu269V264Vf_3jvredZiKRkgwlL9xNAwxXFg0x_XFw005UWVRIkdgcKWTjpBP2dPwVZ4WWC-9aGVd-Gyn1o0CLelf4rEjGoXbAAEgAqeGUxrcIlbjXfbcmw";

    fn rsa_jwk(kid: &str) -> serde_json::Value {
        serde_json::json!({ "kty": "RSA", "kid": kid, "use": "sig", "n": N, "e": "AQAB" })
    }

    fn key_set(keys: Vec<serde_json::Value>) -> JwkSet {
        serde_json::from_value(serde_json::json!({ "keys": keys })).unwrap()
    }

    fn header_with_kid(kid: Option<&str>) -> Header {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = kid.map(str::to_string);
        header
    }

    #[test]
    fn jwks_resolver_creation() {
        let resolver = JwksResolver::new("https://example.com/.well-known/jwks.json").unwrap();
        assert_eq!(
            resolver.jwks_url(),
            "https://example.com/.well-known/jwks.json"
        );
    }

    #[test]
    fn custom_cache_ttl() {
        let resolver = JwksResolver::new("https://example.com/.well-known/jwks.json")
            .unwrap()
            .with_cache_ttl(Duration::from_secs(60));
        assert_eq!(resolver.cache_ttl, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn cache_initially_empty() {
        let resolver = JwksResolver::new("https://example.com/.well-known/jwks.json").unwrap();
        assert!(!resolver.is_cached().await);
    }

    #[test]
    fn selects_key_by_kid() {
        let jwks = key_set(vec![rsa_jwk("a"), rsa_jwk("b")]);
        assert!(select_key(&jwks, Some("b")).is_ok());
        assert_eq!(
            select_key(&jwks, Some("c")).err(),
            Some(KeyResolutionError::NoMatchingKey)
        );
    }

    #[test]
    fn falls_back_to_first_usable_key_without_kid() {
        let jwks = key_set(vec![
            serde_json::json!({ "kty": "oct", "kid": "sym", "k": "c2VjcmV0" }),
            rsa_jwk("a"),
        ]);
        assert!(select_key(&jwks, None).is_ok());
        assert_eq!(
            select_key(&key_set(vec![]), None).err(),
            Some(KeyResolutionError::NoMatchingKey)
        );
    }

    #[test]
    fn symmetric_keys_are_unsupported() {
        let jwks = key_set(vec![serde_json::json!({ "kty": "oct", "kid": "sym", "k": "c2VjcmV0" })]);
        assert!(matches!(
            select_key(&jwks, Some("sym")),
            Err(KeyResolutionError::UnsupportedKey(_))
        ));
    }

    #[tokio::test]
    async fn resolves_from_primed_cache() {
        let resolver = JwksResolver::new("https://example.invalid/jwks.json").unwrap();
        resolver.prime(key_set(vec![rsa_jwk("a")])).await;

        assert!(resolver.is_cached().await);
        assert!(resolver.resolve(&header_with_kid(Some("a"))).await.is_ok());
        assert_eq!(
            resolver.resolve(&header_with_kid(Some("z"))).await.err(),
            Some(KeyResolutionError::NoMatchingKey)
        );
    }
}
