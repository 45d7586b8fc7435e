// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT validation for a single request.
//!
//! ## Flow
//!
//! 1. `OPTIONS` requests pass untouched unless auth on OPTIONS is enabled
//! 2. The configured extractor locates the raw token
//! 3. A missing token passes only when credentials are optional
//! 4. The header is decoded, the key resolver supplies the key and
//!    `jsonwebtoken` verifies the signature, then `exp`, `nbf` and the
//!    configured `iss` / `aud`
//! 5. The token's declared algorithm must equal the pinned signing method,
//!    and this is checked before any claim failure is reported
//! 6. `iat` must not lie in the future
//! 7. The verified token is attached to the request extensions
//!
//! Any failure invokes the error handler exactly once and stops the request.
//!
//! ## Security
//!
//! The signing method is mandatory: [`JwtValidatorBuilder::build`] fails
//! without one, and a token declaring any other algorithm is rejected even
//! when the resolver hands out a key for it.

use std::sync::Arc;

use axum::{
    http::{request::Parts, Method, StatusCode},
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, decode_header, Algorithm};

use super::claims::{claim_violation, ClaimRules, Claims, VerifiedToken, MAX_LEEWAY};
use super::context;
use super::error::AuthError;
use super::resolver::KeyResolver;
use super::token_extractor::{FromAuthHeader, TokenExtractor};
use crate::config::ConfigError;

/// Turns a validation failure into the response sent to the client.
pub trait ErrorHandler: Send + Sync {
    fn on_error(&self, parts: &Parts, message: &str) -> Response;
}

impl<F> ErrorHandler for F
where
    F: Fn(&Parts, &str) -> Response + Send + Sync,
{
    fn on_error(&self, parts: &Parts, message: &str) -> Response {
        self(parts, message)
    }
}

/// Default error handler: `401 Unauthorized` with the message as plain text.
pub fn on_error(_parts: &Parts, message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, message.to_string()).into_response()
}

/// A failed validation: the error for logs plus the response for the client.
#[derive(Debug)]
pub struct AuthRejection {
    error: AuthError,
    response: Response,
}

impl AuthRejection {
    pub fn error(&self) -> &AuthError {
        &self.error
    }

    pub fn into_parts(self) -> (AuthError, Response) {
        (self.error, self.response)
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        self.response
    }
}

/// Immutable validation settings shared by all requests.
pub struct JwtValidator {
    key_resolver: Arc<dyn KeyResolver>,
    credentials_optional: bool,
    error_handler: Arc<dyn ErrorHandler>,
    extractor: Arc<dyn TokenExtractor>,
    enable_auth_on_options: bool,
    signing_method: Algorithm,
    claim_rules: ClaimRules,
}

impl JwtValidator {
    pub fn builder() -> JwtValidatorBuilder {
        JwtValidatorBuilder::default()
    }

    pub fn signing_method(&self) -> Algorithm {
        self.signing_method
    }

    pub fn credentials_optional(&self) -> bool {
        self.credentials_optional
    }

    pub fn enable_auth_on_options(&self) -> bool {
        self.enable_auth_on_options
    }

    pub fn claim_rules(&self) -> &ClaimRules {
        &self.claim_rules
    }

    /// Validate the request and, on success, attach the verified token.
    ///
    /// `Ok(())` also covers the bypass paths (OPTIONS, optional credentials
    /// without a token), in which case nothing is attached.
    pub async fn check_jwt(&self, parts: &mut Parts) -> Result<(), AuthRejection> {
        if !self.enable_auth_on_options && parts.method == Method::OPTIONS {
            return Ok(());
        }

        match self.verify(parts).await {
            Ok(Some(token)) => {
                context::attach(&mut parts.extensions, token);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(error) => {
                let response = self
                    .error_handler
                    .on_error(parts, &error.client_message());
                Err(AuthRejection { error, response })
            }
        }
    }

    async fn verify(&self, parts: &Parts) -> Result<Option<VerifiedToken>, AuthError> {
        let token = self
            .extractor
            .extract(parts)
            .map_err(AuthError::Extraction)?;

        let Some(token) = token.filter(|t| !t.is_empty()) else {
            if self.credentials_optional {
                return Ok(None);
            }
            return Err(AuthError::TokenAbsent);
        };

        let header = decode_header(&token).map_err(|e| AuthError::Parse(e.into()))?;
        let key = self
            .key_resolver
            .resolve(&header)
            .await
            .map_err(|e| AuthError::Parse(e.into()))?;

        // The signature is verified under the declared algorithm; the pinned
        // method is compared once the signature is known to be good.
        let validation = self.claim_rules.validation(header.alg);
        let data = match decode::<Claims>(&token, &key, &validation) {
            Ok(data) => data,
            Err(err) => match claim_violation(err.kind()) {
                Some(violation) => {
                    self.check_algorithm(header.alg)?;
                    return Err(AuthError::TokenInvalid(violation));
                }
                None => return Err(AuthError::Parse(err.into())),
            },
        };

        self.check_algorithm(data.header.alg)?;

        let now = chrono::Utc::now().timestamp();
        self.claim_rules
            .check_issued_at(&data.claims, now)
            .map_err(AuthError::TokenInvalid)?;

        Ok(Some(VerifiedToken::new(token, data.header, data.claims)))
    }

    fn check_algorithm(&self, actual: Algorithm) -> Result<(), AuthError> {
        if actual != self.signing_method {
            return Err(AuthError::AlgorithmMismatch {
                expected: self.signing_method,
                actual,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for JwtValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtValidator")
            .field("credentials_optional", &self.credentials_optional)
            .field("enable_auth_on_options", &self.enable_auth_on_options)
            .field("signing_method", &self.signing_method)
            .field("claim_rules", &self.claim_rules)
            .finish_non_exhaustive()
    }
}

/// Builder for [`JwtValidator`].
///
/// Signing method and key resolver are required; everything else defaults:
/// credentials required, [`FromAuthHeader`], [`on_error`], OPTIONS bypassed,
/// 60 s leeway, no issuer / audience check. Leeway above [`MAX_LEEWAY`] is a
/// build error.
#[derive(Default)]
pub struct JwtValidatorBuilder {
    key_resolver: Option<Arc<dyn KeyResolver>>,
    credentials_optional: bool,
    error_handler: Option<Arc<dyn ErrorHandler>>,
    extractor: Option<Arc<dyn TokenExtractor>>,
    enable_auth_on_options: bool,
    signing_method: Option<Algorithm>,
    claim_rules: ClaimRules,
}

impl JwtValidatorBuilder {
    pub fn key_resolver(self, resolver: impl KeyResolver + 'static) -> Self {
        self.key_resolver_arc(Arc::new(resolver))
    }

    /// Use a resolver that is also held elsewhere (e.g. for health checks).
    pub fn key_resolver_arc(mut self, resolver: Arc<dyn KeyResolver>) -> Self {
        self.key_resolver = Some(resolver);
        self
    }

    pub fn credentials_optional(mut self, optional: bool) -> Self {
        self.credentials_optional = optional;
        self
    }

    pub fn error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    pub fn extractor(mut self, extractor: impl TokenExtractor + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    pub fn enable_auth_on_options(mut self, enable: bool) -> Self {
        self.enable_auth_on_options = enable;
        self
    }

    pub fn signing_method(mut self, alg: Algorithm) -> Self {
        self.signing_method = Some(alg);
        self
    }

    pub fn leeway(mut self, seconds: u64) -> Self {
        self.claim_rules.leeway = seconds;
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.claim_rules.issuer = Some(issuer.into());
        self
    }

    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.claim_rules.audience = Some(audience.into());
        self
    }

    pub fn build(self) -> Result<JwtValidator, ConfigError> {
        let signing_method = self
            .signing_method
            .ok_or(ConfigError::MissingSigningMethod)?;
        let key_resolver = self.key_resolver.ok_or(ConfigError::MissingKeyResolver)?;
        if self.claim_rules.leeway > MAX_LEEWAY {
            return Err(ConfigError::LeewayOutOfRange(self.claim_rules.leeway));
        }

        Ok(JwtValidator {
            key_resolver,
            credentials_optional: self.credentials_optional,
            error_handler: self
                .error_handler
                .unwrap_or_else(|| Arc::new(on_error) as Arc<dyn ErrorHandler>),
            extractor: self
                .extractor
                .unwrap_or_else(|| Arc::new(FromAuthHeader) as Arc<dyn TokenExtractor>),
            enable_auth_on_options: self.enable_auth_on_options,
            signing_method,
            claim_rules: self.claim_rules,
        })
    }
}
