// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Every failure keeps two renderings apart:
//!
//! - `Display` is the wrapped, log-facing detail returned to the caller of
//!   [`JwtValidator::check_jwt`](super::JwtValidator::check_jwt).
//! - [`AuthError::client_message`] is what the error handler shows the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jsonwebtoken::Algorithm;
use thiserror::Error;

/// A token source was present but could not be read.
///
/// Returning `Ok(None)` from an extractor means "no token"; this error is
/// reserved for credentials that were supplied but malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// `Authorization` header is not `Bearer <token>`
    #[error("Authorization header format must be Bearer {{token}}")]
    MalformedAuthHeader,
    /// Raised by a caller-supplied extractor
    #[error("{0}")]
    Other(String),
}

/// The key resolver could not produce verification key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyResolutionError {
    /// No key matches the token's `kid`
    #[error("no matching key found for token")]
    NoMatchingKey,
    /// Key set could not be fetched
    #[error("failed to fetch JWKS: {0}")]
    JwksFetch(String),
    /// Key exists but cannot be used for verification
    #[error("unsupported key: {0}")]
    UnsupportedKey(String),
    /// Raised by a caller-supplied resolver
    #[error("{0}")]
    Other(String),
}

/// Structural, signature or key-resolution failure while parsing a token.
#[derive(Debug, Error)]
pub enum TokenParseError {
    #[error("{0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("{0}")]
    KeyResolution(#[from] KeyResolutionError),
}

/// A registered claim rejected the token after its signature verified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimViolation {
    #[error("token is expired")]
    Expired,
    #[error("token is not valid yet")]
    NotYetValid,
    #[error("token used before issued")]
    IssuedInFuture,
    #[error("claim '{0}' has an invalid format")]
    InvalidFormat(String),
    #[error("token issuer is invalid")]
    InvalidIssuer,
    #[error("token audience is invalid")]
    InvalidAudience,
}

/// Reasons a request fails JWT validation.
///
/// All variants are terminal for the request and map to `401 Unauthorized`.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credentials were present but malformed
    #[error("error extracting token: {0}")]
    Extraction(#[source] ExtractError),
    /// No token and credentials are required
    #[error("required authorization token not found")]
    TokenAbsent,
    /// Signature, structure or key resolution failed
    #[error("error parsing token: {0}")]
    Parse(#[source] TokenParseError),
    /// Token declares a different algorithm than the pinned one
    #[error("Expected {expected:?} signing method but token specified {actual:?}")]
    AlgorithmMismatch {
        expected: Algorithm,
        actual: Algorithm,
    },
    /// Token parsed but its claims are not currently valid
    #[error("invalid token: {0}")]
    TokenInvalid(#[source] ClaimViolation),
}

impl AuthError {
    /// Stable machine-readable code, used in logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Extraction(_) => "malformed_credentials",
            AuthError::TokenAbsent => "token_absent",
            AuthError::Parse(_) => "token_parse_failure",
            AuthError::AlgorithmMismatch { .. } => "algorithm_mismatch",
            AuthError::TokenInvalid(_) => "token_invalid",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    /// Message handed to the error handler.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::Extraction(e) => e.to_string(),
            AuthError::TokenAbsent => "Required authorization token not found".to_string(),
            AuthError::Parse(e) => e.to_string(),
            AuthError::AlgorithmMismatch { .. } => self.to_string(),
            AuthError::TokenInvalid(_) => "The token is not valid".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status_code(), self.client_message()).into_response()
    }
}
