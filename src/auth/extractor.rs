// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the verified token.
//!
//! These only read what [`jwt_middleware`](super::jwt_middleware) attached;
//! they never validate anything themselves.
//!
//! ```rust,ignore
//! async fn my_handler(Jwt(token): Jwt) -> impl IntoResponse {
//!     token.subject().unwrap_or_default().to_string()
//! }
//! ```

use std::convert::Infallible;
use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::claims::VerifiedToken;
use super::context::jwt_from_extensions;
use super::error::AuthError;

/// Requires a verified token.
///
/// Rejects with `401` when none is attached, e.g. on a route without the
/// middleware or when credentials are optional and none were sent.
pub struct Jwt(pub Arc<VerifiedToken>);

impl<S> FromRequestParts<S> for Jwt
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        jwt_from_extensions(&parts.extensions)
            .map(Jwt)
            .ok_or(AuthError::TokenAbsent)
    }
}

/// The verified token if one was attached.
pub struct OptionalJwt(pub Option<Arc<VerifiedToken>>);

impl<S> FromRequestParts<S> for OptionalJwt
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalJwt(jwt_from_extensions(&parts.extensions)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::context::attach;
    use axum::http::Request;
    use jsonwebtoken::{Algorithm, Header};

    fn empty_parts() -> Parts {
        Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    fn verified() -> VerifiedToken {
        VerifiedToken::new(
            "a.b.c".to_string(),
            Header::new(Algorithm::RS512),
            Default::default(),
        )
    }

    #[tokio::test]
    async fn jwt_requires_attached_token() {
        let mut parts = empty_parts();
        let result = Jwt::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::TokenAbsent)));
    }

    #[tokio::test]
    async fn jwt_reads_attached_token() {
        let mut parts = empty_parts();
        attach(&mut parts.extensions, verified());

        let Jwt(token) = Jwt::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(token.raw(), "a.b.c");
    }

    #[tokio::test]
    async fn optional_jwt_returns_none_without_token() {
        let mut parts = empty_parts();
        let OptionalJwt(token) = OptionalJwt::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(token.is_none());
    }
}
