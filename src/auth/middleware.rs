// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Runs [`JwtValidator::check_jwt`] in front of a router subtree. On failure
//! the error handler's response is returned and the inner handler never runs.
//!
//! # Usage
//!
//! ```rust,ignore
//! let validator = Arc::new(
//!     JwtValidator::builder()
//!         .signing_method(Algorithm::RS512)
//!         .key_resolver(StaticKeyResolver::new(public_key))
//!         .build()?,
//! );
//!
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .layer(axum::middleware::from_fn_with_state(validator, jwt_middleware));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::validator::JwtValidator;
use crate::util::safe_string_cut;

/// Upper bound on the error detail written to logs.
const MAX_LOGGED_DETAIL: usize = 256;

/// Authentication middleware function.
pub async fn jwt_middleware(
    State(validator): State<Arc<JwtValidator>>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    if let Err(rejection) = validator.check_jwt(&mut parts).await {
        let (error, response) = rejection.into_parts();
        let detail = error.to_string();
        tracing::warn!(
            method = %parts.method,
            path = %parts.uri.path(),
            error_code = error.error_code(),
            error = %safe_string_cut(&detail, MAX_LOGGED_DETAIL),
            "JWT validation failed"
        );
        return response;
    }

    if let Some(token) = super::jwt_from_extensions(&parts.extensions) {
        tracing::debug!(alg = ?token.algorithm(), kid = ?token.key_id(), "JWT validated");
    }

    next.run(Request::from_parts(parts, body)).await
}
