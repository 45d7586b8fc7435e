// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token (JWT) authentication for Axum services.
//!
//! ## Auth Flow
//!
//! 1. Client sends `Authorization: Bearer <JWT>` (or whatever the configured
//!    [`TokenExtractor`] chain understands)
//! 2. [`jwt_middleware`] runs the [`JwtValidator`]:
//!    - resolves the verification key through the [`KeyResolver`]
//!    - verifies signature and structure
//!    - pins the signing algorithm
//!    - checks `exp` / `nbf` / `iat` (and `iss` / `aud` when configured)
//! 3. The [`VerifiedToken`] is attached to the request; handlers read it with
//!    [`Jwt`], [`OptionalJwt`] or [`jwt_from_extensions`]
//!
//! ## Security
//!
//! - A validator cannot be built without a signing method
//! - The declared algorithm is compared independently of the resolver
//! - Clock skew tolerance defaults to 60 seconds

pub mod claims;
pub mod context;
pub mod error;
pub mod extractor;
pub mod issue;
pub mod jwks;
pub mod middleware;
pub mod resolver;
pub mod token_extractor;
pub mod validator;

pub use claims::{Claims, ClaimRules, VerifiedToken, DEFAULT_LEEWAY, MAX_LEEWAY};
pub use context::{jwt_from_extensions, jwt_from_request};
pub use error::{AuthError, ClaimViolation, ExtractError, KeyResolutionError, TokenParseError};
pub use extractor::{Jwt, OptionalJwt};
pub use issue::{new_jwt_with_claims, IssueError, ISSUING_ALGORITHM};
pub use jwks::JwksResolver;
pub use middleware::jwt_middleware;
pub use resolver::{KeyResolver, StaticKeyResolver};
pub use token_extractor::{FromAuthHeader, FromFirst, FromParameter, TokenExtractor};
pub use validator::{on_error, AuthRejection, ErrorHandler, JwtValidator, JwtValidatorBuilder};
