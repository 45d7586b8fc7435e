// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified tokens and registered-claim rules.
//!
//! `exp`, `nbf`, `iss` and `aud` are checked by `jsonwebtoken` through the
//! [`Validation`] built in [`ClaimRules::validation`]; only `iat` is checked
//! here.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, Header, Validation};
use serde_json::Value;

use super::error::ClaimViolation;

/// Free-form claim set of a token.
pub type Claims = serde_json::Map<String, Value>;

/// Clock skew tolerance (60 seconds).
pub const DEFAULT_LEEWAY: u64 = 60;

/// Largest accepted clock skew tolerance (one day).
pub const MAX_LEEWAY: u64 = 86_400;

/// A token whose signature, algorithm and registered claims all checked out.
///
/// Only the validator builds these, and only on success, so a token found in
/// the request extensions is always a valid one.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    raw: String,
    header: Header,
    claims: Claims,
}

impl VerifiedToken {
    pub(crate) fn new(raw: String, header: Header, claims: Claims) -> Self {
        Self {
            raw,
            header,
            claims,
        }
    }

    /// The token exactly as presented.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn algorithm(&self) -> Algorithm {
        self.header.alg
    }

    pub fn key_id(&self) -> Option<&str> {
        self.header.kid.as_deref()
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// `sub` claim, when it is a string.
    pub fn subject(&self) -> Option<&str> {
        self.claims.get("sub").and_then(Value::as_str)
    }
}

/// Rules applied to the registered claims of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRules {
    pub leeway: u64,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl Default for ClaimRules {
    fn default() -> Self {
        Self {
            leeway: DEFAULT_LEEWAY,
            issuer: None,
            audience: None,
        }
    }
}

impl ClaimRules {
    /// `jsonwebtoken` validation for a token declaring `alg`.
    ///
    /// Time claims are optional. A configured issuer or audience makes the
    /// matching claim required.
    pub fn validation(&self, alg: Algorithm) -> Validation {
        let mut validation = Validation::new(alg);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;
        validation.required_spec_claims.clear();

        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
            validation.required_spec_claims.insert("iss".to_string());
        }

        match &self.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                validation.required_spec_claims.insert("aud".to_string());
            }
            None => validation.validate_aud = false,
        }

        validation
    }

    /// `iat`, if present, must be numeric and not in the future beyond leeway.
    pub fn check_issued_at(&self, claims: &Claims, now: i64) -> Result<(), ClaimViolation> {
        let iat = match claims.get("iat") {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .ok_or_else(|| ClaimViolation::InvalidFormat("iat".to_string()))?,
            Some(_) => return Err(ClaimViolation::InvalidFormat("iat".to_string())),
        };

        let leeway = i64::try_from(self.leeway).unwrap_or(i64::MAX);
        if iat > now.saturating_add(leeway) {
            return Err(ClaimViolation::IssuedInFuture);
        }
        Ok(())
    }
}

/// The claim violation behind a `jsonwebtoken` error, if it is one.
///
/// `jsonwebtoken` checks claims only after the signature verified, so any
/// error mapped here comes from a correctly signed token.
pub fn claim_violation(kind: &ErrorKind) -> Option<ClaimViolation> {
    match kind {
        ErrorKind::ExpiredSignature => Some(ClaimViolation::Expired),
        ErrorKind::ImmatureSignature => Some(ClaimViolation::NotYetValid),
        ErrorKind::InvalidIssuer => Some(ClaimViolation::InvalidIssuer),
        ErrorKind::InvalidAudience => Some(ClaimViolation::InvalidAudience),
        ErrorKind::MissingRequiredClaim(claim) if claim == "iss" => {
            Some(ClaimViolation::InvalidIssuer)
        }
        ErrorKind::MissingRequiredClaim(claim) if claim == "aud" => {
            Some(ClaimViolation::InvalidAudience)
        }
        ErrorKind::InvalidClaimFormat(claim) => Some(ClaimViolation::InvalidFormat(claim.clone())),
        _ => None,
    }
}
