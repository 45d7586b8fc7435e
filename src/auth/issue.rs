// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Minimal token issuance.
//!
//! Tokens are always signed with [`ISSUING_ALGORITHM`], the method a
//! validator for these tokens must pin.

use jsonwebtoken::{encode, Algorithm, Header};
use rsa::RsaPrivateKey;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use super::claims::Claims;
use crate::crypto::{self, CryptoError};

/// Algorithm used by [`new_jwt_with_claims`].
pub const ISSUING_ALGORITHM: Algorithm = Algorithm::RS512;

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("invalid signing key: {0}")]
    Key(#[from] CryptoError),
    #[error("failed to sign JWT: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
}

/// Sign `claims` with `key`, stamping `nbf` with the current time.
pub fn new_jwt_with_claims(mut claims: Claims, key: &RsaPrivateKey) -> Result<String, IssueError> {
    claims.insert(
        "nbf".to_string(),
        Value::from(chrono::Utc::now().timestamp()),
    );

    let encoding_key = crypto::rsa::encoding_key(key)?;

    let mut header = Header::new(ISSUING_ALGORITHM);
    header.typ = Some("JWT".to_string());

    encode(&header, &claims, &encoding_key).map_err(|e| {
        error!(error = %e, "failed to sign JWT");
        IssueError::Sign(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::rsa::{decoding_key, generate_rsa_key_with_bits};
    use jsonwebtoken::{decode, decode_header, Validation};
    use serde_json::json;

    #[test]
    fn new_jwt_with_claims_signs_rs512() {
        let key = generate_rsa_key_with_bits(2048).unwrap();

        let mut claims = Claims::new();
        claims.insert("sub".to_string(), json!("user_123"));
        let token = new_jwt_with_claims(claims, &key).unwrap();
        assert!(!token.is_empty());

        let header = decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::RS512);
        assert_eq!(header.typ.as_deref(), Some("JWT"));

        let mut validation = Validation::new(Algorithm::RS512);
        validation.required_spec_claims.clear();
        let data = decode::<Claims>(
            &token,
            &decoding_key(&key.to_public_key()).unwrap(),
            &validation,
        )
        .unwrap();

        assert_eq!(data.claims["sub"], json!("user_123"));
        let nbf = data.claims["nbf"].as_i64().unwrap();
        assert!((nbf - chrono::Utc::now().timestamp()).abs() < 60);
    }

    #[test]
    fn empty_claims_still_get_nbf() {
        let key = generate_rsa_key_with_bits(2048).unwrap();
        let token = new_jwt_with_claims(Claims::new(), &key).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }
}
