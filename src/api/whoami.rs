// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;
use jsonwebtoken::Algorithm;
use serde::Serialize;

use crate::auth::{Claims, OptionalJwt};

/// Identity carried by the verified token, if any.
#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<Algorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<Claims>,
}

pub async fn whoami(OptionalJwt(token): OptionalJwt) -> Json<WhoAmIResponse> {
    let response = match token {
        Some(token) => WhoAmIResponse {
            authenticated: true,
            alg: Some(token.algorithm()),
            kid: token.key_id().map(str::to_string),
            claims: Some(token.claims().clone()),
        },
        None => WhoAmIResponse {
            authenticated: false,
            alg: None,
            kid: None,
            claims: None,
        },
    };
    Json(response)
}
