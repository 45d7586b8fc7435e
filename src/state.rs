// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{JwksResolver, JwtValidator};

#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<JwtValidator>,
    /// Present only when keys come from a JWKS endpoint.
    pub jwks: Option<Arc<JwksResolver>>,
}

impl AppState {
    pub fn new(validator: JwtValidator, jwks: Option<Arc<JwksResolver>>) -> Self {
        Self {
            validator: Arc::new(validator),
            jwks,
        }
    }
}
