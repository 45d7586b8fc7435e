// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth::jwt_middleware, state::AppState};

pub mod health;
pub mod whoami;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/whoami", get(whoami::whoami))
        .layer(axum::middleware::from_fn_with_state(
            state.validator.clone(),
            jwt_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .nest("/v1", v1_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
