// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use bearer_guard::{api::router, config::AuthSettings, state::AppState, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = AuthSettings::from_env()?;
    telemetry::init_tracing(settings.log_format);

    let (validator, jwks) = settings.build_validator()?;
    tracing::info!(
        signing_method = ?validator.signing_method(),
        credentials_optional = validator.credentials_optional(),
        jwks = jwks.as_ref().map(|j| j.jwks_url()),
        "JWT validator configured"
    );

    let app = router(AppState::new(validator, jwks));

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Bearer Guard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
