use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_client::{HttpRecordGateway, PostalLookupClient};
use api_rest::state::DEFAULT_SESSION_TTL;
use api_rest::AppState;
use medireg_core::constants::DEFAULT_REST_ADDR;
use medireg_core::gateway_config_from_env_values;

/// Main entry point for the MediReg application
///
/// Serves the REST API: registration form sessions, health-record submission and the
/// OpenAPI/Swagger UI.
///
/// # Environment Variables
/// - `MEDIREG_REST_ADDR`: REST server address (default: "0.0.0.0:8080")
/// - `MEDIREG_API_BASE_URL`: Backend that persists registrations and health records
/// - `MEDIREG_POSTAL_LOOKUP_URL`: Postal code lookup service
/// - `MEDIREG_SUCCESS_ROUTE`: Route returned to clients after a successful registration
/// - `MEDIREG_SESSION_TTL_SECS`: Idle lifetime of a registration session (default: 1800)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration is invalid or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medireg_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("medireg_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("MEDIREG_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = Arc::new(gateway_config_from_env_values(
        std::env::var("MEDIREG_API_BASE_URL").ok(),
        std::env::var("MEDIREG_POSTAL_LOOKUP_URL").ok(),
        std::env::var("MEDIREG_SUCCESS_ROUTE").ok(),
    )?);
    cfg.ensure_distinct_from(&rest_addr)?;
    tracing::info!(
        "++ Forwarding registrations to {} and postal lookups to {}",
        cfg.api_base_url(),
        cfg.postal_lookup_url()
    );

    let session_ttl = match std::env::var("MEDIREG_SESSION_TTL_SECS") {
        Ok(secs) => Duration::from_secs(secs.trim().parse().with_context(|| {
            format!("MEDIREG_SESSION_TTL_SECS must be a whole number of seconds: {secs}")
        })?),
        Err(_) => DEFAULT_SESSION_TTL,
    };

    let state = AppState::new(
        cfg.clone(),
        Arc::new(HttpRecordGateway::new(cfg.clone())?),
        Arc::new(PostalLookupClient::new(cfg)?),
    )
    .with_session_ttl(session_ttl);
    let app = api_rest::router(state);

    tracing::info!("++ Starting MediReg REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
