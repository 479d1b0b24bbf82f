//! Mosaic HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use application::{ActionItemService, CalendarService, CompanyService};
use infrastructure::{
    AffinityCrmAdapter, AppConfig, Environment, GoogleCalendarWatchAdapter,
    HarmonicSourcingAdapter, SqliteCalendarWebhookStore, SqliteCompanyStore, create_pool,
    init_telemetry,
};
use presentation_http::{
    handlers::webhooks::AFFINITY_WEBHOOK_SOURCE, routes, set_expose_internal_errors,
    state::AppState,
};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_telemetry(&config.telemetry).context("failed to initialize telemetry")?;

    info!(version = env!("CARGO_PKG_VERSION"), "Mosaic server starting");
    info!(
        host = %config.server.host,
        port = config.server.port,
        environment = ?config.environment,
        crm_pipeline = config.crm.is_some(),
        "Configuration loaded"
    );

    if config.environment == Some(Environment::Production) {
        set_expose_internal_errors(false);
    }
    if config.crm.is_none() {
        warn!("CRM pipeline ids are not configured, /v1/companies/details is disabled");
    }

    let state = build_state(config)?;
    let server = state.config.server.clone();
    let app = routes::create_router(state);

    let addr = format!("{}:{}", server.host, server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Server listening");

    let shutdown_timeout = Duration::from_secs(server.shutdown_timeout_secs.unwrap_or(30));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wire adapters, stores and services
fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    let pool = Arc::new(create_pool(&config.database).context("failed to open database")?);
    let company_store = Arc::new(SqliteCompanyStore::new(Arc::clone(&pool)));
    let webhook_store = Arc::new(SqliteCalendarWebhookStore::new(pool));

    let crm = Arc::new(
        AffinityCrmAdapter::new(&config.affinity.to_affinity_config())
            .context("failed to create Affinity client")?,
    );
    let sourcing = Arc::new(
        HarmonicSourcingAdapter::new(&config.harmonic.to_harmonic_config())
            .context("failed to create Harmonic client")?,
    );
    let watch = Arc::new(
        GoogleCalendarWatchAdapter::new(&config.calendar.to_google_config())
            .context("failed to create Google Calendar client")?,
    );

    let company_service =
        CompanyService::new(crm.clone(), sourcing).with_store(company_store.clone());
    let action_item_service =
        ActionItemService::new(crm, AFFINITY_WEBHOOK_SOURCE).with_company_store(company_store);
    let calendar_service =
        CalendarService::new(watch, webhook_store, config.calendar_webhook_settings());

    Ok(AppState {
        company_service: Arc::new(company_service),
        action_item_service: Arc::new(action_item_service),
        calendar_service: Arc::new(calendar_service),
        config: Arc::new(config),
    })
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }

    info!(?timeout, "Waiting for open connections to close");
}
