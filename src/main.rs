//! Checkout webhooks server binary.
//!
//! Loads configuration, wires the adapters and serves the webhook router.

use std::sync::Arc;

use checkout_webhooks::adapters::clock::SystemClock;
use checkout_webhooks::adapters::http::webhook::{app_router, WebhookAppState};
use checkout_webhooks::adapters::mercadopago::{MercadoPagoConfig, MercadoPagoLookup};
use checkout_webhooks::adapters::sink::LoggingNotificationSink;
use checkout_webhooks::config::AppConfig;
use checkout_webhooks::domain::notification::SignatureVerifier;
use secrecy::ExposeSecret;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let access_token = match config.provider.access_token() {
        Some(token) => token.expose_secret().clone(),
        None => {
            tracing::warn!("No provider access token configured; lookups will be rejected");
            String::new()
        }
    };
    let lookup = MercadoPagoLookup::new(
        MercadoPagoConfig::new(access_token)
            .with_base_url(config.provider.api_base_url.clone())
            .with_timeout(config.provider.request_timeout()),
    )?;

    let verifier = SignatureVerifier::from_secret(config.verification_secret());
    tracing::info!(
        environment = ?config.server.environment,
        verification_enabled = verifier.is_enabled(),
        "Signature verification configured"
    );

    let state = WebhookAppState {
        verifier,
        provider_lookup: Arc::new(lookup),
        notification_sink: Arc::new(LoggingNotificationSink::new()),
        clock: Arc::new(SystemClock),
    };
    let app = app_router(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Webhook receiver listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
