use std::sync::Arc;

use anyhow::Context;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use healthtick::config::{AppConfig, ServiceAccount};
use healthtick::handlers;
use healthtick::services::store::firestore::Firestore;
use healthtick::services::store::DocumentStore;
use healthtick::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    // Credentials must resolve before the port is bound.
    let account = ServiceAccount::resolve().context("failed to resolve store credentials")?;
    let store: Arc<dyn DocumentStore> = Firestore::connect(&account)?;
    tracing::info!("store client ready (project: {})", account.project_id);

    let state = Arc::new(AppState {
        store,
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(handlers::health::health))
        .route("/api/getUsers", get(handlers::users::get_users))
        .route("/api/addBooking", post(handlers::bookings::add_booking))
        .route("/api/getBookings", get(handlers::bookings::get_bookings))
        .route(
            "/api/deleteBookings/:id",
            delete(handlers::bookings::delete_booking),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("server running on port {}", config.port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
