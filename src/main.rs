//! Wax Boutique - flat-file storefront service

use anyhow::Result;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wax_boutique::api::{router, AppState};
use wax_boutique::store::JsonStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_file = std::env::var("DATA_FILE").unwrap_or_else(|_| "data/products.json".to_string());
    let state = AppState {
        store: Arc::new(JsonStore::new(&data_file)),
    };

    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    tracing::info!("🚀 Wax Boutique listening on 0.0.0.0:{}, data file {}", port, data_file);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}
