//! HTTP surface: thin translation from requests to store and catalog calls.
//!
//! No business logic lives here beyond parameter extraction; handlers parse
//! input, call the store or the query engine, and map outcomes to status
//! codes.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::catalog::{self, Section};
use crate::domain::{Price, Product, ProductDraft, ProductPatch};
use crate::error::ApiError;
use crate::store::ProductStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/products",
            get(get_products)
                .post(create_product)
                .put(update_product)
                .delete(delete_product),
        )
        .route("/catalog", get(catalog_listing))
        .route("/carousel", get(carousel))
        .route("/seed", post(seed))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "service": "wax-boutique" }))
}

#[derive(Debug, Default, Deserialize)]
struct IdParams {
    id: Option<String>,
}

/// `GET /products` lists everything in store order; `?id=` fetches one.
async fn get_products(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Response, ApiError> {
    match params.id {
        Some(id) => {
            let product = state.store.get(&id).await?.ok_or(ApiError::NotFound)?;
            Ok(Json(product).into_response())
        }
        None => Ok(Json(state.store.list().await?).into_response()),
    }
}

async fn create_product(
    State(state): State<AppState>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    draft.validate()?;
    let product = state.store.create(draft).await?;
    tracing::info!(id = %product.id, name = %product.name, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(state): State<AppState>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    if patch.id.trim().is_empty() {
        return Err(ApiError::MissingId);
    }
    patch.validate()?;
    let product = state.store.update(patch).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(product))
}

async fn delete_product(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = params
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingId)?;
    let outcome = state.store.delete(id).await?;
    tracing::info!(id, matched = outcome.matched, "product deleted");
    Ok(Json(json!({ "success": true, "matched": outcome.matched })))
}

#[derive(Debug, Default, Deserialize)]
struct CatalogParams {
    section: Option<Section>,
    category: Option<String>,
    q: Option<String>,
}

/// Customer-facing listing: badges derived, featured excluded, filters and
/// search ANDed by the query engine.
async fn catalog_listing(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.store.list().await?;
    let listing = catalog::search(
        products,
        params.section.unwrap_or_default(),
        params.category.as_deref().unwrap_or(""),
        params.q.as_deref().unwrap_or(""),
    );
    Ok(Json(listing))
}

/// Featured products only, for the promotional carousel.
async fn carousel(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.store.list().await?;
    Ok(Json(products.into_iter().filter(|p| p.is_featured).collect()))
}

/// Replace the collection with the demo catalog.
async fn seed(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.replace_all(Vec::new()).await?;
    let drafts = demo_products();
    let count = drafts.len();
    for draft in drafts {
        state.store.create(draft).await?;
    }
    tracing::info!(count, "catalog seeded");
    Ok(Json(json!({ "message": "Database seeded successfully", "count": count })))
}

fn demo_products() -> Vec<ProductDraft> {
    fn demo(name: &str, price: f64, category: &str, image: &str, description: &str, stock: u32) -> ProductDraft {
        ProductDraft {
            name: name.into(),
            price: Price::Amount(price),
            category: category.into(),
            image: image.into(),
            description: description.into(),
            stock,
            ..Default::default()
        }
    }

    vec![
        demo(
            "Escarpins Nubuck African",
            25000.0,
            "Chaussures",
            "/shoe_luxury.png",
            "Escarpins de luxe avec motifs africains subtils. Idéal pour les soirées.",
            10,
        ),
        demo(
            "Sac à main Wax Premium",
            40000.0,
            "Accessoires",
            "/bag_wax.png",
            "Sac à main élégant mêlant cuir véritable et tissu Wax coloré.",
            5,
        ),
        demo(
            "Parure de Draps 3D",
            15000.0,
            "Maison",
            "/bed_sheets.png",
            "Parure de lit complète avec motifs géométriques 3D confortables.",
            20,
        ),
        demo(
            "Montre Gold Luxury",
            18000.0,
            "Accessoires",
            "/watch_luxury.png",
            "Montre dorée minimaliste avec une touche de luxe africain.",
            8,
        ),
        demo(
            "Mocassins Dorés",
            30000.0,
            "Chaussures",
            "/shoe_luxury.png",
            "Mocassins confortables et brillants pour un style unique.",
            15,
        ),
        demo(
            "Rideaux Salon",
            15000.0,
            "Décoration",
            "/bed_sheets.png",
            "Rideaux assortis pour un salon chaleureux.",
            12,
        ),
    ]
}
