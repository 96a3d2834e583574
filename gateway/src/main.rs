use anyhow::Result;
use axum::{
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod routes;
mod store;

use store::SnapshotStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "rrio_gateway=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = Arc::new(SnapshotStore::new());

    // Optional seed dataset; the store stays empty (and the API reports
    // NotReady) until the first snapshot otherwise.
    if let Ok(path) = std::env::var("RRIO_DATASET_PATH") {
        let dataset = chain_filter::loader::load_dataset(&path)?;
        let seq = store.next_sequence();
        if store.apply(dataset, seq).is_some() {
            tracing::info!("   Seeded dataset from {} (sequence {})", path, seq);
        }
    } else {
        tracing::info!("   No RRIO_DATASET_PATH set, starting with an empty store");
    }

    let state = AppState { store };

    let supply_chain_routes = Router::new()
        .route("/nodes", get(routes::list_nodes))
        .route("/routes", get(routes::list_routes))
        .route("/disruptions", get(routes::list_disruptions))
        .route("/filter", post(routes::filter_view))
        .route("/summary", get(routes::summary_view))
        .route("/snapshot", post(routes::ingest_snapshot))
        .route("/export/svg", get(routes::export_svg))
        .route("/export/geojson", get(routes::export_geojson))
        .with_state(state);

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api/v1/supply-chain", supply_chain_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let port = std::env::var("RRIO_GATEWAY_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "18701".to_string());
    let addr = format!("0.0.0.0:{}", port);

    tracing::info!("🌐 RRIO Gateway starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
