use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::SnapshotMeta;
use crate::AppState;
use chain_filter::{filter, loader, summary, Dataset, FilterError, FilterState, FilteredView, SummaryStats};
use map_export::{ExportError, ExportFormat, Exporter, MapScene, WorldMap};
use risk_model::{Disruption, SupplyNode, TradeRoute};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no dataset snapshot mounted")]
    NotReady,
    #[error("invalid dataset: {0}")]
    InvalidDataset(#[from] FilterError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotReady | ApiError::Export(ExportError::NotReady) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::InvalidDataset(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[derive(Serialize)]
pub struct FilterResponse {
    pub snapshot: SnapshotMeta,
    pub summary: SummaryStats,
    pub view: FilteredView,
}

#[derive(Serialize)]
pub struct IngestResponse {
    pub applied: bool,
    pub sequence: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingest_id: Option<uuid::Uuid>,
}

pub async fn list_nodes(State(state): State<AppState>) -> Result<Json<Vec<SupplyNode>>, ApiError> {
    let snap = state.store.snapshot().ok_or(ApiError::NotReady)?;
    Ok(Json(snap.dataset.nodes))
}

pub async fn list_routes(State(state): State<AppState>) -> Result<Json<Vec<TradeRoute>>, ApiError> {
    let snap = state.store.snapshot().ok_or(ApiError::NotReady)?;
    Ok(Json(snap.dataset.routes))
}

pub async fn list_disruptions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Disruption>>, ApiError> {
    let snap = state.store.snapshot().ok_or(ApiError::NotReady)?;
    Ok(Json(snap.dataset.disruptions))
}

/// Apply a caller-supplied filter state to the current snapshot
pub async fn filter_view(
    State(state): State<AppState>,
    Json(filter_state): Json<FilterState>,
) -> Result<Json<FilterResponse>, ApiError> {
    let snap = state.store.snapshot().ok_or(ApiError::NotReady)?;

    let view = filter::apply(&snap.dataset, &filter_state);
    let stats = summary::summarize(&view);

    Ok(Json(FilterResponse {
        snapshot: snap.meta,
        summary: stats,
        view,
    }))
}

/// Summary of the full (unfiltered) snapshot
pub async fn summary_view(
    State(state): State<AppState>,
) -> Result<Json<SummaryStats>, ApiError> {
    let snap = state.store.snapshot().ok_or(ApiError::NotReady)?;
    let view = filter::apply(&snap.dataset, &FilterState::default());
    Ok(Json(summary::summarize(&view)))
}

/// Replace the mounted dataset wholesale
pub async fn ingest_snapshot(
    State(state): State<AppState>,
    Json(dataset): Json<Dataset>,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    loader::validate_dataset(&dataset)?;

    let sequence = state.store.next_sequence();
    match state.store.apply(dataset, sequence) {
        Some(meta) => Ok((
            StatusCode::CREATED,
            Json(IngestResponse {
                applied: true,
                sequence,
                ingest_id: Some(meta.ingest_id),
            }),
        )),
        // A concurrent ingest won with a newer sequence.
        None => Ok((
            StatusCode::CONFLICT,
            Json(IngestResponse {
                applied: false,
                sequence,
                ingest_id: None,
            }),
        )),
    }
}

pub async fn export_svg(State(state): State<AppState>) -> Result<Response, ApiError> {
    export(state, ExportFormat::Svg)
}

pub async fn export_geojson(State(state): State<AppState>) -> Result<Response, ApiError> {
    export(state, ExportFormat::GeoJson)
}

fn export(state: AppState, format: ExportFormat) -> Result<Response, ApiError> {
    let snap = state.store.snapshot().ok_or(ApiError::NotReady)?;

    let exporter = Exporter::mounted(WorldMap::default());
    let scene = MapScene {
        nodes: &snap.dataset.nodes,
        routes: &snap.dataset.routes,
        disruptions: &snap.dataset.disruptions,
    };
    let artifact = exporter.export(&scene, format)?;

    let headers = [
        (header::CONTENT_TYPE, artifact.mime_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.file_name),
        ),
    ];
    Ok((headers, artifact.contents).into_response())
}
