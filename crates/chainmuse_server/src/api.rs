//! HTTP routes.

use crate::request::{CreateChildBody, CreateRootBody, LimitQuery};
use crate::response::{CreatedResponse, HealthResponse, ServiceModes};
use crate::{ApiError, AppState};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chainmuse_core::ContentRef;
use chainmuse_interface::{ContentStore, LedgerMinter, LedgerReader, NarrativeGenerator};
use chainmuse_narrative::{GraphSnapshot, StatsReport};
use serde_json::{Value, json};
use tracing::{info, instrument};

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/models", get(list_models))
        .route("/blockchain/stats", get(get_stats))
        .route("/blockchain/stories", get(list_stories))
        .route("/blockchain/events", get(list_events))
        .route("/graph", get(get_graph))
        .route("/create-root-story", post(create_root_story))
        .route("/create-child-story", post(create_child_story))
        .route("/content/:cid", get(get_content))
        .with_state(state)
}

/// Adapter modes and signer identity.
#[instrument(skip_all)]
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let reader: &dyn LedgerReader = state.graph().reader().as_ref();
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
        services: ServiceModes {
            sui: state.minter().mode().to_string(),
            openrouter: state.generator().mode().to_string(),
            ipfs: state.store().mode().to_string(),
        },
        admin_address: state.minter().signer_address().to_string(),
        network: reader.network().to_string(),
        package_id: reader.package_id().to_string(),
    })
}

#[instrument(skip_all)]
async fn list_models(State(state): State<AppState>) -> Json<Value> {
    let models = state.generator().list_models().await;
    Json(json!({ "models": models }))
}

#[instrument(skip_all)]
async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsReport>, ApiError> {
    let report = state
        .graph()
        .stats(state.settings().stats_scan_limit)
        .await
        .map_err(|source| ApiError::Ledger {
            context: "Failed to fetch blockchain stats",
            source,
        })?;
    Ok(Json(report))
}

#[instrument(skip_all)]
async fn list_stories(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let nodes = state
        .graph()
        .reader()
        .list_nodes()
        .await
        .map_err(|source| ApiError::Ledger {
            context: "Failed to fetch story nodes",
            source,
        })?;
    Ok(Json(json!({ "stories": nodes })))
}

#[instrument(skip(state))]
async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Value>, ApiError> {
    let limit = state.settings().event_limit(query.limit);
    let events = state
        .graph()
        .reader()
        .list_events(limit)
        .await
        .map_err(|source| ApiError::Ledger {
            context: "Failed to fetch story events",
            source,
        })?;
    Ok(Json(json!({ "events": events })))
}

#[instrument(skip(state))]
async fn get_graph(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<GraphSnapshot>, ApiError> {
    let limit = state.settings().event_limit(query.limit);
    let snapshot = state
        .graph()
        .snapshot(limit)
        .await
        .map_err(|source| ApiError::Ledger {
            context: "Failed to fetch story graph",
            source,
        })?;
    Ok(Json(snapshot))
}

#[instrument(skip_all)]
async fn create_root_story(
    State(state): State<AppState>,
    Json(body): Json<CreateRootBody>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let request = body.into_request()?;
    let created = state
        .orchestrator()
        .create_root(&request)
        .await
        .map_err(|source| ApiError::Pipeline {
            context: "Failed to create root story.",
            source,
        })?;
    info!(node_id = %created.node_id(), "Root story created");
    Ok(Json(CreatedResponse::new(
        "Root story created successfully!",
        created,
    )))
}

#[instrument(skip_all)]
async fn create_child_story(
    State(state): State<AppState>,
    Json(body): Json<CreateChildBody>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let request = body.into_request()?;
    let created = state
        .orchestrator()
        .create_child(&request)
        .await
        .map_err(|source| ApiError::Pipeline {
            context: "Failed to create child story.",
            source,
        })?;
    info!(node_id = %created.node_id(), "Child story created");
    Ok(Json(CreatedResponse::new(
        "Child story created successfully!",
        created,
    )))
}

#[instrument(skip(state))]
async fn get_content(
    State(state): State<AppState>,
    Path(cid): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let record = state
        .graph()
        .content_record(&ContentRef::new(cid))
        .await
        .map_err(|source| ApiError::Content {
            context: "Failed to fetch content",
            source,
        })?;
    Ok(Json(json!({ "content": record })))
}
