use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{SupplierId, TenantId};
use super::ranking::SortKey;
use super::service::{ScoringServiceError, SupplierScoringService};
use super::snapshot::SnapshotStore;
use super::source::{HistoricalFacts, SupplierDirectory};

/// Router builder exposing scoring, ranking and risk endpoints.
pub fn scoring_router<D, F, S>(service: Arc<SupplierScoringService<D, F, S>>) -> Router
where
    D: SupplierDirectory + 'static,
    F: HistoricalFacts + 'static,
    S: SnapshotStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/tenants/:tenant_id/suppliers/:supplier_id/score",
            post(calculate_handler::<D, F, S>),
        )
        .route(
            "/api/v1/suppliers/:supplier_id/score",
            get(score_handler::<D, F, S>),
        )
        .route(
            "/api/v1/tenants/:tenant_id/scores/recalculate",
            post(recalculate_handler::<D, F, S>),
        )
        .route(
            "/api/v1/tenants/:tenant_id/ranking",
            get(ranking_handler::<D, F, S>),
        )
        .route(
            "/api/v1/tenants/:tenant_id/risk-map",
            get(risk_map_handler::<D, F, S>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RankingQuery {
    #[serde(default)]
    pub(crate) category: Option<String>,
    #[serde(default)]
    pub(crate) sort_by: Option<String>,
}

pub(crate) async fn calculate_handler<D, F, S>(
    State(service): State<Arc<SupplierScoringService<D, F, S>>>,
    Path((tenant_id, supplier_id)): Path<(String, String)>,
) -> Response
where
    D: SupplierDirectory + 'static,
    F: HistoricalFacts + 'static,
    S: SnapshotStore + 'static,
{
    match service.calculate_score(&SupplierId(supplier_id), &TenantId(tenant_id)) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn score_handler<D, F, S>(
    State(service): State<Arc<SupplierScoringService<D, F, S>>>,
    Path(supplier_id): Path<String>,
) -> Response
where
    D: SupplierDirectory + 'static,
    F: HistoricalFacts + 'static,
    S: SnapshotStore + 'static,
{
    match service.get_score(&SupplierId(supplier_id)) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn recalculate_handler<D, F, S>(
    State(service): State<Arc<SupplierScoringService<D, F, S>>>,
    Path(tenant_id): Path<String>,
) -> Response
where
    D: SupplierDirectory + 'static,
    F: HistoricalFacts + 'static,
    S: SnapshotStore + 'static,
{
    let tenant_id = TenantId(tenant_id);
    let outcome = tokio::task::spawn_blocking(move || service.recalculate_all(&tenant_id)).await;

    match outcome {
        Ok(Ok(report)) => (StatusCode::OK, Json(report)).into_response(),
        Ok(Err(err)) => err.into_response(),
        Err(join_error) => {
            error!(error = %join_error, "recalculation task aborted");
            let payload = json!({ "error": "recalculation aborted" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn ranking_handler<D, F, S>(
    State(service): State<Arc<SupplierScoringService<D, F, S>>>,
    Path(tenant_id): Path<String>,
    Query(query): Query<RankingQuery>,
) -> Response
where
    D: SupplierDirectory + 'static,
    F: HistoricalFacts + 'static,
    S: SnapshotStore + 'static,
{
    let sort_by = match query.sort_by.as_deref().map(str::parse::<SortKey>).transpose() {
        Ok(sort_by) => sort_by,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());
    match service.get_ranking(&TenantId(tenant_id), category, sort_by) {
        Ok(ranking) => (StatusCode::OK, Json(ranking)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn risk_map_handler<D, F, S>(
    State(service): State<Arc<SupplierScoringService<D, F, S>>>,
    Path(tenant_id): Path<String>,
) -> Response
where
    D: SupplierDirectory + 'static,
    F: HistoricalFacts + 'static,
    S: SnapshotStore + 'static,
{
    match service.get_risk_map(&TenantId(tenant_id)) {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(err) => err.into_response(),
    }
}

impl IntoResponse for ScoringServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ScoringServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ScoringServiceError::Source(_) => StatusCode::SERVICE_UNAVAILABLE,
            ScoringServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "scoring request failed");
        }

        let payload = json!({ "error": self.to_string() });
        (status, Json(payload)).into_response()
    }
}
