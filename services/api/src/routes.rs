use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use labelwise::analysis::ingredients::repository::IngredientRepository;
use labelwise::analysis::{analysis_router, ReportService};

use crate::infra::AppState;

#[derive(Debug, Deserialize)]
pub(crate) struct ProductLookupRequest {
    pub(crate) barcode: String,
}

/// Wrap the library's analysis router with operational endpoints and the
/// product lookup adapter.
pub(crate) fn with_analysis_routes<R>(service: Arc<ReportService<R>>) -> axum::Router
where
    R: IngredientRepository + 'static,
{
    analysis_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/products/lookup",
            axum::routing::post(product_lookup_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn product_lookup_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<ProductLookupRequest>,
) -> Response {
    match state.products.lookup_by_barcode(&request.barcode).await {
        Ok(Some(product)) => (StatusCode::OK, Json(product)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": format!("no product found for barcode {}", request.barcode),
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(err) => {
            tracing::warn!(%err, "product lookup failed");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
    }
}
