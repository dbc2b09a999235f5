use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::ingredients::repository::IngredientRepository;
use super::product::{ExternalProduct, ProductSnapshot};
use super::report::{LabelData, ReportContext, ReportService};
use super::scoring::domain::UserProfile;

/// Request payload carrying materialized analysis inputs. Product lookup and
/// label OCR happen upstream; this endpoint only scores and assembles.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub product: Option<ProductSnapshot>,
    #[serde(default)]
    pub external_product: Option<ExternalProduct>,
    #[serde(default)]
    pub label: Option<LabelData>,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

impl AnalysisRequest {
    /// Materialize the report context, or `None` when the request carries
    /// neither product data nor label data.
    pub fn into_context(self) -> Option<ReportContext> {
        let AnalysisRequest {
            product,
            external_product,
            label,
            profile,
        } = self;

        if external_product.is_none() && label.is_none() {
            return None;
        }

        let product = product.unwrap_or_else(|| {
            external_product
                .as_ref()
                .map(ProductSnapshot::from_external)
                .unwrap_or_else(ProductSnapshot::unknown)
        });

        Some(ReportContext {
            product,
            external_product,
            label_data: label,
            profile,
        })
    }
}

/// Router builder exposing the analysis endpoint.
pub fn analysis_router<R>(service: Arc<ReportService<R>>) -> Router
where
    R: IngredientRepository + 'static,
{
    Router::new()
        .route("/api/v1/analyses", post(analyze_handler::<R>))
        .with_state(service)
}

pub(crate) async fn analyze_handler<R>(
    State(service): State<Arc<ReportService<R>>>,
    axum::Json(request): axum::Json<AnalysisRequest>,
) -> Response
where
    R: IngredientRepository + 'static,
{
    let Some(context) = request.into_context() else {
        let payload = json!({
            "error": "must provide external product data or label data",
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    };

    let report = service.generate_report(&context);
    (StatusCode::OK, axum::Json(report)).into_response()
}
