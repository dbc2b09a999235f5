use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryIngredientRepository};
use crate::off::OpenFoodFactsClient;
use crate::routes::with_analysis_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use labelwise::analysis::{IngredientService, ReportService, ScoringConfig, ScoringEngine};
use labelwise::config::AppConfig;
use labelwise::error::AppError;
use labelwise::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        products: Arc::new(OpenFoodFactsClient::new(config.products.base_url.clone())),
    };

    let repository = Arc::new(InMemoryIngredientRepository::default());
    let report_service = Arc::new(ReportService::new(
        ScoringEngine::new(ScoringConfig::default()),
        IngredientService::new(repository),
    ));

    let app = with_analysis_routes(report_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "label analysis service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
