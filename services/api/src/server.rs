use crate::cli::ServeArgs;
use crate::infra::{http_gateway, load_config, seeded_gateway, AppState};
use crate::routes::with_review_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hiring_review::config::AppConfig;
use hiring_review::error::AppError;
use hiring_review::telemetry;
use hiring_review::workflows::review::{ResourceGateway, WorkflowEngine};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = load_config(&args.backend)?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if args.in_memory {
        info!("serving seeded in-memory postings");
        serve(Arc::new(seeded_gateway()), &config).await
    } else {
        info!(backend = %config.backend.base_url, "serving against remote backend");
        serve(Arc::new(http_gateway(&config)?), &config).await
    }
}

async fn serve<G>(gateway: Arc<G>, config: &AppConfig) -> Result<(), AppError>
where
    G: ResourceGateway + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = Arc::new(WorkflowEngine::new(gateway));
    let app = with_review_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hiring review service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
