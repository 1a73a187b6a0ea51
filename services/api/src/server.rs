use crate::cli::ServeArgs;
use crate::infra::{seed_stores, AppState};
use crate::routes::with_platform_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fortemove::config::AppConfig;
use fortemove::error::AppError;
use fortemove::http::AppContext;
use fortemove::services::LocalFileCleanup;
use fortemove::store::memory::MemoryStores;
use fortemove::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
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
    };

    let stores = MemoryStores::default();
    if args.seed {
        seed_stores(&stores).map_err(|err| {
            AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, err.to_string()))
        })?;
    }
    let ctx = AppContext::from_stores(stores, Arc::new(LocalFileCleanup), &config.import);

    let app = with_platform_routes(ctx)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job board platform service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
