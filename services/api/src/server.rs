use crate::cli::ServeArgs;
use crate::demo::demo_dataset;
use crate::infra::{in_memory_service, today, AppState};
use crate::routes::with_scoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use supplier_scoring::config::AppConfig;
use supplier_scoring::error::AppError;
use supplier_scoring::scoring::{FactImporter, InMemorySupplierData};
use supplier_scoring::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    args.scoring.apply(&mut config.scoring);

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let data = match args.data_dir.take() {
        Some(dir) => {
            info!(dir = %dir.display(), "loading supplier facts");
            FactImporter::from_dir(dir)?
        }
        None if args.seed_demo => demo_dataset(today()),
        None => InMemorySupplierData::default(),
    };
    info!(suppliers = data.supplier_count(), "supplier directory loaded");

    let scoring_service = Arc::new(in_memory_service(data, config.scoring));

    let app = with_scoring_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "supplier scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
