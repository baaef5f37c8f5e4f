use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_room_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use room_audit::config::AppConfig;
use room_audit::error::AppError;
use room_audit::rooms::offices::OfficeDirectory;
use room_audit::rooms::persistence::JsonFileStore;
use room_audit::rooms::RoomService;
use room_audit::telemetry;
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
    if let Some(data_path) = args.data_path.take() {
        config.storage.data_path = data_path;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(JsonFileStore::new(config.storage.data_path.clone()));
    let service = Arc::new(RoomService::load(OfficeDirectory::standard(), store)?);

    let app = with_room_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, data_path = %config.storage.data_path.display(), "room inspection service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
