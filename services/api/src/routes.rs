use crate::infra::{sample_rooms, AppState};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use room_audit::error::AppError;
use room_audit::rooms::persistence::PersistenceGateway;
use room_audit::rooms::router::rooms_router;
use room_audit::rooms::{DashboardView, ExportArtifact, RoomService};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_room_routes<P>(service: Arc<RoomService<P>>) -> Router
where
    P: PersistenceGateway + 'static,
{
    let operations = Router::new()
        .route("/api/v1/dashboard", get(dashboard_endpoint::<P>))
        .route(
            "/api/v1/export/spreadsheet",
            get(spreadsheet_endpoint::<P>),
        )
        .route(
            "/api/v1/init-sample-data",
            post(init_sample_data_endpoint::<P>),
        )
        .with_state(service.clone());

    rooms_router(service)
        .merge(operations)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
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

pub(crate) async fn dashboard_endpoint<P>(
    State(service): State<Arc<RoomService<P>>>,
) -> Json<DashboardView>
where
    P: PersistenceGateway + 'static,
{
    Json(service.dashboard())
}

/// Registry-wide CSV with a UTF-8 BOM; spreadsheet applications open it
/// directly, xlsx generation stays out of scope.
pub(crate) async fn spreadsheet_endpoint<P>(
    State(service): State<Arc<RoomService<P>>>,
) -> Result<Response, AppError>
where
    P: PersistenceGateway + 'static,
{
    let artifact = service.export_rooms_spreadsheet()?;
    Ok(attachment_response(artifact))
}

pub(crate) async fn init_sample_data_endpoint<P>(
    State(service): State<Arc<RoomService<P>>>,
) -> Result<Json<serde_json::Value>, AppError>
where
    P: PersistenceGateway + 'static,
{
    let count = service.replace_all(sample_rooms())?;
    Ok(Json(json!({
        "message": "sample data initialized",
        "rooms": count,
    })))
}

fn attachment_response(artifact: ExportArtifact) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.filename),
            ),
        ],
        artifact.body,
    )
        .into_response()
}
