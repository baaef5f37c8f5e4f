use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::domain::{EquipmentChecklist, Photo, RegistryError, RoomId};
use super::export::ExportError;
use super::persistence::PersistenceGateway;
use super::query::{HistoryRange, RoomFilter};
use super::recorder::ReviewInput;
use super::service::{ExportArtifact, ExportFormat, RoomService, RoomServiceError};

/// Router exposing the room registry endpoints.
pub fn rooms_router<P>(service: Arc<RoomService<P>>) -> Router
where
    P: PersistenceGateway + 'static,
{
    Router::new()
        .route(
            "/api/v1/rooms",
            get(list_rooms_handler::<P>).post(create_room_handler::<P>),
        )
        .route("/api/v1/rooms/bulk-delete", post(bulk_delete_handler::<P>))
        .route(
            "/api/v1/rooms/:room_id",
            get(get_room_handler::<P>)
                .put(review_room_handler::<P>)
                .delete(delete_room_handler::<P>),
        )
        .route("/api/v1/rooms/:room_id/history", get(history_handler::<P>))
        .route(
            "/api/v1/rooms/:room_id/history/export",
            get(export_history_handler::<P>),
        )
        .route("/api/v1/rooms/:room_id/photo", get(photo_handler::<P>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateRoomRequest {
    pub(crate) office: String,
    pub(crate) floor: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReviewRequest {
    #[serde(default)]
    pub(crate) equipment: EquipmentChecklist,
    #[serde(default)]
    pub(crate) note: String,
    #[serde(default)]
    pub(crate) photo: Option<PhotoUpload>,
}

/// Photo payload carried inline as base64, replacing the original
/// multipart upload.
#[derive(Debug, Deserialize)]
pub(crate) struct PhotoUpload {
    pub(crate) media_type: String,
    pub(crate) data: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkDeleteRequest {
    pub(crate) ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HistoryQuery {
    pub(crate) from: Option<NaiveDate>,
    pub(crate) to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExportQuery {
    pub(crate) format: ExportFormat,
    pub(crate) from: Option<NaiveDate>,
    pub(crate) to: Option<NaiveDate>,
}

pub(crate) async fn list_rooms_handler<P>(
    State(service): State<Arc<RoomService<P>>>,
    Query(filter): Query<RoomFilter>,
) -> Response
where
    P: PersistenceGateway + 'static,
{
    (StatusCode::OK, axum::Json(service.list_rooms(&filter))).into_response()
}

pub(crate) async fn create_room_handler<P>(
    State(service): State<Arc<RoomService<P>>>,
    axum::Json(request): axum::Json<CreateRoomRequest>,
) -> Response
where
    P: PersistenceGateway + 'static,
{
    match service.create_room(request.office.trim(), request.floor.trim()) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn get_room_handler<P>(
    State(service): State<Arc<RoomService<P>>>,
    Path(room_id): Path<String>,
) -> Response
where
    P: PersistenceGateway + 'static,
{
    match service.get_room(&RoomId::parse(&room_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn review_room_handler<P>(
    State(service): State<Arc<RoomService<P>>>,
    Path(room_id): Path<String>,
    axum::Json(request): axum::Json<ReviewRequest>,
) -> Response
where
    P: PersistenceGateway + 'static,
{
    let photo = match request.photo.map(decode_photo).transpose() {
        Ok(photo) => photo,
        Err(response) => return *response,
    };

    let input = ReviewInput {
        equipment: request.equipment,
        note: request.note,
        photo,
    };

    match service.record_review(&RoomId::parse(&room_id), input) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn delete_room_handler<P>(
    State(service): State<Arc<RoomService<P>>>,
    Path(room_id): Path<String>,
) -> Response
where
    P: PersistenceGateway + 'static,
{
    match service.delete_room(&RoomId::parse(&room_id)) {
        Ok(removed) => (StatusCode::OK, axum::Json(json!({ "removed": removed }))).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn bulk_delete_handler<P>(
    State(service): State<Arc<RoomService<P>>>,
    axum::Json(request): axum::Json<BulkDeleteRequest>,
) -> Response
where
    P: PersistenceGateway + 'static,
{
    let ids: Vec<RoomId> = request.ids.iter().map(|raw| RoomId::parse(raw)).collect();
    match service.delete_rooms(ids) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn history_handler<P>(
    State(service): State<Arc<RoomService<P>>>,
    Path(room_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Response
where
    P: PersistenceGateway + 'static,
{
    let range = HistoryRange {
        start: query.from,
        end: query.to,
    };
    match service.history(&RoomId::parse(&room_id), &range) {
        Ok(reviews) => (StatusCode::OK, axum::Json(reviews)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn export_history_handler<P>(
    State(service): State<Arc<RoomService<P>>>,
    Path(room_id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Response
where
    P: PersistenceGateway + 'static,
{
    let range = HistoryRange {
        start: query.from,
        end: query.to,
    };
    match service.export_history(&RoomId::parse(&room_id), &range, query.format) {
        Ok(artifact) => artifact_response(artifact),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn photo_handler<P>(
    State(service): State<Arc<RoomService<P>>>,
    Path(room_id): Path<String>,
) -> Response
where
    P: PersistenceGateway + 'static,
{
    match service.latest_photo(&RoomId::parse(&room_id)) {
        Ok(Some(Photo::Embedded { media_type, bytes })) => {
            (StatusCode::OK, [(header::CONTENT_TYPE, media_type)], bytes).into_response()
        }
        Ok(Some(Photo::Stored { path })) => {
            (StatusCode::OK, axum::Json(json!({ "path": path }))).into_response()
        }
        Ok(None) => error_response(StatusCode::NOT_FOUND, "room has no photo on record"),
        Err(err) => service_error_response(err),
    }
}

pub(crate) fn artifact_response(artifact: ExportArtifact) -> Response {
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

fn decode_photo(upload: PhotoUpload) -> Result<Photo, Box<Response>> {
    let media_type = match upload.media_type.parse::<mime::Mime>() {
        Ok(parsed) if parsed.type_() == mime::IMAGE => parsed,
        _ => {
            return Err(Box::new(error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                "photo media type must be an image format",
            )))
        }
    };

    let bytes = STANDARD.decode(upload.data.as_bytes()).map_err(|_| {
        Box::new(error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "photo data must be valid base64",
        ))
    })?;

    Ok(Photo::embedded(media_type.essence_str(), bytes))
}

fn service_error_response(error: RoomServiceError) -> Response {
    let status = match &error {
        RoomServiceError::Registry(RegistryError::RoomNotFound(_)) => StatusCode::NOT_FOUND,
        RoomServiceError::Registry(RegistryError::DuplicateRoom(_)) => StatusCode::CONFLICT,
        RoomServiceError::Registry(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RoomServiceError::Export(ExportError::NothingSelected) => StatusCode::BAD_REQUEST,
        RoomServiceError::Export(_) | RoomServiceError::Persistence(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, &error.to_string())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}
