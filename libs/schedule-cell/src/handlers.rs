use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{CreateExceptionRequest, CreateWindowRequest, ScheduleError, UpdateWindowRequest};
use crate::services::ScheduleService;

fn map_error(err: ScheduleError) -> AppError {
    match err {
        ScheduleError::InvalidWindow(msg) => AppError::ValidationError(msg),
        ScheduleError::DuplicateWindow | ScheduleError::DuplicateException => {
            AppError::Conflict(err.to_string())
        }
        ScheduleError::NotFound => AppError::NotFound(err.to_string()),
        ScheduleError::Database(msg) => AppError::Database(msg),
    }
}

pub async fn create_window(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateWindowRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = ScheduleService::new(&state);
    let window = service.create_window(request).await.map_err(map_error)?;

    Ok((StatusCode::CREATED, Json(json!(window))))
}

pub async fn list_windows(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);
    let windows = service.list_windows(provider_id).await.map_err(map_error)?;

    Ok(Json(json!(windows)))
}

pub async fn update_window(
    State(state): State<Arc<AppConfig>>,
    Path(window_id): Path<Uuid>,
    Json(request): Json<UpdateWindowRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);
    let window = service.update_window(window_id, request).await.map_err(map_error)?;

    Ok(Json(json!(window)))
}

pub async fn delete_window(
    State(state): State<Arc<AppConfig>>,
    Path(window_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);
    service.delete_window(window_id).await.map_err(map_error)?;

    Ok(Json(json!({ "message": "Window deleted" })))
}

pub async fn create_exception(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateExceptionRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = ScheduleService::new(&state);
    let exception = service.create_exception(request).await.map_err(map_error)?;

    Ok((StatusCode::CREATED, Json(json!(exception))))
}

pub async fn list_exceptions(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);
    let exceptions = service.list_exceptions(provider_id).await.map_err(map_error)?;

    Ok(Json(json!(exceptions)))
}

pub async fn delete_exception(
    State(state): State<Arc<AppConfig>>,
    Path(exception_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);
    service.delete_exception(exception_id).await.map_err(map_error)?;

    Ok(Json(json!({ "message": "Exception deleted" })))
}
