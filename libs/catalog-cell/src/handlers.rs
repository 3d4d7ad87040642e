use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{CatalogError, DiagnosticCategory};
use crate::services::CatalogService;

fn map_error(err: CatalogError) -> AppError {
    match err {
        CatalogError::DoctorNotFound | CatalogError::TestNotFound => {
            AppError::NotFound(err.to_string())
        }
        CatalogError::Database(msg) => AppError::Database(msg),
    }
}

#[derive(Debug, Deserialize)]
pub struct DoctorQueryParams {
    pub specialty_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct TestQueryParams {
    pub category: Option<DiagnosticCategory>,
    pub search: Option<String>,
}

pub async fn list_specialties(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(&state);
    let specialties = service.list_specialties().await.map_err(map_error)?;

    Ok(Json(json!(specialties)))
}

pub async fn list_doctors(
    State(state): State<Arc<AppConfig>>,
    Query(params): Query<DoctorQueryParams>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(&state);
    let doctors = service.list_doctors(params.specialty_id).await.map_err(map_error)?;

    Ok(Json(json!(doctors)))
}

pub async fn get_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(&state);
    let doctor = service.get_doctor(doctor_id).await.map_err(map_error)?;

    Ok(Json(json!(doctor)))
}

pub async fn list_tests(
    State(state): State<Arc<AppConfig>>,
    Query(params): Query<TestQueryParams>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(&state);
    let tests = service
        .list_tests(params.category, params.search.as_deref())
        .await
        .map_err(map_error)?;

    Ok(Json(json!(tests)))
}

pub async fn get_test(
    State(state): State<Arc<AppConfig>>,
    Path(test_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(&state);
    let test = service.get_test(test_id).await.map_err(map_error)?;

    Ok(Json(json!(test)))
}
