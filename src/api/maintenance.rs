//! Handlers de mantenimiento

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::maintenance::{CreateMaintenanceRequest, MaintenanceResponse};
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::services::maintenance_service::MaintenanceService;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_record).get(list_records))
        .route("/:id", get(get_record))
        .route("/:id/start", post(start_record))
        .route("/:id/complete", post(complete_record))
        .route("/:id/cancel", post(cancel_record))
}

#[derive(Debug, Deserialize)]
struct MaintenanceFilters {
    vehicle_id: Option<Uuid>,
}

fn service(state: &AppState) -> MaintenanceService {
    MaintenanceService::new(state.pool.clone(), state.clock.clone())
}

async fn create_record(
    State(state): State<AppState>,
    Json(request): Json<CreateMaintenanceRequest>,
) -> AppResult<Json<MaintenanceResponse>> {
    request.validate().map_err(AppError::InvalidInput)?;
    let record = service(&state).create_record(request).await?;
    Ok(Json(MaintenanceResponse::from(record)))
}

async fn list_records(
    State(state): State<AppState>,
    Query(filters): Query<MaintenanceFilters>,
) -> AppResult<Json<Vec<MaintenanceResponse>>> {
    let repository = MaintenanceRepository::new(state.pool.clone());
    let records = repository.list(filters.vehicle_id).await?;
    Ok(Json(
        records.into_iter().map(MaintenanceResponse::from).collect(),
    ))
}

async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MaintenanceResponse>> {
    let repository = MaintenanceRepository::new(state.pool.clone());
    let record = repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found_error("Maintenance record", id))?;
    Ok(Json(MaintenanceResponse::from(record)))
}

async fn start_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MaintenanceResponse>> {
    let record = service(&state).start(id).await?;
    Ok(Json(MaintenanceResponse::from(record)))
}

async fn complete_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MaintenanceResponse>> {
    let record = service(&state).complete(id).await?;
    Ok(Json(MaintenanceResponse::from(record)))
}

async fn cancel_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MaintenanceResponse>> {
    let record = service(&state).cancel(id).await?;
    Ok(Json(MaintenanceResponse::from(record)))
}
