//! Handlers de vehículos
//!
//! Alta y consulta. El estado del vehículo nunca se escribe por aquí:
//! solo los servicios de viajes y mantenimiento lo mutan.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::{CreateVehicleRequest, VehicleResponse};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle).get(list_vehicles))
        .route("/:id", get(get_vehicle))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleRequest>,
) -> AppResult<Json<VehicleResponse>> {
    request.validate().map_err(AppError::InvalidInput)?;
    let repository = VehicleRepository::new(state.pool.clone());
    let vehicle = repository.create(request).await?;
    Ok(Json(VehicleResponse::from(vehicle)))
}

async fn list_vehicles(State(state): State<AppState>) -> AppResult<Json<Vec<VehicleResponse>>> {
    let repository = VehicleRepository::new(state.pool.clone());
    let vehicles = repository.list().await?;
    Ok(Json(vehicles.into_iter().map(VehicleResponse::from).collect()))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<VehicleResponse>> {
    let repository = VehicleRepository::new(state.pool.clone());
    let vehicle = repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found_error("Vehicle", id))?;
    Ok(Json(VehicleResponse::from(vehicle)))
}
