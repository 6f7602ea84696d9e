//! Handlers de conductores

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::models::driver::{CreateDriverRequest, DriverResponse};
use crate::repositories::driver_repository::DriverRepository;
use crate::state::AppState;
use crate::utils::clock::Clock;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_driver).get(list_drivers))
        .route("/:id", get(get_driver))
}

async fn create_driver(
    State(state): State<AppState>,
    Json(request): Json<CreateDriverRequest>,
) -> AppResult<Json<DriverResponse>> {
    request.validate().map_err(AppError::InvalidInput)?;
    let repository = DriverRepository::new(state.pool.clone());
    let driver = repository.create(request).await?;
    Ok(Json(DriverResponse::from_driver(driver, state.clock.today())))
}

async fn list_drivers(State(state): State<AppState>) -> AppResult<Json<Vec<DriverResponse>>> {
    let repository = DriverRepository::new(state.pool.clone());
    let drivers = repository.list().await?;
    let today = state.clock.today();
    Ok(Json(
        drivers
            .into_iter()
            .map(|driver| DriverResponse::from_driver(driver, today))
            .collect(),
    ))
}

async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DriverResponse>> {
    let repository = DriverRepository::new(state.pool.clone());
    let driver = repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found_error("Driver", id))?;
    Ok(Json(DriverResponse::from_driver(driver, state.clock.today())))
}
