//! Handlers de viajes
//!
//! Las transiciones de estado (dispatch, start-transit, complete,
//! cancel) delegan en el servicio de ciclo de vida; los handlers solo
//! validan la forma del request y arman la respuesta.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::trip::{
    CancelTripRequest, CompleteTripRequest, CreateTripRequest, DispatchTripRequest, TripResponse,
    TripStatus,
};
use crate::repositories::trip_repository::TripRepository;
use crate::services::trip_lifecycle_service::TripLifecycleService;
use crate::state::AppState;
use crate::utils::clock::Clock;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub fn create_trip_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_trip).get(list_trips))
        .route("/active", get(list_active_trips))
        .route("/:id", get(get_trip))
        .route("/:id/dispatch", post(dispatch_trip))
        .route("/:id/start-transit", post(start_transit))
        .route("/:id/complete", post(complete_trip))
        .route("/:id/cancel", post(cancel_trip))
}

#[derive(Debug, Deserialize)]
struct TripFilters {
    status: Option<TripStatus>,
}

fn lifecycle(state: &AppState) -> TripLifecycleService {
    TripLifecycleService::new(state.pool.clone(), state.clock.clone())
}

async fn create_trip(
    State(state): State<AppState>,
    Json(request): Json<CreateTripRequest>,
) -> AppResult<Json<TripResponse>> {
    request.validate().map_err(AppError::InvalidInput)?;
    let trip = lifecycle(&state).create_trip(request).await?;
    Ok(Json(TripResponse::from_trip(trip, state.clock.now())))
}

async fn list_trips(
    State(state): State<AppState>,
    Query(filters): Query<TripFilters>,
) -> AppResult<Json<Vec<TripResponse>>> {
    let repository = TripRepository::new(state.pool.clone());
    let trips = repository.list(filters.status).await?;
    let now = state.clock.now();
    Ok(Json(
        trips
            .into_iter()
            .map(|trip| TripResponse::from_trip(trip, now))
            .collect(),
    ))
}

async fn list_active_trips(State(state): State<AppState>) -> AppResult<Json<Vec<TripResponse>>> {
    let repository = TripRepository::new(state.pool.clone());
    let trips = repository.list_active().await?;
    let now = state.clock.now();
    Ok(Json(
        trips
            .into_iter()
            .map(|trip| TripResponse::from_trip(trip, now))
            .collect(),
    ))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TripResponse>> {
    let repository = TripRepository::new(state.pool.clone());
    let trip = repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found_error("Trip", id))?;
    Ok(Json(TripResponse::from_trip(trip, state.clock.now())))
}

async fn dispatch_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DispatchTripRequest>,
) -> AppResult<Json<TripResponse>> {
    request.validate().map_err(AppError::InvalidInput)?;
    let trip = lifecycle(&state).dispatch_trip(id, request).await?;
    Ok(Json(TripResponse::from_trip(trip, state.clock.now())))
}

async fn start_transit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TripResponse>> {
    let trip = lifecycle(&state).start_transit(id).await?;
    Ok(Json(TripResponse::from_trip(trip, state.clock.now())))
}

async fn complete_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompleteTripRequest>,
) -> AppResult<Json<TripResponse>> {
    request.validate().map_err(AppError::InvalidInput)?;
    let trip = lifecycle(&state).complete_trip(id, request).await?;
    Ok(Json(TripResponse::from_trip(trip, state.clock.now())))
}

async fn cancel_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CancelTripRequest>,
) -> AppResult<Json<TripResponse>> {
    request.validate().map_err(AppError::InvalidInput)?;
    let trip = lifecycle(&state).cancel_trip(id, request).await?;
    Ok(Json(TripResponse::from_trip(trip, state.clock.now())))
}
