//! API endpoints
//!
//! Un módulo por recurso; cada uno expone su propio router y se montan
//! todos bajo /api.

pub mod drivers;
pub mod maintenance;
pub mod trips;
pub mod vehicles;

use axum::Router;

use crate::state::AppState;

/// Crear el router principal de la API
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/vehicles", vehicles::create_vehicle_router())
        .nest("/drivers", drivers::create_driver_router())
        .nest("/trips", trips::create_trip_router())
        .nest("/maintenance", maintenance::create_maintenance_router())
}
