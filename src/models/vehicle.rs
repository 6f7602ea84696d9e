//! Modelo de Vehicle
//!
//! Entidad de vehículo de flota con su máquina de estados operacional.
//! El status solo lo escriben el servicio de ciclo de vida de viajes y
//! el servicio de mantenimiento; ningún otro código muta ese campo.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;
use validator::Validate;

/// Estado operacional del vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    Available,
    OnTrip,
    InShop,
    Retired,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "AVAILABLE",
            VehicleStatus::OnTrip => "ON_TRIP",
            VehicleStatus::InShop => "IN_SHOP",
            VehicleStatus::Retired => "RETIRED",
        }
    }

    /// Transiciones legales de la máquina de estados del vehículo.
    /// Retired es terminal; OnTrip y InShop son mutuamente excluyentes
    /// y solo se alcanzan desde Available.
    pub fn can_transition_to(self, next: VehicleStatus) -> bool {
        use VehicleStatus::*;
        matches!(
            (self, next),
            (Available, OnTrip)
                | (OnTrip, Available)
                | (Available, InShop)
                | (InShop, Available)
                | (Available, Retired)
                | (InShop, Retired)
        )
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tipo de vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Truck,
    Van,
    Bike,
    Trailer,
}

/// Vehicle principal - mapea a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub vehicle_id: String,
    pub name: String,
    pub vehicle_type: VehicleType,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub vin: Option<String>,
    pub max_capacity_kg: Decimal,
    pub current_odometer_km: Decimal,
    pub status: VehicleStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Un vehículo solo puede asignarse a un viaje nuevo si está Available
    pub fn is_available_for_trip(&self) -> bool {
        self.status == VehicleStatus::Available
    }
}

/// Request para crear un nuevo vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    pub vehicle_type: VehicleType,

    #[validate(length(min = 2, max = 50))]
    pub make: String,

    #[validate(length(min = 1, max = 50))]
    pub model: String,

    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,

    #[validate(length(min = 5, max = 20))]
    pub license_plate: String,

    #[validate(length(equal = 17))]
    pub vin: Option<String>,

    pub max_capacity_kg: Decimal,

    pub current_odometer_km: Option<Decimal>,

    pub notes: Option<String>,
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub vehicle_id: String,
    pub name: String,
    pub vehicle_type: VehicleType,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub vin: Option<String>,
    pub max_capacity_kg: Decimal,
    pub current_odometer_km: Decimal,
    pub status: VehicleStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            vehicle_id: vehicle.vehicle_id,
            name: vehicle.name,
            vehicle_type: vehicle.vehicle_type,
            make: vehicle.make,
            model: vehicle.model,
            year: vehicle.year,
            license_plate: vehicle.license_plate,
            vin: vehicle.vin,
            max_capacity_kg: vehicle.max_capacity_kg,
            current_odometer_km: vehicle.current_odometer_km,
            status: vehicle.status,
            notes: vehicle.notes,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
        }
    }
}
