//! Modelo de Trip
//!
//! El viaje es el agregado coordinador del ciclo de despacho: referencia
//! exactamente un vehículo y un conductor y su máquina de estados es la
//! primaria del sistema. Las propiedades derivadas (duración, retraso,
//! distancia calculada) se recalculan en lectura, nunca se almacenan.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;
use validator::Validate;

/// Estado del viaje - la máquina de estados primaria
///
/// Draft → Dispatched → InProgress → Completed, con Cancelled alcanzable
/// desde cualquier estado no terminal. Nunca se vuelve a Draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    Draft,
    Dispatched,
    InProgress,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Draft => "DRAFT",
            TripStatus::Dispatched => "DISPATCHED",
            TripStatus::InProgress => "IN_PROGRESS",
            TripStatus::Completed => "COMPLETED",
            TripStatus::Cancelled => "CANCELLED",
        }
    }

    /// Completed y Cancelled son terminales: el viaje queda inmutable
    pub fn is_terminal(self) -> bool {
        matches!(self, TripStatus::Completed | TripStatus::Cancelled)
    }

    /// Un viaje activo mantiene a su vehículo y conductor como OnTrip
    pub fn is_active(self) -> bool {
        matches!(self, TripStatus::Dispatched | TripStatus::InProgress)
    }

    pub fn can_transition_to(self, next: TripStatus) -> bool {
        use TripStatus::*;
        matches!(
            (self, next),
            (Draft, Dispatched)
                | (Dispatched, InProgress)
                | (Dispatched, Completed)
                | (InProgress, Completed)
                | (Draft, Cancelled)
                | (Dispatched, Cancelled)
                | (InProgress, Cancelled)
        )
    }
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trip principal - mapea a la tabla trips
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    pub trip_id: String,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub pickup_location: String,
    pub pickup_address: String,
    pub dropoff_location: String,
    pub dropoff_address: String,
    pub cargo_description: String,
    pub cargo_weight_kg: Decimal,
    pub cargo_value: Option<Decimal>,
    pub scheduled_pickup_time: DateTime<Utc>,
    pub scheduled_delivery_time: DateTime<Utc>,
    pub actual_pickup_time: Option<DateTime<Utc>>,
    pub actual_delivery_time: Option<DateTime<Utc>>,
    pub estimated_distance_km: Option<Decimal>,
    pub actual_distance_km: Option<Decimal>,
    pub start_odometer_km: Option<Decimal>,
    pub end_odometer_km: Option<Decimal>,
    pub status: TripStatus,
    pub notes: String,
    pub cancellation_reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// Duración real del viaje en horas, redondeada a 2 decimales.
    /// `None` mientras falte alguno de los dos timestamps reales.
    pub fn duration_hours(&self) -> Option<f64> {
        let pickup = self.actual_pickup_time?;
        let delivery = self.actual_delivery_time?;
        let hours = (delivery - pickup).num_seconds() as f64 / 3600.0;
        Some((hours * 100.0).round() / 100.0)
    }

    /// Un viaje está retrasado si se completó después de la entrega
    /// programada, o si sigue Dispatched pasada la hora de pickup.
    pub fn is_delayed(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            TripStatus::Completed => self
                .actual_delivery_time
                .map(|actual| actual > self.scheduled_delivery_time)
                .unwrap_or(false),
            TripStatus::Dispatched => now > self.scheduled_pickup_time,
            _ => false,
        }
    }

    /// Distancia real si existe, estimada como fallback
    pub fn calculated_distance_km(&self) -> Option<Decimal> {
        self.actual_distance_km.or(self.estimated_distance_km)
    }
}

/// Request para crear un viaje (queda en Draft)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTripRequest {
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,

    #[validate(length(min = 1, max = 255))]
    pub pickup_location: String,

    #[validate(length(min = 1))]
    pub pickup_address: String,

    #[validate(length(min = 1, max = 255))]
    pub dropoff_location: String,

    #[validate(length(min = 1))]
    pub dropoff_address: String,

    #[validate(length(min = 1))]
    pub cargo_description: String,

    pub cargo_weight_kg: Decimal,
    pub cargo_value: Option<Decimal>,

    pub scheduled_pickup_time: DateTime<Utc>,
    pub scheduled_delivery_time: DateTime<Utc>,

    pub estimated_distance_km: Option<Decimal>,

    pub notes: Option<String>,
}

/// Request para despachar un viaje Draft
#[derive(Debug, Deserialize, Validate)]
pub struct DispatchTripRequest {
    pub start_odometer_km: Decimal,
}

/// Request para completar un viaje activo
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteTripRequest {
    pub end_odometer_km: Decimal,
    pub actual_distance_km: Option<Decimal>,
    pub notes: Option<String>,
}

/// Request para cancelar un viaje no terminal
#[derive(Debug, Deserialize, Validate)]
pub struct CancelTripRequest {
    #[validate(length(min = 1))]
    pub cancellation_reason: String,
}

/// Response de viaje para la API, con las propiedades derivadas
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub id: Uuid,
    pub trip_id: String,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub pickup_location: String,
    pub pickup_address: String,
    pub dropoff_location: String,
    pub dropoff_address: String,
    pub cargo_description: String,
    pub cargo_weight_kg: Decimal,
    pub cargo_value: Option<Decimal>,
    pub scheduled_pickup_time: DateTime<Utc>,
    pub scheduled_delivery_time: DateTime<Utc>,
    pub actual_pickup_time: Option<DateTime<Utc>>,
    pub actual_delivery_time: Option<DateTime<Utc>>,
    pub estimated_distance_km: Option<Decimal>,
    pub actual_distance_km: Option<Decimal>,
    pub calculated_distance_km: Option<Decimal>,
    pub start_odometer_km: Option<Decimal>,
    pub end_odometer_km: Option<Decimal>,
    pub status: TripStatus,
    pub duration_hours: Option<f64>,
    pub is_delayed: bool,
    pub notes: String,
    pub cancellation_reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TripResponse {
    /// Las propiedades derivadas se recalculan contra "ahora" en cada
    /// lectura para evitar bugs de datos rancios.
    pub fn from_trip(trip: Trip, now: DateTime<Utc>) -> Self {
        Self {
            duration_hours: trip.duration_hours(),
            is_delayed: trip.is_delayed(now),
            calculated_distance_km: trip.calculated_distance_km(),
            id: trip.id,
            trip_id: trip.trip_id,
            vehicle_id: trip.vehicle_id,
            driver_id: trip.driver_id,
            pickup_location: trip.pickup_location,
            pickup_address: trip.pickup_address,
            dropoff_location: trip.dropoff_location,
            dropoff_address: trip.dropoff_address,
            cargo_description: trip.cargo_description,
            cargo_weight_kg: trip.cargo_weight_kg,
            cargo_value: trip.cargo_value,
            scheduled_pickup_time: trip.scheduled_pickup_time,
            scheduled_delivery_time: trip.scheduled_delivery_time,
            actual_pickup_time: trip.actual_pickup_time,
            actual_delivery_time: trip.actual_delivery_time,
            estimated_distance_km: trip.estimated_distance_km,
            actual_distance_km: trip.actual_distance_km,
            start_odometer_km: trip.start_odometer_km,
            end_odometer_km: trip.end_odometer_km,
            status: trip.status,
            notes: trip.notes,
            cancellation_reason: trip.cancellation_reason,
            created_at: trip.created_at,
            updated_at: trip.updated_at,
        }
    }
}
