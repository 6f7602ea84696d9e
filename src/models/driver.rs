//! Modelo de Driver
//!
//! Entidad de conductor con su máquina de estados de servicio y los
//! contadores de rendimiento que solo muta la finalización de viajes.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;
use validator::Validate;

/// Estado de servicio del conductor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverStatus {
    OnDuty,
    OffDuty,
    OnTrip,
    Suspended,
}

impl DriverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::OnDuty => "ON_DUTY",
            DriverStatus::OffDuty => "OFF_DUTY",
            DriverStatus::OnTrip => "ON_TRIP",
            DriverStatus::Suspended => "SUSPENDED",
        }
    }

    /// Transiciones legales. OnTrip solo se alcanza desde OnDuty/OffDuty
    /// vía dispatch, y siempre vuelve a OffDuty al completar o cancelar.
    pub fn can_transition_to(self, next: DriverStatus) -> bool {
        use DriverStatus::*;
        matches!(
            (self, next),
            (OnDuty, OffDuty)
                | (OffDuty, OnDuty)
                | (OnDuty, OnTrip)
                | (OffDuty, OnTrip)
                | (OnTrip, OffDuty)
                | (OnDuty, Suspended)
                | (OffDuty, Suspended)
                | (Suspended, OffDuty)
        )
    }
}

impl std::fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Driver principal - mapea a la tabla drivers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub driver_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub license_number: String,
    pub license_type: String,
    pub license_expiry_date: NaiveDate,
    pub hire_date: NaiveDate,
    pub status: DriverStatus,
    pub safety_score: i32,
    pub total_trips_completed: i32,
    pub total_distance_km: Decimal,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// La licencia es válida hasta el día de expiración inclusive
    pub fn is_license_valid(&self, today: NaiveDate) -> bool {
        self.license_expiry_date >= today
    }

    /// Un conductor puede asignarse a un viaje nuevo si está OnDuty u
    /// OffDuty y su licencia no expiró. Suspended nunca es asignable.
    pub fn is_available_for_trip(&self, today: NaiveDate) -> bool {
        matches!(self.status, DriverStatus::OnDuty | DriverStatus::OffDuty)
            && self.is_license_valid(today)
    }

    /// Días hasta la expiración de la licencia (negativo si ya expiró)
    pub fn days_until_license_expiry(&self, today: NaiveDate) -> i64 {
        (self.license_expiry_date - today).num_days()
    }
}

/// Request para crear un nuevo conductor
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50))]
    pub last_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 7, max = 20))]
    pub phone_number: String,

    #[validate(length(min = 1, max = 50))]
    pub license_number: String,

    #[validate(length(min = 1, max = 20))]
    pub license_type: String,

    pub license_expiry_date: NaiveDate,

    pub hire_date: NaiveDate,

    pub notes: Option<String>,
}

/// Response de conductor para la API, con los campos derivados de licencia
#[derive(Debug, Serialize)]
pub struct DriverResponse {
    pub id: Uuid,
    pub driver_id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub license_number: String,
    pub license_type: String,
    pub license_expiry_date: NaiveDate,
    pub is_license_valid: bool,
    pub days_until_license_expiry: i64,
    pub hire_date: NaiveDate,
    pub status: DriverStatus,
    pub safety_score: i32,
    pub total_trips_completed: i32,
    pub total_distance_km: Decimal,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DriverResponse {
    /// Los campos derivados se recalculan contra "hoy", nunca se almacenan
    pub fn from_driver(driver: Driver, today: NaiveDate) -> Self {
        Self {
            full_name: driver.full_name(),
            is_license_valid: driver.is_license_valid(today),
            days_until_license_expiry: driver.days_until_license_expiry(today),
            id: driver.id,
            driver_id: driver.driver_id,
            first_name: driver.first_name,
            last_name: driver.last_name,
            email: driver.email,
            phone_number: driver.phone_number,
            license_number: driver.license_number,
            license_type: driver.license_type,
            license_expiry_date: driver.license_expiry_date,
            hire_date: driver.hire_date,
            status: driver.status,
            safety_score: driver.safety_score,
            total_trips_completed: driver.total_trips_completed,
            total_distance_km: driver.total_distance_km,
            notes: driver.notes,
            created_at: driver.created_at,
            updated_at: driver.updated_at,
        }
    }
}
