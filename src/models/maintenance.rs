//! Modelo de MaintenanceRecord
//!
//! Registro de mantenimiento acoplado al estado del vehículo: mientras
//! un registro esté InProgress el vehículo debe estar InShop, y vuelve
//! a Available cuando el último InProgress termina.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;
use validator::Validate;

/// Estado del registro de mantenimiento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "SCHEDULED",
            MaintenanceStatus::InProgress => "IN_PROGRESS",
            MaintenanceStatus::Completed => "COMPLETED",
            MaintenanceStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MaintenanceStatus::Completed | MaintenanceStatus::Cancelled
        )
    }

    pub fn can_transition_to(self, next: MaintenanceStatus) -> bool {
        use MaintenanceStatus::*;
        matches!(
            (self, next),
            (Scheduled, InProgress)
                | (Scheduled, Completed)
                | (InProgress, Completed)
                | (Scheduled, Cancelled)
                | (InProgress, Cancelled)
        )
    }
}

impl std::fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tipo de mantenimiento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceType {
    Preventive,
    Repair,
    Inspection,
    OilChange,
    TireService,
    BrakeService,
    EngineRepair,
    Other,
}

/// MaintenanceRecord principal - mapea a la tabla maintenance_records
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub record_id: String,
    pub vehicle_id: Uuid,
    pub maintenance_type: MaintenanceType,
    pub description: String,
    pub service_provider: String,
    pub scheduled_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub odometer_reading_km: Decimal,
    pub labor_cost: Decimal,
    pub parts_cost: Decimal,
    pub status: MaintenanceStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaintenanceRecord {
    /// Costo total derivado, nunca almacenado
    pub fn total_cost(&self) -> Decimal {
        self.labor_cost + self.parts_cost
    }
}

/// Request para programar un mantenimiento (queda en Scheduled)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaintenanceRequest {
    pub vehicle_id: Uuid,

    pub maintenance_type: MaintenanceType,

    #[validate(length(min = 1))]
    pub description: String,

    #[validate(length(min = 1, max = 200))]
    pub service_provider: String,

    pub scheduled_date: NaiveDate,

    pub odometer_reading_km: Decimal,

    pub labor_cost: Option<Decimal>,
    pub parts_cost: Option<Decimal>,

    pub notes: Option<String>,
}

/// Response de registro de mantenimiento para la API
#[derive(Debug, Serialize)]
pub struct MaintenanceResponse {
    pub id: Uuid,
    pub record_id: String,
    pub vehicle_id: Uuid,
    pub maintenance_type: MaintenanceType,
    pub description: String,
    pub service_provider: String,
    pub scheduled_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub odometer_reading_km: Decimal,
    pub labor_cost: Decimal,
    pub parts_cost: Decimal,
    pub total_cost: Decimal,
    pub status: MaintenanceStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MaintenanceRecord> for MaintenanceResponse {
    fn from(record: MaintenanceRecord) -> Self {
        Self {
            total_cost: record.total_cost(),
            id: record.id,
            record_id: record.record_id,
            vehicle_id: record.vehicle_id,
            maintenance_type: record.maintenance_type,
            description: record.description,
            service_provider: record.service_provider,
            scheduled_date: record.scheduled_date,
            completed_date: record.completed_date,
            odometer_reading_km: record.odometer_reading_km,
            labor_cost: record.labor_cost,
            parts_cost: record.parts_cost,
            status: record.status,
            notes: record.notes,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
