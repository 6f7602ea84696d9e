//! Servicio de mantenimiento
//!
//! Acopla el ciclo de vida de los registros de mantenimiento con el
//! estado del vehículo: arrancar un mantenimiento mete el vehículo
//! InShop, y el último registro InProgress en cerrarse (completado o
//! cancelado) lo devuelve a Available. Mismo patrón transaccional que
//! el servicio de viajes, con orden de bloqueo registro → vehículo.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::maintenance::{CreateMaintenanceRequest, MaintenanceRecord, MaintenanceStatus};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::repositories::sequence_repository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::transitions;
use crate::utils::clock::Clock;
use crate::utils::errors::{map_commit_error, not_found_error, AppResult};
use crate::utils::ids::MAINTENANCE_PREFIX;
use crate::utils::validation::validate_non_negative;

pub struct MaintenanceService {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl MaintenanceService {
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Programar un mantenimiento. No exige disponibilidad del vehículo:
    /// agendar para la semana próxima con el vehículo en ruta es válido.
    pub async fn create_record(
        &self,
        request: CreateMaintenanceRequest,
    ) -> AppResult<MaintenanceRecord> {
        validate_non_negative("odometer_reading_km", request.odometer_reading_km)?;
        if let Some(labor) = request.labor_cost {
            validate_non_negative("labor_cost", labor)?;
        }
        if let Some(parts) = request.parts_cost {
            validate_non_negative("parts_cost", parts)?;
        }

        let mut tx = self.pool.begin().await?;

        VehicleRepository::lock_by_id(&mut tx, request.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", request.vehicle_id))?;

        let record_id = sequence_repository::next_entity_id(
            &mut tx,
            MAINTENANCE_PREFIX,
            "maintenance_records",
            "record_id",
        )
        .await?;
        let record = MaintenanceRepository::insert(&mut tx, &record_id, &request).await?;

        tx.commit().await.map_err(map_commit_error)?;

        info!(
            "🔧 Mantenimiento {} programado para {} el {}",
            record.record_id, request.vehicle_id, record.scheduled_date
        );
        Ok(record)
    }

    /// Scheduled → InProgress: el vehículo entra al taller
    pub async fn start(&self, id: Uuid) -> AppResult<MaintenanceRecord> {
        let mut tx = self.pool.begin().await?;

        let (record, vehicle) = Self::lock_record_and_vehicle(&mut tx, id).await?;
        transitions::check_maintenance_start(&record, &vehicle)?;

        let record =
            MaintenanceRepository::update_status(&mut tx, record.id, MaintenanceStatus::InProgress)
                .await?;
        if vehicle.status != VehicleStatus::InShop {
            VehicleRepository::update_status(&mut tx, vehicle.id, VehicleStatus::InShop).await?;
        }

        tx.commit().await.map_err(map_commit_error)?;

        info!(
            "🔩 Mantenimiento {} iniciado (vehículo {} en taller)",
            record.record_id, vehicle.vehicle_id
        );
        Ok(record)
    }

    /// Scheduled/InProgress → Completed. El vehículo vuelve a Available
    /// solo si este era su último mantenimiento InProgress.
    pub async fn complete(&self, id: Uuid) -> AppResult<MaintenanceRecord> {
        let mut tx = self.pool.begin().await?;

        let (record, vehicle) = Self::lock_record_and_vehicle(&mut tx, id).await?;
        let completed_date = transitions::plan_maintenance_completion(&record, self.clock.today())?;

        let record =
            MaintenanceRepository::apply_completion(&mut tx, record.id, completed_date).await?;
        Self::release_vehicle_if_idle(&mut tx, &record, &vehicle).await?;

        tx.commit().await.map_err(map_commit_error)?;

        info!(
            "✅ Mantenimiento {} completado el {}",
            record.record_id, completed_date
        );
        Ok(record)
    }

    /// Scheduled/InProgress → Cancelled. Si estaba InProgress el vehículo
    /// se libera igual que al completar.
    pub async fn cancel(&self, id: Uuid) -> AppResult<MaintenanceRecord> {
        let mut tx = self.pool.begin().await?;

        let (record, vehicle) = Self::lock_record_and_vehicle(&mut tx, id).await?;
        let was_in_progress = transitions::plan_maintenance_cancellation(&record)?;

        let record =
            MaintenanceRepository::update_status(&mut tx, record.id, MaintenanceStatus::Cancelled)
                .await?;
        if was_in_progress {
            Self::release_vehicle_if_idle(&mut tx, &record, &vehicle).await?;
        }

        tx.commit().await.map_err(map_commit_error)?;

        info!("🛑 Mantenimiento {} cancelado", record.record_id);
        Ok(record)
    }

    async fn lock_record_and_vehicle(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: Uuid,
    ) -> AppResult<(MaintenanceRecord, Vehicle)> {
        let record = MaintenanceRepository::lock_by_id(tx, id)
            .await?
            .ok_or_else(|| not_found_error("Maintenance record", id))?;
        let vehicle = VehicleRepository::lock_by_id(tx, record.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", record.vehicle_id))?;
        Ok((record, vehicle))
    }

    /// Devuelve el vehículo a Available si ya no le queda ningún otro
    /// mantenimiento InProgress. Solo aplica cuando sigue InShop: un
    /// vehículo retirado en el taller no se resucita.
    async fn release_vehicle_if_idle(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        record: &MaintenanceRecord,
        vehicle: &Vehicle,
    ) -> AppResult<()> {
        if vehicle.status != VehicleStatus::InShop {
            return Ok(());
        }
        let others =
            MaintenanceRepository::other_in_progress_exists(tx, vehicle.id, record.id).await?;
        if !others {
            VehicleRepository::update_status(tx, vehicle.id, VehicleStatus::Available).await?;
        }
        Ok(())
    }
}
