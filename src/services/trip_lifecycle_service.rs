//! Servicio de ciclo de vida de viajes
//!
//! Orquestador transaccional del despacho: cada operación corre en una
//! única transacción que bloquea las filas de Trip, Vehicle y Driver
//! (siempre en ese orden), re-chequea las precondiciones sobre las
//! filas bloqueadas, ejecuta el plan puro y escribe las tres entidades.
//! O todo commitea o nada cambia.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::trip::{
    CancelTripRequest, CompleteTripRequest, CreateTripRequest, DispatchTripRequest, Trip,
};
use crate::models::vehicle::VehicleStatus;
use crate::models::driver::DriverStatus;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::sequence_repository;
use crate::repositories::trip_repository::TripRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::transitions;
use crate::utils::clock::Clock;
use crate::utils::errors::{map_commit_error, not_found_error, AppError, AppResult};
use crate::utils::ids::TRIP_PREFIX;

pub struct TripLifecycleService {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl TripLifecycleService {
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Crear un viaje en Draft. Valida disponibilidad, capacidad y
    /// agenda sobre filas bloqueadas y emite el TRP-NNNNNN dentro de la
    /// misma transacción; no muta vehículo ni conductor.
    pub async fn create_trip(&self, request: CreateTripRequest) -> AppResult<Trip> {
        let mut tx = self.pool.begin().await?;

        let vehicle = VehicleRepository::lock_by_id(&mut tx, request.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", request.vehicle_id))?;
        let driver = DriverRepository::lock_by_id(&mut tx, request.driver_id)
            .await?
            .ok_or_else(|| not_found_error("Driver", request.driver_id))?;

        transitions::check_create(&vehicle, &driver, &request, self.clock.now())?;

        // Guarda de integridad: el status Available implica que no hay
        // viaje activo, pero se verifica contra la tabla por si algún
        // dato legado rompió el invariante.
        if TripRepository::vehicle_has_active_trip(&mut tx, vehicle.id).await? {
            return Err(AppError::Conflict(format!(
                "Vehicle {} already has an active trip",
                vehicle.vehicle_id
            )));
        }
        if TripRepository::driver_has_active_trip(&mut tx, driver.id).await? {
            return Err(AppError::Conflict(format!(
                "Driver {} already has an active trip",
                driver.driver_id
            )));
        }

        let trip_id =
            sequence_repository::next_entity_id(&mut tx, TRIP_PREFIX, "trips", "trip_id").await?;
        let trip = TripRepository::insert(&mut tx, &trip_id, &request).await?;

        tx.commit().await.map_err(map_commit_error)?;

        info!(
            "🆕 Trip {} creado en DRAFT ({} → {})",
            trip.trip_id, trip.pickup_location, trip.dropoff_location
        );
        Ok(trip)
    }

    /// Draft → Dispatched: el viaje arranca, vehículo y conductor pasan
    /// a OnTrip en la misma transacción.
    pub async fn dispatch_trip(&self, id: Uuid, request: DispatchTripRequest) -> AppResult<Trip> {
        let mut tx = self.pool.begin().await?;

        let trip = TripRepository::lock_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Trip", id))?;
        let vehicle = VehicleRepository::lock_by_id(&mut tx, trip.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", trip.vehicle_id))?;
        let driver = DriverRepository::lock_by_id(&mut tx, trip.driver_id)
            .await?
            .ok_or_else(|| not_found_error("Driver", trip.driver_id))?;

        let plan = transitions::plan_dispatch(
            &trip,
            &vehicle,
            &driver,
            request.start_odometer_km,
            self.clock.now(),
        )?;

        let trip = TripRepository::apply_dispatch(
            &mut tx,
            trip.id,
            plan.start_odometer_km,
            plan.actual_pickup_time,
        )
        .await?;
        VehicleRepository::update_status(&mut tx, vehicle.id, VehicleStatus::OnTrip).await?;
        DriverRepository::update_status(&mut tx, driver.id, DriverStatus::OnTrip).await?;

        tx.commit().await.map_err(map_commit_error)?;

        info!(
            "🚚 Trip {} despachado (vehículo {}, conductor {})",
            trip.trip_id, vehicle.vehicle_id, driver.driver_id
        );
        Ok(trip)
    }

    /// Dispatched → InProgress: solo cambia el estado del viaje
    pub async fn start_transit(&self, id: Uuid) -> AppResult<Trip> {
        let mut tx = self.pool.begin().await?;

        let trip = TripRepository::lock_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Trip", id))?;
        transitions::plan_start_transit(&trip)?;

        let trip = TripRepository::apply_start_transit(&mut tx, trip.id).await?;
        tx.commit().await.map_err(map_commit_error)?;

        info!("🛣️ Trip {} en tránsito", trip.trip_id);
        Ok(trip)
    }

    /// Dispatched/InProgress → Completed: libera vehículo (Available,
    /// odómetro avanzado) y conductor (OffDuty, contadores +1/+distancia).
    pub async fn complete_trip(&self, id: Uuid, request: CompleteTripRequest) -> AppResult<Trip> {
        let mut tx = self.pool.begin().await?;

        let trip = TripRepository::lock_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Trip", id))?;
        let vehicle = VehicleRepository::lock_by_id(&mut tx, trip.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", trip.vehicle_id))?;
        let driver = DriverRepository::lock_by_id(&mut tx, trip.driver_id)
            .await?
            .ok_or_else(|| not_found_error("Driver", trip.driver_id))?;

        let plan = transitions::plan_completion(
            &trip,
            request.end_odometer_km,
            request.actual_distance_km,
            request.notes,
            self.clock.now(),
        )?;

        let trip = TripRepository::apply_completion(
            &mut tx,
            trip.id,
            plan.end_odometer_km,
            plan.actual_distance_km,
            plan.actual_delivery_time,
            plan.notes.as_deref(),
        )
        .await?;
        VehicleRepository::release_with_odometer(&mut tx, vehicle.id, plan.end_odometer_km)
            .await?;
        DriverRepository::release_with_completion(&mut tx, driver.id, plan.actual_distance_km)
            .await?;

        tx.commit().await.map_err(map_commit_error)?;

        info!(
            "✅ Trip {} completado ({} km, conductor {})",
            trip.trip_id, plan.actual_distance_km, driver.driver_id
        );
        Ok(trip)
    }

    /// Cancelación desde cualquier estado no terminal. Si el viaje
    /// estaba activo, vehículo y conductor se liberan en la misma
    /// transacción.
    pub async fn cancel_trip(&self, id: Uuid, request: CancelTripRequest) -> AppResult<Trip> {
        let mut tx = self.pool.begin().await?;

        let trip = TripRepository::lock_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Trip", id))?;
        let plan = transitions::plan_cancellation(&trip, &request.cancellation_reason)?;

        let cancelled = TripRepository::apply_cancellation(&mut tx, trip.id, &plan.reason).await?;

        if plan.release_assignment {
            let vehicle = VehicleRepository::lock_by_id(&mut tx, trip.vehicle_id)
                .await?
                .ok_or_else(|| not_found_error("Vehicle", trip.vehicle_id))?;
            let driver = DriverRepository::lock_by_id(&mut tx, trip.driver_id)
                .await?
                .ok_or_else(|| not_found_error("Driver", trip.driver_id))?;

            VehicleRepository::update_status(&mut tx, vehicle.id, VehicleStatus::Available)
                .await?;
            DriverRepository::update_status(&mut tx, driver.id, DriverStatus::OffDuty).await?;
        }

        tx.commit().await.map_err(map_commit_error)?;

        info!(
            "🛑 Trip {} cancelado: {}",
            cancelled.trip_id, cancelled.cancellation_reason
        );
        Ok(cancelled)
    }
}
