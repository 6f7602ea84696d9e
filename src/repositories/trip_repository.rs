//! Acceso a datos de viajes
//!
//! La inserción y todas las transiciones de estado se ejecutan sobre la
//! conexión de la transacción que orquesta el servicio de ciclo de
//! vida; este módulo no decide semántica, solo persiste los planes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::trip::{CreateTripRequest, Trip, TripStatus};
use crate::utils::errors::{map_commit_error, AppResult};

pub struct TripRepository {
    pool: PgPool,
}

impl TripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Trip>> {
        let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(trip)
    }

    pub async fn list(&self, status: Option<TripStatus>) -> AppResult<Vec<Trip>> {
        let trips = match status {
            Some(status) => {
                sqlx::query_as::<_, Trip>(
                    "SELECT * FROM trips WHERE status = $1 ORDER BY created_at DESC",
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Trip>("SELECT * FROM trips ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(trips)
    }

    /// Viajes activos: Dispatched o InProgress
    pub async fn list_active(&self) -> AppResult<Vec<Trip>> {
        let trips = sqlx::query_as::<_, Trip>(
            "SELECT * FROM trips WHERE status IN ('DISPATCHED', 'IN_PROGRESS') ORDER BY scheduled_pickup_time",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(trips)
    }

    /// Cargar y bloquear la fila del viaje dentro de una transacción
    pub async fn lock_by_id(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<Trip>> {
        let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(trip)
    }

    /// ¿Tiene el vehículo ya un viaje activo? Guarda de integridad del
    /// invariante "a lo sumo un viaje Dispatched/InProgress por vehículo".
    pub async fn vehicle_has_active_trip(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
    ) -> AppResult<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM trips WHERE vehicle_id = $1 AND status IN ('DISPATCHED', 'IN_PROGRESS'))",
        )
        .bind(vehicle_id)
        .fetch_one(conn)
        .await?;
        Ok(exists)
    }

    pub async fn driver_has_active_trip(
        conn: &mut PgConnection,
        driver_id: Uuid,
    ) -> AppResult<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM trips WHERE driver_id = $1 AND status IN ('DISPATCHED', 'IN_PROGRESS'))",
        )
        .bind(driver_id)
        .fetch_one(conn)
        .await?;
        Ok(exists)
    }

    /// Insertar un viaje en Draft con el identificador ya emitido
    pub async fn insert(
        conn: &mut PgConnection,
        trip_id: &str,
        request: &CreateTripRequest,
    ) -> AppResult<Trip> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips (
                id, trip_id, vehicle_id, driver_id,
                pickup_location, pickup_address, dropoff_location, dropoff_address,
                cargo_description, cargo_weight_kg, cargo_value,
                scheduled_pickup_time, scheduled_delivery_time,
                estimated_distance_km, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(trip_id)
        .bind(request.vehicle_id)
        .bind(request.driver_id)
        .bind(&request.pickup_location)
        .bind(&request.pickup_address)
        .bind(&request.dropoff_location)
        .bind(&request.dropoff_address)
        .bind(&request.cargo_description)
        .bind(request.cargo_weight_kg)
        .bind(request.cargo_value)
        .bind(request.scheduled_pickup_time)
        .bind(request.scheduled_delivery_time)
        .bind(request.estimated_distance_km)
        .bind(TripStatus::Draft)
        .bind(request.notes.clone().unwrap_or_default())
        .fetch_one(conn)
        .await
        .map_err(map_commit_error)?;
        Ok(trip)
    }

    /// Draft → Dispatched: fija odómetro inicial y pickup real
    pub async fn apply_dispatch(
        conn: &mut PgConnection,
        id: Uuid,
        start_odometer_km: Decimal,
        actual_pickup_time: DateTime<Utc>,
    ) -> AppResult<Trip> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips
            SET status = $2, start_odometer_km = $3, actual_pickup_time = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(TripStatus::Dispatched)
        .bind(start_odometer_km)
        .bind(actual_pickup_time)
        .fetch_one(conn)
        .await?;
        Ok(trip)
    }

    /// Dispatched → InProgress: el tránsito arranca, nada más cambia
    pub async fn apply_start_transit(conn: &mut PgConnection, id: Uuid) -> AppResult<Trip> {
        let trip = sqlx::query_as::<_, Trip>(
            "UPDATE trips SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(TripStatus::InProgress)
        .fetch_one(conn)
        .await?;
        Ok(trip)
    }

    /// Dispatched/InProgress → Completed
    pub async fn apply_completion(
        conn: &mut PgConnection,
        id: Uuid,
        end_odometer_km: Decimal,
        actual_distance_km: Decimal,
        actual_delivery_time: DateTime<Utc>,
        notes: Option<&str>,
    ) -> AppResult<Trip> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips
            SET status = $2, end_odometer_km = $3, actual_distance_km = $4,
                actual_delivery_time = $5, notes = COALESCE($6, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(TripStatus::Completed)
        .bind(end_odometer_km)
        .bind(actual_distance_km)
        .bind(actual_delivery_time)
        .bind(notes)
        .fetch_one(conn)
        .await?;
        Ok(trip)
    }

    /// Cualquier estado no terminal → Cancelled
    pub async fn apply_cancellation(
        conn: &mut PgConnection,
        id: Uuid,
        reason: &str,
    ) -> AppResult<Trip> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips
            SET status = $2, cancellation_reason = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(TripStatus::Cancelled)
        .bind(reason)
        .fetch_one(conn)
        .await?;
        Ok(trip)
    }
}
