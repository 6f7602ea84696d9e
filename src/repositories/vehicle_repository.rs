//! Acceso a datos de vehículos
//!
//! Las operaciones de lectura van contra el pool; las que participan en
//! una transacción de ciclo de vida reciben la conexión de la
//! transacción y bloquean la fila con SELECT ... FOR UPDATE.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::vehicle::{CreateVehicleRequest, Vehicle, VehicleStatus};
use crate::repositories::sequence_repository;
use crate::utils::errors::{map_commit_error, AppResult};
use crate::utils::ids::VEHICLE_PREFIX;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear un vehículo con identificador generado, en una transacción
    /// propia para serializar la emisión del VEH-NNNNNN.
    pub async fn create(&self, request: CreateVehicleRequest) -> AppResult<Vehicle> {
        let mut tx = self.pool.begin().await?;

        let vehicle_id =
            sequence_repository::next_entity_id(&mut tx, VEHICLE_PREFIX, "vehicles", "vehicle_id")
                .await?;

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, vehicle_id, name, vehicle_type, make, model, year,
                license_plate, vin, max_capacity_kg, current_odometer_km,
                status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&vehicle_id)
        .bind(&request.name)
        .bind(request.vehicle_type)
        .bind(&request.make)
        .bind(&request.model)
        .bind(request.year)
        .bind(&request.license_plate)
        .bind(&request.vin)
        .bind(request.max_capacity_kg)
        .bind(request.current_odometer_km.unwrap_or(Decimal::ZERO))
        .bind(VehicleStatus::Available)
        .bind(request.notes.unwrap_or_default())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_commit_error)?;

        tx.commit().await.map_err(map_commit_error)?;
        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(vehicle)
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY vehicle_id")
                .fetch_all(&self.pool)
                .await?;
        Ok(vehicles)
    }

    /// Cargar y bloquear la fila del vehículo dentro de una transacción
    pub async fn lock_by_id(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(vehicle)
    }

    /// Escribir el nuevo estado del vehículo dentro de la transacción.
    /// Solo los servicios de ciclo de vida y mantenimiento pasan por aquí.
    pub async fn update_status(
        conn: &mut PgConnection,
        id: Uuid,
        status: VehicleStatus,
    ) -> AppResult<()> {
        sqlx::query("UPDATE vehicles SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Al completar un viaje el vehículo vuelve a Available y su odómetro
    /// avanza al valor final reportado, en una sola escritura.
    pub async fn release_with_odometer(
        conn: &mut PgConnection,
        id: Uuid,
        odometer_km: Decimal,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE vehicles
            SET status = $2, current_odometer_km = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(VehicleStatus::Available)
        .bind(odometer_km)
        .execute(conn)
        .await?;
        Ok(())
    }
}
