//! Acceso a datos de conductores
//!
//! Mismo patrón que los vehículos: lecturas contra el pool, mutaciones
//! de estado solo dentro de transacciones con la fila bloqueada.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::driver::{CreateDriverRequest, Driver, DriverStatus};
use crate::repositories::sequence_repository;
use crate::utils::errors::{map_commit_error, AppResult};
use crate::utils::ids::DRIVER_PREFIX;

pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateDriverRequest) -> AppResult<Driver> {
        let mut tx = self.pool.begin().await?;

        let driver_id =
            sequence_repository::next_entity_id(&mut tx, DRIVER_PREFIX, "drivers", "driver_id")
                .await?;

        let driver = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (
                id, driver_id, first_name, last_name, email, phone_number,
                license_number, license_type, license_expiry_date, hire_date,
                status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&driver_id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(&request.phone_number)
        .bind(&request.license_number)
        .bind(&request.license_type)
        .bind(request.license_expiry_date)
        .bind(request.hire_date)
        .bind(DriverStatus::OffDuty)
        .bind(request.notes.unwrap_or_default())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_commit_error)?;

        tx.commit().await.map_err(map_commit_error)?;
        Ok(driver)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(driver)
    }

    pub async fn list(&self) -> AppResult<Vec<Driver>> {
        let drivers = sqlx::query_as::<_, Driver>("SELECT * FROM drivers ORDER BY driver_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(drivers)
    }

    /// Cargar y bloquear la fila del conductor dentro de una transacción
    pub async fn lock_by_id(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(driver)
    }

    pub async fn update_status(
        conn: &mut PgConnection,
        id: Uuid,
        status: DriverStatus,
    ) -> AppResult<()> {
        sqlx::query("UPDATE drivers SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Completar un viaje: el conductor vuelve a OffDuty y sus contadores
    /// avanzan exactamente una vez, en una sola escritura atómica.
    pub async fn release_with_completion(
        conn: &mut PgConnection,
        id: Uuid,
        distance_km: Decimal,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE drivers
            SET status = $2,
                total_trips_completed = total_trips_completed + 1,
                total_distance_km = total_distance_km + $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(DriverStatus::OffDuty)
        .bind(distance_km)
        .execute(conn)
        .await?;
        Ok(())
    }
}
