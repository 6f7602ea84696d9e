//! Acceso a datos de registros de mantenimiento

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::maintenance::{CreateMaintenanceRequest, MaintenanceRecord, MaintenanceStatus};
use crate::utils::errors::{map_commit_error, AppResult};
use rust_decimal::Decimal;

pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceRecord>> {
        let record =
            sqlx::query_as::<_, MaintenanceRecord>("SELECT * FROM maintenance_records WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(record)
    }

    pub async fn list(&self, vehicle_id: Option<Uuid>) -> AppResult<Vec<MaintenanceRecord>> {
        let records = match vehicle_id {
            Some(vehicle_id) => {
                sqlx::query_as::<_, MaintenanceRecord>(
                    "SELECT * FROM maintenance_records WHERE vehicle_id = $1 ORDER BY scheduled_date DESC",
                )
                .bind(vehicle_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, MaintenanceRecord>(
                    "SELECT * FROM maintenance_records ORDER BY scheduled_date DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(records)
    }

    /// Cargar y bloquear el registro dentro de una transacción
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> AppResult<Option<MaintenanceRecord>> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(
            "SELECT * FROM maintenance_records WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;
        Ok(record)
    }

    /// ¿Queda algún otro registro InProgress para el vehículo? Se
    /// consulta dentro de la misma transacción para evitar lecturas
    /// rancias antes de devolver el vehículo a Available.
    pub async fn other_in_progress_exists(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
        exclude_record: Uuid,
    ) -> AppResult<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM maintenance_records
                WHERE vehicle_id = $1 AND status = 'IN_PROGRESS' AND id <> $2
            )
            "#,
        )
        .bind(vehicle_id)
        .bind(exclude_record)
        .fetch_one(conn)
        .await?;
        Ok(exists)
    }

    pub async fn insert(
        conn: &mut PgConnection,
        record_id: &str,
        request: &CreateMaintenanceRequest,
    ) -> AppResult<MaintenanceRecord> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            INSERT INTO maintenance_records (
                id, record_id, vehicle_id, maintenance_type, description,
                service_provider, scheduled_date, odometer_reading_km,
                labor_cost, parts_cost, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record_id)
        .bind(request.vehicle_id)
        .bind(request.maintenance_type)
        .bind(&request.description)
        .bind(&request.service_provider)
        .bind(request.scheduled_date)
        .bind(request.odometer_reading_km)
        .bind(request.labor_cost.unwrap_or(Decimal::ZERO))
        .bind(request.parts_cost.unwrap_or(Decimal::ZERO))
        .bind(MaintenanceStatus::Scheduled)
        .bind(request.notes.clone().unwrap_or_default())
        .fetch_one(conn)
        .await
        .map_err(map_commit_error)?;
        Ok(record)
    }

    pub async fn update_status(
        conn: &mut PgConnection,
        id: Uuid,
        status: MaintenanceStatus,
    ) -> AppResult<MaintenanceRecord> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(
            "UPDATE maintenance_records SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(conn)
        .await?;
        Ok(record)
    }

    /// Scheduled/InProgress → Completed con fecha de finalización
    pub async fn apply_completion(
        conn: &mut PgConnection,
        id: Uuid,
        completed_date: NaiveDate,
    ) -> AppResult<MaintenanceRecord> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            UPDATE maintenance_records
            SET status = $2, completed_date = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(MaintenanceStatus::Completed)
        .bind(completed_date)
        .fetch_one(conn)
        .await?;
        Ok(record)
    }
}
