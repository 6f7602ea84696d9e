//! Planificación pura de transiciones del ciclo de despacho
//!
//! Estas funciones toman snapshots inmutables de Trip/Vehicle/Driver
//! más la entrada del caller y el instante actual, y devuelven un plan
//! con las escrituras exactas para las tres entidades, o un error. No
//! hacen IO: el servicio transaccional las ejecuta sobre filas
//! bloqueadas, por lo que re-chequear aquí el estado cierra la ventana
//! de carrera (el perdedor falla con Precondition, nunca pisa al
//! ganador).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::models::driver::Driver;
use crate::models::maintenance::{MaintenanceRecord, MaintenanceStatus};
use crate::models::trip::{CreateTripRequest, Trip, TripStatus};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::{precondition_error, validation_error, AppResult};
use crate::utils::validation::{
    validate_actual_times, validate_capacity, validate_non_negative, validate_odometer,
    validate_pickup_not_past, validate_schedule,
};

/// Escrituras del despacho: el trip pasa a Dispatched con el odómetro
/// inicial y el pickup real; vehículo y conductor pasan a OnTrip.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchPlan {
    pub start_odometer_km: Decimal,
    pub actual_pickup_time: DateTime<Utc>,
}

/// Escrituras de la finalización: trip Completed, vehículo Available
/// con odómetro avanzado, conductor OffDuty con contadores
/// incrementados exactamente una vez.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionPlan {
    pub end_odometer_km: Decimal,
    pub actual_distance_km: Decimal,
    pub actual_delivery_time: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Escrituras de la cancelación. `release_assignment` indica si el
/// viaje estaba activo y por tanto vehículo y conductor deben liberarse.
#[derive(Debug, Clone, PartialEq)]
pub struct CancellationPlan {
    pub reason: String,
    pub release_assignment: bool,
}

fn trip_label(trip: &Trip) -> String {
    format!("Trip {}", trip.trip_id)
}

fn vehicle_label(vehicle: &Vehicle) -> String {
    format!("Vehicle {}", vehicle.vehicle_id)
}

fn driver_label(driver: &Driver) -> String {
    format!("Driver {}", driver.driver_id)
}

fn record_label(record: &MaintenanceRecord) -> String {
    format!("Maintenance record {}", record.record_id)
}

/// Reglas de creación: vehículo y conductor disponibles, carga dentro
/// de capacidad, agenda coherente y pickup no en el pasado. La creación
/// no muta vehículo ni conductor.
pub fn check_create(
    vehicle: &Vehicle,
    driver: &Driver,
    request: &CreateTripRequest,
    now: DateTime<Utc>,
) -> AppResult<()> {
    validate_non_negative("cargo_weight_kg", request.cargo_weight_kg)?;
    if let Some(value) = request.cargo_value {
        validate_non_negative("cargo_value", value)?;
    }
    if let Some(estimated) = request.estimated_distance_km {
        validate_non_negative("estimated_distance_km", estimated)?;
    }

    if !vehicle.is_available_for_trip() {
        return Err(validation_error(
            "vehicle",
            format!(
                "Vehicle {} is not available (status: {})",
                vehicle.vehicle_id, vehicle.status
            ),
        ));
    }

    let today = now.date_naive();
    if !driver.is_license_valid(today) {
        return Err(validation_error(
            "driver",
            format!("Driver {} has an expired license", driver.driver_id),
        ));
    }
    if !driver.is_available_for_trip(today) {
        return Err(validation_error(
            "driver",
            format!(
                "Driver {} is not available (status: {})",
                driver.driver_id, driver.status
            ),
        ));
    }

    validate_capacity(request.cargo_weight_kg, vehicle.max_capacity_kg)?;
    validate_pickup_not_past(request.scheduled_pickup_time, now)?;
    validate_schedule(
        request.scheduled_pickup_time,
        request.scheduled_delivery_time,
    )?;

    Ok(())
}

/// Draft → Dispatched. Disponibilidad de vehículo y conductor se
/// re-valida aquí, sobre los snapshots bloqueados: un vehículo InShop o
/// un conductor suspendido entre creación y despacho aborta el despacho.
pub fn plan_dispatch(
    trip: &Trip,
    vehicle: &Vehicle,
    driver: &Driver,
    start_odometer_km: Decimal,
    now: DateTime<Utc>,
) -> AppResult<DispatchPlan> {
    if trip.status != TripStatus::Draft {
        return Err(precondition_error(
            trip_label(trip),
            trip.status.as_str(),
            TripStatus::Draft.as_str(),
        ));
    }
    validate_non_negative("start_odometer_km", start_odometer_km)?;

    if !vehicle.status.can_transition_to(VehicleStatus::OnTrip) {
        return Err(precondition_error(
            vehicle_label(vehicle),
            vehicle.status.as_str(),
            VehicleStatus::Available.as_str(),
        ));
    }

    let today = now.date_naive();
    if !driver.is_license_valid(today) {
        return Err(validation_error(
            "driver",
            format!("Driver {} has an expired license", driver.driver_id),
        ));
    }
    if !driver.is_available_for_trip(today) {
        return Err(precondition_error(
            driver_label(driver),
            driver.status.as_str(),
            "ON_DUTY or OFF_DUTY",
        ));
    }

    Ok(DispatchPlan {
        start_odometer_km,
        actual_pickup_time: now,
    })
}

/// Dispatched → InProgress. No toca vehículo ni conductor.
pub fn plan_start_transit(trip: &Trip) -> AppResult<()> {
    if trip.status != TripStatus::Dispatched {
        return Err(precondition_error(
            trip_label(trip),
            trip.status.as_str(),
            TripStatus::Dispatched.as_str(),
        ));
    }
    Ok(())
}

/// Dispatched/InProgress → Completed. El odómetro final debe superar el
/// inicial; la distancia real es la suministrada o la diferencia de
/// odómetros.
pub fn plan_completion(
    trip: &Trip,
    end_odometer_km: Decimal,
    actual_distance_km: Option<Decimal>,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> AppResult<CompletionPlan> {
    if !trip.status.is_active() {
        return Err(precondition_error(
            trip_label(trip),
            trip.status.as_str(),
            "DISPATCHED or IN_PROGRESS",
        ));
    }

    let start_odometer_km = trip.start_odometer_km.ok_or_else(|| {
        validation_error(
            "start_odometer_km",
            "Trip has no recorded start odometer reading",
        )
    })?;
    validate_odometer(start_odometer_km, end_odometer_km)?;

    validate_actual_times(trip.actual_pickup_time, Some(now))?;

    let actual_distance_km = match actual_distance_km {
        Some(distance) => {
            validate_non_negative("actual_distance_km", distance)?;
            distance
        }
        None => end_odometer_km - start_odometer_km,
    };

    Ok(CompletionPlan {
        end_odometer_km,
        actual_distance_km,
        actual_delivery_time: now,
        notes,
    })
}

/// Cancelación desde cualquier estado no terminal. Libera vehículo y
/// conductor solo si el viaje estaba activo.
pub fn plan_cancellation(trip: &Trip, reason: &str) -> AppResult<CancellationPlan> {
    if reason.trim().is_empty() {
        return Err(validation_error(
            "cancellation_reason",
            "Cancellation reason is required",
        ));
    }
    if trip.status.is_terminal() {
        return Err(precondition_error(
            trip_label(trip),
            trip.status.as_str(),
            "DRAFT, DISPATCHED or IN_PROGRESS",
        ));
    }

    Ok(CancellationPlan {
        reason: reason.to_string(),
        release_assignment: trip.status.is_active(),
    })
}

/// Arranque de mantenimiento: el registro debe estar Scheduled y el
/// vehículo no puede estar despachado ni retirado. Un vehículo ya
/// InShop por otro registro es aceptable.
pub fn check_maintenance_start(record: &MaintenanceRecord, vehicle: &Vehicle) -> AppResult<()> {
    if record.status != MaintenanceStatus::Scheduled {
        return Err(precondition_error(
            record_label(record),
            record.status.as_str(),
            MaintenanceStatus::Scheduled.as_str(),
        ));
    }
    match vehicle.status {
        VehicleStatus::Available | VehicleStatus::InShop => Ok(()),
        VehicleStatus::OnTrip | VehicleStatus::Retired => Err(precondition_error(
            vehicle_label(vehicle),
            vehicle.status.as_str(),
            "AVAILABLE or IN_SHOP",
        )),
    }
}

/// Finalización de mantenimiento: devuelve la fecha de completado, que
/// no puede ser anterior a la programada.
pub fn plan_maintenance_completion(
    record: &MaintenanceRecord,
    today: NaiveDate,
) -> AppResult<NaiveDate> {
    if record.status.is_terminal() {
        return Err(precondition_error(
            record_label(record),
            record.status.as_str(),
            "SCHEDULED or IN_PROGRESS",
        ));
    }
    if today < record.scheduled_date {
        return Err(validation_error(
            "completed_date",
            format!(
                "Completion date ({}) must be on or after the scheduled date ({})",
                today, record.scheduled_date
            ),
        ));
    }
    Ok(today)
}

/// Cancelación de mantenimiento: devuelve si el registro estaba
/// InProgress y por tanto puede haber que liberar el vehículo.
pub fn plan_maintenance_cancellation(record: &MaintenanceRecord) -> AppResult<bool> {
    if record.status.is_terminal() {
        return Err(precondition_error(
            record_label(record),
            record.status.as_str(),
            "SCHEDULED or IN_PROGRESS",
        ));
    }
    Ok(record.status == MaintenanceStatus::InProgress)
}
