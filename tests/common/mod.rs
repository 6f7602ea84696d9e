//! Fixtures compartidas de las suites de integración
//!
//! Construyen snapshots de entidades directamente, sin base de datos:
//! el planificador de transiciones es puro y se ejercita con structs.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use fleetflow::models::driver::{Driver, DriverStatus};
use fleetflow::models::maintenance::{MaintenanceRecord, MaintenanceStatus, MaintenanceType};
use fleetflow::models::trip::{CreateTripRequest, Trip, TripStatus};
use fleetflow::models::vehicle::{Vehicle, VehicleStatus, VehicleType};

/// "Ahora" fijo de las suites: 2025-06-15 07:00 UTC
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 7, 0, 0).unwrap()
}

pub fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

pub fn sample_vehicle(status: VehicleStatus) -> Vehicle {
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    Vehicle {
        id: Uuid::new_v4(),
        vehicle_id: "VEH-000001".to_string(),
        name: "Volvo FH16 #1".to_string(),
        vehicle_type: VehicleType::Truck,
        make: "Volvo".to_string(),
        model: "FH16".to_string(),
        year: 2022,
        license_plate: "AB-123-CD".to_string(),
        vin: None,
        max_capacity_kg: dec(24_000),
        current_odometer_km: dec(50_000),
        status,
        notes: String::new(),
        created_at: created,
        updated_at: created,
    }
}

pub fn sample_driver(status: DriverStatus) -> Driver {
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    Driver {
        id: Uuid::new_v4(),
        driver_id: "DRV-000001".to_string(),
        first_name: "Marie".to_string(),
        last_name: "Dupont".to_string(),
        email: "marie@example.com".to_string(),
        phone_number: "0601020304".to_string(),
        license_number: "CDL-12345".to_string(),
        license_type: "CDL-A".to_string(),
        license_expiry_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        hire_date: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
        status,
        safety_score: 100,
        total_trips_completed: 12,
        total_distance_km: dec(8_400),
        notes: String::new(),
        created_at: created,
        updated_at: created,
    }
}

pub fn sample_request(vehicle: &Vehicle, driver: &Driver) -> CreateTripRequest {
    CreateTripRequest {
        vehicle_id: vehicle.id,
        driver_id: driver.id,
        pickup_location: "Lyon Hub".to_string(),
        pickup_address: "12 Rue de la République, Lyon".to_string(),
        dropoff_location: "Paris Depot".to_string(),
        dropoff_address: "3 Avenue des Ternes, Paris".to_string(),
        cargo_description: "Palettes de pièces".to_string(),
        cargo_weight_kg: dec(1_200),
        cargo_value: None,
        scheduled_pickup_time: Utc.with_ymd_and_hms(2025, 6, 15, 8, 0, 0).unwrap(),
        scheduled_delivery_time: Utc.with_ymd_and_hms(2025, 6, 15, 16, 0, 0).unwrap(),
        estimated_distance_km: Some(dec(465)),
        notes: None,
    }
}

pub fn sample_trip(status: TripStatus, vehicle: &Vehicle, driver: &Driver) -> Trip {
    let created = Utc.with_ymd_and_hms(2025, 6, 14, 10, 0, 0).unwrap();
    let dispatched = status != TripStatus::Draft;
    Trip {
        id: Uuid::new_v4(),
        trip_id: "TRP-000001".to_string(),
        vehicle_id: vehicle.id,
        driver_id: driver.id,
        pickup_location: "Lyon Hub".to_string(),
        pickup_address: "12 Rue de la République, Lyon".to_string(),
        dropoff_location: "Paris Depot".to_string(),
        dropoff_address: "3 Avenue des Ternes, Paris".to_string(),
        cargo_description: "Palettes de pièces".to_string(),
        cargo_weight_kg: dec(1_200),
        cargo_value: None,
        scheduled_pickup_time: Utc.with_ymd_and_hms(2025, 6, 15, 8, 0, 0).unwrap(),
        scheduled_delivery_time: Utc.with_ymd_and_hms(2025, 6, 15, 16, 0, 0).unwrap(),
        actual_pickup_time: dispatched
            .then(|| Utc.with_ymd_and_hms(2025, 6, 15, 6, 30, 0).unwrap()),
        actual_delivery_time: None,
        estimated_distance_km: Some(dec(465)),
        actual_distance_km: None,
        start_odometer_km: dispatched.then(|| dec(50_000)),
        end_odometer_km: None,
        status,
        notes: String::new(),
        cancellation_reason: String::new(),
        created_at: created,
        updated_at: created,
    }
}

pub fn sample_record(status: MaintenanceStatus, vehicle: &Vehicle) -> MaintenanceRecord {
    let created = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    MaintenanceRecord {
        id: Uuid::new_v4(),
        record_id: "MNT-000001".to_string(),
        vehicle_id: vehicle.id,
        maintenance_type: MaintenanceType::Preventive,
        description: "Service 60k km".to_string(),
        service_provider: "Garage Central".to_string(),
        scheduled_date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
        completed_date: None,
        odometer_reading_km: dec(50_000),
        labor_cost: Decimal::new(12050, 2),
        parts_cost: Decimal::new(6430, 2),
        status,
        notes: String::new(),
        created_at: created,
        updated_at: created,
    }
}
