//! Suite de integración del ciclo de despacho
//!
//! Ejercita el planificador de transiciones con un reloj fijo y
//! snapshots construidos a mano, simulando entre pasos las escrituras
//! que el servicio transaccional aplicaría.

mod common;

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use common::{dec, fixed_now, sample_driver, sample_request, sample_trip, sample_vehicle};
use fleetflow::models::driver::DriverStatus;
use fleetflow::models::trip::TripStatus;
use fleetflow::models::vehicle::VehicleStatus;
use fleetflow::services::transitions;
use fleetflow::utils::clock::{Clock, FixedClock};
use fleetflow::utils::errors::AppError;

fn assert_validation_field(err: AppError, expected_field: &str) {
    match err {
        AppError::Validation { field, .. } => assert_eq!(field, expected_field),
        other => panic!("expected validation error, got {:?}", other),
    }
}

fn assert_precondition(err: AppError, expected_current: &str) {
    match err {
        AppError::Precondition { current, .. } => assert_eq!(current, expected_current),
        other => panic!("expected precondition error, got {:?}", other),
    }
}

#[test]
fn fixed_clock_drives_now_and_today() {
    let clock = FixedClock(fixed_now());
    assert_eq!(clock.now(), fixed_now());
    assert_eq!(clock.today(), fixed_now().date_naive());
}

#[test]
fn create_accepts_available_vehicle_and_off_duty_driver() {
    let vehicle = sample_vehicle(VehicleStatus::Available);
    let driver = sample_driver(DriverStatus::OffDuty);
    let request = sample_request(&vehicle, &driver);

    assert!(transitions::check_create(&vehicle, &driver, &request, fixed_now()).is_ok());
}

#[test]
fn create_rejects_cargo_over_capacity_naming_the_field() {
    let vehicle = sample_vehicle(VehicleStatus::Available);
    let driver = sample_driver(DriverStatus::OnDuty);
    let mut request = sample_request(&vehicle, &driver);
    request.cargo_weight_kg = dec(25_000);

    let err = transitions::check_create(&vehicle, &driver, &request, fixed_now()).unwrap_err();
    assert_validation_field(err, "cargo_weight_kg");
}

#[test]
fn create_rejects_inverted_schedule_and_past_pickup() {
    let vehicle = sample_vehicle(VehicleStatus::Available);
    let driver = sample_driver(DriverStatus::OnDuty);

    let mut inverted = sample_request(&vehicle, &driver);
    inverted.scheduled_delivery_time = inverted.scheduled_pickup_time - Duration::hours(1);
    let err = transitions::check_create(&vehicle, &driver, &inverted, fixed_now()).unwrap_err();
    assert_validation_field(err, "scheduled_delivery_time");

    let mut past = sample_request(&vehicle, &driver);
    past.scheduled_pickup_time = fixed_now() - Duration::hours(2);
    let err = transitions::check_create(&vehicle, &driver, &past, fixed_now()).unwrap_err();
    assert_validation_field(err, "scheduled_pickup_time");
}

#[test]
fn create_rejects_unavailable_vehicle_or_driver() {
    let driver = sample_driver(DriverStatus::OnDuty);

    for status in [
        VehicleStatus::OnTrip,
        VehicleStatus::InShop,
        VehicleStatus::Retired,
    ] {
        let vehicle = sample_vehicle(status);
        let request = sample_request(&vehicle, &driver);
        let err = transitions::check_create(&vehicle, &driver, &request, fixed_now()).unwrap_err();
        assert_validation_field(err, "vehicle");
    }

    let vehicle = sample_vehicle(VehicleStatus::Available);
    for status in [DriverStatus::OnTrip, DriverStatus::Suspended] {
        let driver = sample_driver(status);
        let request = sample_request(&vehicle, &driver);
        let err = transitions::check_create(&vehicle, &driver, &request, fixed_now()).unwrap_err();
        assert_validation_field(err, "driver");
    }
}

#[test]
fn create_rejects_expired_license() {
    let vehicle = sample_vehicle(VehicleStatus::Available);
    let mut driver = sample_driver(DriverStatus::OnDuty);
    driver.license_expiry_date = fixed_now().date_naive() - Duration::days(1);

    let request = sample_request(&vehicle, &driver);
    let err = transitions::check_create(&vehicle, &driver, &request, fixed_now()).unwrap_err();
    assert_validation_field(err, "driver");
}

#[test]
fn dispatch_plans_on_trip_for_all_three_entities() {
    let vehicle = sample_vehicle(VehicleStatus::Available);
    let driver = sample_driver(DriverStatus::OffDuty);
    let trip = sample_trip(TripStatus::Draft, &vehicle, &driver);

    let plan =
        transitions::plan_dispatch(&trip, &vehicle, &driver, dec(50_000), fixed_now()).unwrap();
    assert_eq!(plan.start_odometer_km, dec(50_000));
    assert_eq!(plan.actual_pickup_time, fixed_now());
}

#[test]
fn second_dispatch_fails_precondition() {
    let vehicle = sample_vehicle(VehicleStatus::OnTrip);
    let driver = sample_driver(DriverStatus::OnTrip);
    let trip = sample_trip(TripStatus::Dispatched, &vehicle, &driver);

    let err = transitions::plan_dispatch(&trip, &vehicle, &driver, dec(50_000), fixed_now())
        .unwrap_err();
    assert_precondition(err, "DISPATCHED");
}

#[test]
fn dispatch_blocked_by_vehicle_in_shop_or_suspended_driver() {
    let driver = sample_driver(DriverStatus::OffDuty);
    let vehicle = sample_vehicle(VehicleStatus::InShop);
    let trip = sample_trip(TripStatus::Draft, &vehicle, &driver);
    let err = transitions::plan_dispatch(&trip, &vehicle, &driver, dec(50_000), fixed_now())
        .unwrap_err();
    assert_precondition(err, "IN_SHOP");

    let vehicle = sample_vehicle(VehicleStatus::Available);
    let suspended = sample_driver(DriverStatus::Suspended);
    let trip = sample_trip(TripStatus::Draft, &vehicle, &suspended);
    let err = transitions::plan_dispatch(&trip, &vehicle, &suspended, dec(50_000), fixed_now())
        .unwrap_err();
    assert_precondition(err, "SUSPENDED");
}

#[test]
fn start_transit_only_from_dispatched() {
    let vehicle = sample_vehicle(VehicleStatus::OnTrip);
    let driver = sample_driver(DriverStatus::OnTrip);

    let trip = sample_trip(TripStatus::Dispatched, &vehicle, &driver);
    assert!(transitions::plan_start_transit(&trip).is_ok());

    for status in [TripStatus::Draft, TripStatus::InProgress, TripStatus::Completed] {
        let trip = sample_trip(status, &vehicle, &driver);
        assert!(transitions::plan_start_transit(&trip).is_err());
    }
}

#[test]
fn completion_derives_distance_from_odometers() {
    let vehicle = sample_vehicle(VehicleStatus::OnTrip);
    let driver = sample_driver(DriverStatus::OnTrip);
    let trip = sample_trip(TripStatus::InProgress, &vehicle, &driver);

    let plan =
        transitions::plan_completion(&trip, dec(50_470), None, None, fixed_now()).unwrap();
    assert_eq!(plan.actual_distance_km, dec(470));
    assert_eq!(plan.end_odometer_km, dec(50_470));
    assert_eq!(plan.actual_delivery_time, fixed_now());
}

#[test]
fn completion_prefers_supplied_distance() {
    let vehicle = sample_vehicle(VehicleStatus::OnTrip);
    let driver = sample_driver(DriverStatus::OnTrip);
    let trip = sample_trip(TripStatus::Dispatched, &vehicle, &driver);

    let plan = transitions::plan_completion(
        &trip,
        dec(50_470),
        Some(Decimal::new(4725, 1)),
        Some("RAS".to_string()),
        fixed_now(),
    )
    .unwrap();
    assert_eq!(plan.actual_distance_km, Decimal::new(4725, 1));
    assert_eq!(plan.notes.as_deref(), Some("RAS"));
}

#[test]
fn completion_rejects_inverted_odometer() {
    let vehicle = sample_vehicle(VehicleStatus::OnTrip);
    let driver = sample_driver(DriverStatus::OnTrip);
    let mut trip = sample_trip(TripStatus::InProgress, &vehicle, &driver);
    trip.start_odometer_km = Some(dec(150));

    let err = transitions::plan_completion(&trip, dec(100), None, None, fixed_now()).unwrap_err();
    assert_validation_field(err, "end_odometer_km");

    // La igualdad tampoco es aceptable
    let err = transitions::plan_completion(&trip, dec(150), None, None, fixed_now()).unwrap_err();
    assert_validation_field(err, "end_odometer_km");
}

#[test]
fn completion_retry_on_completed_trip_fails_precondition() {
    let vehicle = sample_vehicle(VehicleStatus::Available);
    let driver = sample_driver(DriverStatus::OffDuty);
    let mut trip = sample_trip(TripStatus::Completed, &vehicle, &driver);
    trip.end_odometer_km = Some(dec(50_470));

    let err =
        transitions::plan_completion(&trip, dec(50_470), None, None, fixed_now()).unwrap_err();
    assert_precondition(err, "COMPLETED");
}

#[test]
fn completion_requires_delivery_after_actual_pickup() {
    let vehicle = sample_vehicle(VehicleStatus::OnTrip);
    let driver = sample_driver(DriverStatus::OnTrip);
    let trip = sample_trip(TripStatus::Dispatched, &vehicle, &driver);

    // pickup real en la fixture: 06:30; completar a las 06:00 es inválido
    let too_early = Utc.with_ymd_and_hms(2025, 6, 15, 6, 0, 0).unwrap();
    let err = transitions::plan_completion(&trip, dec(50_470), None, None, too_early).unwrap_err();
    assert_validation_field(err, "actual_delivery_time");
}

#[test]
fn cancellation_releases_only_active_trips() {
    let vehicle = sample_vehicle(VehicleStatus::Available);
    let driver = sample_driver(DriverStatus::OffDuty);

    let draft = sample_trip(TripStatus::Draft, &vehicle, &driver);
    let plan = transitions::plan_cancellation(&draft, "Client cancelled").unwrap();
    assert!(!plan.release_assignment);

    let dispatched = sample_trip(TripStatus::Dispatched, &vehicle, &driver);
    let plan = transitions::plan_cancellation(&dispatched, "Breakdown").unwrap();
    assert!(plan.release_assignment);

    let in_progress = sample_trip(TripStatus::InProgress, &vehicle, &driver);
    let plan = transitions::plan_cancellation(&in_progress, "Breakdown").unwrap();
    assert!(plan.release_assignment);
}

#[test]
fn cancellation_requires_reason_and_non_terminal_status() {
    let vehicle = sample_vehicle(VehicleStatus::Available);
    let driver = sample_driver(DriverStatus::OffDuty);

    let draft = sample_trip(TripStatus::Draft, &vehicle, &driver);
    let err = transitions::plan_cancellation(&draft, "   ").unwrap_err();
    assert_validation_field(err, "cancellation_reason");

    let cancelled = sample_trip(TripStatus::Cancelled, &vehicle, &driver);
    let err = transitions::plan_cancellation(&cancelled, "again").unwrap_err();
    assert_precondition(err, "CANCELLED");

    let completed = sample_trip(TripStatus::Completed, &vehicle, &driver);
    let err = transitions::plan_cancellation(&completed, "too late").unwrap_err();
    assert_precondition(err, "COMPLETED");
}

/// Ciclo completo sobre el mismo vehículo: despacho, finalización y un
/// segundo despacho con las entidades ya liberadas. Las escrituras del
/// servicio transaccional se simulan mutando los snapshots.
#[test]
fn dispatch_complete_redispatch_round_trip() {
    let mut vehicle = sample_vehicle(VehicleStatus::Available);
    let mut driver = sample_driver(DriverStatus::OffDuty);
    let mut trip = sample_trip(TripStatus::Draft, &vehicle, &driver);
    trip.actual_pickup_time = None;
    trip.start_odometer_km = None;

    let plan =
        transitions::plan_dispatch(&trip, &vehicle, &driver, dec(50_000), fixed_now()).unwrap();
    trip.status = TripStatus::Dispatched;
    trip.start_odometer_km = Some(plan.start_odometer_km);
    trip.actual_pickup_time = Some(plan.actual_pickup_time);
    vehicle.status = VehicleStatus::OnTrip;
    driver.status = DriverStatus::OnTrip;

    let later = fixed_now() + Duration::hours(9);
    let plan = transitions::plan_completion(&trip, dec(50_470), None, None, later).unwrap();
    trip.status = TripStatus::Completed;
    trip.end_odometer_km = Some(plan.end_odometer_km);
    vehicle.status = VehicleStatus::Available;
    vehicle.current_odometer_km = plan.end_odometer_km;
    driver.status = DriverStatus::OffDuty;
    driver.total_trips_completed += 1;
    driver.total_distance_km += plan.actual_distance_km;

    assert_eq!(driver.total_trips_completed, 13);
    assert_eq!(driver.total_distance_km, dec(8_870));

    // El mismo vehículo y conductor aceptan un segundo viaje
    let mut second = sample_trip(TripStatus::Draft, &vehicle, &driver);
    second.actual_pickup_time = None;
    second.start_odometer_km = None;
    let plan = transitions::plan_dispatch(&second, &vehicle, &driver, dec(50_470), later).unwrap();
    assert_eq!(plan.start_odometer_km, dec(50_470));
}
