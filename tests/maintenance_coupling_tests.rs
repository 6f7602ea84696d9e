//! Suite de integración del acoplamiento mantenimiento-vehículo

mod common;

use chrono::NaiveDate;

use common::{fixed_now, sample_record, sample_vehicle};
use fleetflow::models::maintenance::MaintenanceStatus;
use fleetflow::models::vehicle::VehicleStatus;
use fleetflow::services::transitions;
use fleetflow::utils::clock::{Clock, FixedClock};
use fleetflow::utils::errors::AppError;

fn assert_precondition(err: AppError, expected_current: &str) {
    match err {
        AppError::Precondition { current, .. } => assert_eq!(current, expected_current),
        other => panic!("expected precondition error, got {:?}", other),
    }
}

#[test]
fn start_requires_scheduled_record() {
    let vehicle = sample_vehicle(VehicleStatus::Available);

    let record = sample_record(MaintenanceStatus::Scheduled, &vehicle);
    assert!(transitions::check_maintenance_start(&record, &vehicle).is_ok());

    for status in [
        MaintenanceStatus::InProgress,
        MaintenanceStatus::Completed,
        MaintenanceStatus::Cancelled,
    ] {
        let record = sample_record(status, &vehicle);
        let err = transitions::check_maintenance_start(&record, &vehicle).unwrap_err();
        assert_precondition(err, status.as_str());
    }
}

#[test]
fn start_blocked_while_vehicle_on_trip_or_retired() {
    for status in [VehicleStatus::OnTrip, VehicleStatus::Retired] {
        let vehicle = sample_vehicle(status);
        let record = sample_record(MaintenanceStatus::Scheduled, &vehicle);
        let err = transitions::check_maintenance_start(&record, &vehicle).unwrap_err();
        assert_precondition(err, status.as_str());
    }
}

#[test]
fn start_allowed_when_vehicle_already_in_shop() {
    // Varios registros pueden estar InProgress sobre el mismo vehículo
    let vehicle = sample_vehicle(VehicleStatus::InShop);
    let record = sample_record(MaintenanceStatus::Scheduled, &vehicle);
    assert!(transitions::check_maintenance_start(&record, &vehicle).is_ok());
}

#[test]
fn completion_date_cannot_precede_scheduled_date() {
    let vehicle = sample_vehicle(VehicleStatus::InShop);
    let record = sample_record(MaintenanceStatus::InProgress, &vehicle);

    // Programado para el 10; completarlo el 9 es inválido
    let early = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
    let err = transitions::plan_maintenance_completion(&record, early).unwrap_err();
    match err {
        AppError::Validation { field, .. } => assert_eq!(field, "completed_date"),
        other => panic!("expected validation error, got {:?}", other),
    }

    // El mismo día programado es válido
    let on_schedule = record.scheduled_date;
    assert_eq!(
        transitions::plan_maintenance_completion(&record, on_schedule).unwrap(),
        on_schedule
    );

    let clock = FixedClock(fixed_now());
    assert_eq!(
        transitions::plan_maintenance_completion(&record, clock.today()).unwrap(),
        clock.today()
    );
}

#[test]
fn completion_allowed_directly_from_scheduled() {
    let vehicle = sample_vehicle(VehicleStatus::Available);
    let record = sample_record(MaintenanceStatus::Scheduled, &vehicle);
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    assert_eq!(
        transitions::plan_maintenance_completion(&record, today).unwrap(),
        today
    );
}

#[test]
fn completion_of_terminal_record_fails_precondition() {
    let vehicle = sample_vehicle(VehicleStatus::Available);
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    for status in [MaintenanceStatus::Completed, MaintenanceStatus::Cancelled] {
        let record = sample_record(status, &vehicle);
        let err = transitions::plan_maintenance_completion(&record, today).unwrap_err();
        assert_precondition(err, status.as_str());
    }
}

#[test]
fn cancellation_reports_whether_vehicle_may_need_release() {
    let vehicle = sample_vehicle(VehicleStatus::InShop);

    let in_progress = sample_record(MaintenanceStatus::InProgress, &vehicle);
    assert!(transitions::plan_maintenance_cancellation(&in_progress).unwrap());

    let scheduled = sample_record(MaintenanceStatus::Scheduled, &vehicle);
    assert!(!transitions::plan_maintenance_cancellation(&scheduled).unwrap());

    for status in [MaintenanceStatus::Completed, MaintenanceStatus::Cancelled] {
        let record = sample_record(status, &vehicle);
        let err = transitions::plan_maintenance_cancellation(&record).unwrap_err();
        assert_precondition(err, status.as_str());
    }
}

#[test]
fn maintenance_status_transition_table() {
    use MaintenanceStatus::*;

    assert!(Scheduled.can_transition_to(InProgress));
    assert!(Scheduled.can_transition_to(Completed));
    assert!(InProgress.can_transition_to(Completed));
    assert!(Scheduled.can_transition_to(Cancelled));
    assert!(InProgress.can_transition_to(Cancelled));

    assert!(!Completed.can_transition_to(InProgress));
    assert!(!Cancelled.can_transition_to(Scheduled));
    assert!(!InProgress.can_transition_to(Scheduled));
}
