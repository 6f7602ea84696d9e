//! Validadores de entidades
//!
//! Funciones puras, sin efectos, llamadas antes de cualquier transición
//! mutante. Cada fallo devuelve un error de validación que nombra el
//! campo ofensivo, nunca un fallo genérico.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::utils::errors::{validation_error, AppResult};

/// El peso de carga no puede exceder la capacidad máxima del vehículo
pub fn validate_capacity(cargo_weight_kg: Decimal, max_capacity_kg: Decimal) -> AppResult<()> {
    if cargo_weight_kg > max_capacity_kg {
        return Err(validation_error(
            "cargo_weight_kg",
            format!(
                "Cargo weight ({}kg) exceeds vehicle capacity ({}kg)",
                cargo_weight_kg, max_capacity_kg
            ),
        ));
    }
    Ok(())
}

/// La entrega programada debe ser estrictamente posterior al pickup
pub fn validate_schedule(
    scheduled_pickup: DateTime<Utc>,
    scheduled_delivery: DateTime<Utc>,
) -> AppResult<()> {
    if scheduled_delivery <= scheduled_pickup {
        return Err(validation_error(
            "scheduled_delivery_time",
            "Delivery time must be after pickup time",
        ));
    }
    Ok(())
}

/// El pickup programado no puede estar en el pasado al crear el viaje
pub fn validate_pickup_not_past(
    scheduled_pickup: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AppResult<()> {
    if scheduled_pickup < now {
        return Err(validation_error(
            "scheduled_pickup_time",
            "Pickup time cannot be in the past",
        ));
    }
    Ok(())
}

/// El odómetro final debe ser estrictamente mayor que el inicial
pub fn validate_odometer(start_km: Decimal, end_km: Decimal) -> AppResult<()> {
    if end_km <= start_km {
        return Err(validation_error(
            "end_odometer_km",
            format!(
                "End odometer ({}km) must be greater than start odometer ({}km)",
                end_km, start_km
            ),
        ));
    }
    Ok(())
}

/// Si ambos timestamps reales están presentes, la entrega real debe ser
/// posterior al pickup real
pub fn validate_actual_times(
    actual_pickup: Option<DateTime<Utc>>,
    actual_delivery: Option<DateTime<Utc>>,
) -> AppResult<()> {
    if let (Some(pickup), Some(delivery)) = (actual_pickup, actual_delivery) {
        if delivery <= pickup {
            return Err(validation_error(
                "actual_delivery_time",
                "Actual delivery time must be after actual pickup time",
            ));
        }
    }
    Ok(())
}

/// Validar que un valor numérico sea no negativo
pub fn validate_non_negative<T>(field: &str, value: T) -> AppResult<()>
where
    T: PartialOrd + std::fmt::Display + num_traits::Zero,
{
    if value < T::zero() {
        return Err(validation_error(
            field,
            format!("Value ({}) must not be negative", value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;
    use chrono::TimeZone;
    use rust_decimal::prelude::FromPrimitive;

    fn dec(v: i64) -> Decimal {
        Decimal::from_i64(v).unwrap()
    }

    fn field_of(err: AppError) -> String {
        match err {
            AppError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_capacity() {
        assert!(validate_capacity(dec(24_000), dec(24_000)).is_ok());
        assert!(validate_capacity(dec(100), dec(24_000)).is_ok());

        let err = validate_capacity(dec(25_000), dec(24_000)).unwrap_err();
        assert_eq!(field_of(err), "cargo_weight_kg");
    }

    #[test]
    fn test_validate_schedule() {
        let pickup = Utc.with_ymd_and_hms(2025, 6, 15, 8, 0, 0).unwrap();
        let delivery = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        assert!(validate_schedule(pickup, delivery).is_ok());

        let err = validate_schedule(delivery, pickup).unwrap_err();
        assert_eq!(field_of(err), "scheduled_delivery_time");

        // La igualdad también es inválida
        assert!(validate_schedule(pickup, pickup).is_err());
    }

    #[test]
    fn test_validate_pickup_not_past() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 8, 0, 0).unwrap();
        let future = Utc.with_ymd_and_hms(2025, 6, 15, 9, 0, 0).unwrap();
        let past = Utc.with_ymd_and_hms(2025, 6, 15, 7, 0, 0).unwrap();

        assert!(validate_pickup_not_past(future, now).is_ok());
        assert!(validate_pickup_not_past(now, now).is_ok());

        let err = validate_pickup_not_past(past, now).unwrap_err();
        assert_eq!(field_of(err), "scheduled_pickup_time");
    }

    #[test]
    fn test_validate_odometer() {
        assert!(validate_odometer(dec(150), dec(200)).is_ok());

        let err = validate_odometer(dec(150), dec(100)).unwrap_err();
        assert_eq!(field_of(err), "end_odometer_km");
        assert!(validate_odometer(dec(150), dec(150)).is_err());
    }

    #[test]
    fn test_validate_actual_times() {
        let pickup = Utc.with_ymd_and_hms(2025, 6, 15, 8, 0, 0).unwrap();
        let delivery = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();

        assert!(validate_actual_times(Some(pickup), Some(delivery)).is_ok());
        assert!(validate_actual_times(Some(pickup), None).is_ok());
        assert!(validate_actual_times(None, None).is_ok());

        let err = validate_actual_times(Some(delivery), Some(pickup)).unwrap_err();
        assert_eq!(field_of(err), "actual_delivery_time");
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("cargo_weight_kg", dec(0)).is_ok());
        assert!(validate_non_negative("cargo_weight_kg", dec(10)).is_ok());

        let err = validate_non_negative("cargo_weight_kg", dec(-1)).unwrap_err();
        assert_eq!(field_of(err), "cargo_weight_kg");
    }
}
