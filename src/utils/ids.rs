//! Generación de identificadores legibles
//!
//! Identificadores secuenciales tipo `TRP-000123`: prefijo fijo más
//! sufijo numérico de 6 dígitos con ceros a la izquierda. Las funciones
//! de este módulo son puras; la serialización frente a creates
//! concurrentes vive en `repositories::sequence_repository`.

/// Prefijo de identificadores de vehículos
pub const VEHICLE_PREFIX: &str = "VEH";
/// Prefijo de identificadores de conductores
pub const DRIVER_PREFIX: &str = "DRV";
/// Prefijo de identificadores de viajes
pub const TRIP_PREFIX: &str = "TRP";
/// Prefijo de identificadores de registros de mantenimiento
pub const MAINTENANCE_PREFIX: &str = "MNT";

/// Formatear un número de secuencia como identificador legible
pub fn format_id(prefix: &str, number: i64) -> String {
    format!("{}-{:06}", prefix, number)
}

/// Extraer el sufijo numérico de un identificador `PREFIX-NNNNNN`.
/// Devuelve `None` si el identificador no tiene el formato esperado.
pub fn parse_sequence_number(prefix: &str, id: &str) -> Option<i64> {
    let suffix = id.strip_prefix(prefix)?.strip_prefix('-')?;
    if suffix.is_empty() {
        return None;
    }
    suffix.parse().ok()
}

/// Calcular el siguiente identificador a partir del último emitido.
/// Si no hay último o no parsea como `PREFIX-NNNNNN`, la numeración
/// reinicia en 1.
pub fn next_id(prefix: &str, last: Option<&str>) -> String {
    let next = last
        .and_then(|id| parse_sequence_number(prefix, id))
        .map_or(1, |n| n + 1);
    format_id(prefix, next)
}
