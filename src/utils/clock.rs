//! Fuente de tiempo inyectable
//!
//! Todas las comparaciones de tiempo del dominio (expiración de licencias,
//! detección de retrasos, timestamps reales de pickup/delivery) pasan por
//! este trait, así los tests pueden fijar el reloj.

use chrono::{DateTime, NaiveDate, Utc};

/// Fuente de "ahora" para servicios y validadores
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Reloj del sistema, usado en producción
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Reloj fijo para tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
