//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! generación de identificadores y la fuente de tiempo inyectable.

pub mod clock;
pub mod errors;
pub mod ids;
pub mod validation;
