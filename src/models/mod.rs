//! Modelos del sistema
//!
//! Este módulo contiene las entidades del dominio, sus máquinas de
//! estados y los DTOs de request/response de la API.

pub mod driver;
pub mod maintenance;
pub mod trip;
pub mod vehicle;
