//! Lógica de negocio del ciclo de despacho
//!
//! Dos capas: `transitions` contiene la planificación pura (sin IO) de
//! cada transición, y los servicios transaccionales ejecutan esos
//! planes sobre filas bloqueadas.

pub mod maintenance_service;
pub mod transitions;
pub mod trip_lifecycle_service;
