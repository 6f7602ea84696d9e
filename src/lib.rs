//! FleetFlow - backend de logística de flota
//!
//! El núcleo del sistema es el ciclo de despacho de viajes: una máquina
//! de estados que mantiene Trip, Vehicle y Driver mutuamente
//! consistentes en cada transición, ejecutada siempre dentro de una
//! transacción con las filas bloqueadas.

pub mod api;
pub mod config;
pub mod database;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod utils;
