//! Capa de acceso a datos
//!
//! Repositorios sqlx por entidad. Las operaciones que forman parte de
//! una transacción de ciclo de vida reciben `&mut PgConnection` y
//! bloquean filas con SELECT ... FOR UPDATE; las lecturas sueltas van
//! contra el pool.

pub mod driver_repository;
pub mod maintenance_repository;
pub mod sequence_repository;
pub mod trip_repository;
pub mod vehicle_repository;
