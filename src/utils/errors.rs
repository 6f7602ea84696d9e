//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    /// Una regla de negocio estática falló para un campo concreto.
    /// Siempre recuperable corrigiendo la entrada; nunca se reintenta.
    #[error("Validation failed on '{field}': {message}")]
    Validation { field: String, message: String },

    /// La entidad no está en un estado que permita la transición pedida.
    /// Reintentar con la misma entrada fallará igual hasta que el estado
    /// cambie externamente.
    #[error("{entity} is {current}, expected {expected}")]
    Precondition {
        entity: String,
        current: String,
        expected: String,
    },

    /// Una transacción concurrente ganó la carrera por el mismo recurso.
    /// El caller debe releer el estado y puede reintentar una vez.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: Some(json!({ "sql_error": e.to_string() })),
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::InvalidInput(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Validation Error".to_string(),
                    message: "The provided data is invalid".to_string(),
                    details: Some(json!(e)),
                    code: Some("VALIDATION_ERROR".to_string()),
                },
            ),

            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Validation Error".to_string(),
                    message,
                    details: Some(json!({ "field": field })),
                    code: Some("VALIDATION_ERROR".to_string()),
                },
            ),

            AppError::Precondition {
                entity,
                current,
                expected,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Precondition Failed".to_string(),
                    message: format!("{} is {}, expected {}", entity, current, expected),
                    details: Some(json!({
                        "entity": entity,
                        "current": current,
                        "expected": expected,
                    })),
                    code: Some("PRECONDITION_FAILED".to_string()),
                },
            ),

            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: "Conflict".to_string(),
                    message: msg,
                    details: None,
                    code: Some("CONFLICT".to_string()),
                },
            ),

            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: "Not Found".to_string(),
                    message: msg,
                    details: None,
                    code: Some("NOT_FOUND".to_string()),
                },
            ),

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación con campo discriminado
pub fn validation_error(field: &str, message: impl Into<String>) -> AppError {
    AppError::Validation {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Función helper para crear errores de precondición de estado
pub fn precondition_error(entity: impl Into<String>, current: &str, expected: &str) -> AppError {
    AppError::Precondition {
        entity: entity.into(),
        current: current.to_string(),
        expected: expected.to_string(),
    }
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Reclasificar errores de base de datos que indican una carrera perdida:
/// violación de unicidad (23505), fallo de serialización (40001) o deadlock
/// (40P01). El resto se propaga como error de base de datos.
pub fn map_commit_error(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if let Some(code) = db_err.code() {
            match code.as_ref() {
                "23505" => {
                    return AppError::Conflict(format!(
                        "A concurrent write won the race: {}",
                        db_err.message()
                    ))
                }
                "40001" | "40P01" => {
                    return AppError::Conflict(
                        "Concurrent transaction conflict, re-read state and retry".to_string(),
                    )
                }
                _ => {}
            }
        }
    }
    AppError::Database(e)
}
