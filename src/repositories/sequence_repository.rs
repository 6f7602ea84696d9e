//! Emisión serializada de identificadores legibles
//!
//! El contador por prefijo vive en la tabla `id_sequences` y se
//! incrementa dentro de la misma transacción que inserta la entidad.
//! El UPDATE toma el lock de fila, así dos creates concurrentes se
//! serializan y nunca reciben el mismo número.

use sqlx::PgConnection;

use crate::utils::errors::{map_commit_error, AppResult};
use crate::utils::ids::{format_id, next_id, parse_sequence_number};

/// Emitir el siguiente identificador para un prefijo, dentro de la
/// transacción dada. `table`/`id_column` identifican la entidad para
/// sembrar el contador desde filas legadas la primera vez.
pub async fn next_entity_id(
    conn: &mut PgConnection,
    prefix: &str,
    table: &str,
    id_column: &str,
) -> AppResult<String> {
    let updated: Option<(i64,)> = sqlx::query_as(
        "UPDATE id_sequences SET last_number = last_number + 1 WHERE prefix = $1 RETURNING last_number",
    )
    .bind(prefix)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some((number,)) = updated {
        return Ok(format_id(prefix, number));
    }

    // Primera emisión para este prefijo: sembrar desde el identificador
    // más reciente ya existente (numeración legada), o reiniciar en 1 si
    // no hay ninguno o no parsea como PREFIX-NNNNNN.
    let seed_query = format!(
        "SELECT {col} FROM {table} ORDER BY {col} DESC LIMIT 1",
        col = id_column,
        table = table,
    );
    let last: Option<(String,)> = sqlx::query_as(&seed_query)
        .fetch_optional(&mut *conn)
        .await?;

    let id = next_id(prefix, last.as_ref().map(|(s,)| s.as_str()));
    let number = parse_sequence_number(prefix, &id).unwrap_or(1);

    // Si dos transacciones siembran a la vez, la segunda pierde por la
    // clave primaria y el caller reintenta tras releer.
    sqlx::query("INSERT INTO id_sequences (prefix, last_number) VALUES ($1, $2)")
        .bind(prefix)
        .bind(number)
        .execute(&mut *conn)
        .await
        .map_err(map_commit_error)?;

    Ok(id)
}
