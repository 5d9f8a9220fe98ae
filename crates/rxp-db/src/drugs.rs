//! Database operations for the `drugs` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `drugs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DrugRow {
    pub id: i64,
    pub rx_cui: String,
    pub name: String,
    pub forms: Vec<String>,
    pub strengths: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns drugs whose name starts with `prefix` (case-insensitive), ordered
/// by name and capped at `limit`.
///
/// `%`, `_` and `\` in `prefix` match literally.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn search_drugs_by_prefix(
    pool: &PgPool,
    prefix: &str,
    limit: i64,
) -> Result<Vec<DrugRow>, DbError> {
    let pattern = format!("{}%", escape_like(&prefix.to_lowercase()));

    let rows = sqlx::query_as::<_, DrugRow>(
        "SELECT id, rx_cui, name, forms, strengths, created_at, updated_at \
         FROM drugs \
         WHERE lower(name) LIKE $1 ESCAPE '\\' \
         ORDER BY name \
         LIMIT $2",
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single drug by its `rx_cui`, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_drug_by_rx_cui(pool: &PgPool, rx_cui: &str) -> Result<Option<DrugRow>, DbError> {
    let row = sqlx::query_as::<_, DrugRow>(
        "SELECT id, rx_cui, name, forms, strengths, created_at, updated_at \
         FROM drugs \
         WHERE rx_cui = $1",
    )
    .bind(rx_cui)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Escape `LIKE` metacharacters so user input matches literally.
#[must_use]
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
