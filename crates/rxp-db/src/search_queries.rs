//! Database operations for the `search_queries` audit log.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `search_queries` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SearchQueryRow {
    pub id: i64,
    pub rx_cui: String,
    pub strength: String,
    pub quantity: i64,
    pub zip: String,
    pub created_at: DateTime<Utc>,
}

/// Append one search to the audit log and return the new row's id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn record_search_query(
    pool: &PgPool,
    rx_cui: &str,
    strength: &str,
    quantity: u32,
    zip: &str,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO search_queries (rx_cui, strength, quantity, zip) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id",
    )
    .bind(rx_cui)
    .bind(strength)
    .bind(i64::from(quantity))
    .bind(zip)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Returns the most recent searches, newest first.
///
/// # Errors
///
/// Returns [`DbError::OutOfRange`] for a non-positive `limit`, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_search_queries(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<SearchQueryRow>, DbError> {
    if limit <= 0 {
        return Err(DbError::OutOfRange {
            column: "limit",
            value: limit,
        });
    }

    let rows = sqlx::query_as::<_, SearchQueryRow>(
        "SELECT id, rx_cui, strength, quantity, zip, created_at \
         FROM search_queries \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
