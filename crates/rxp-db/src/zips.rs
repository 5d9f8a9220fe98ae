//! Database operations for the `zip_codes` table.

use sqlx::PgPool;

use crate::DbError;

/// A row from the `zip_codes` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ZipRow {
    pub zip: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Returns the coordinates for a five-digit ZIP, or `None` if unknown.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_zip(pool: &PgPool, zip: &str) -> Result<Option<ZipRow>, DbError> {
    let row = sqlx::query_as::<_, ZipRow>(
        "SELECT zip, latitude, longitude, city, state \
         FROM zip_codes \
         WHERE zip = $1",
    )
    .bind(zip)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
