//! Database self-check used by the `/dbcheck` endpoint.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// Server time plus whether the catalog table has been migrated.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SchemaCheck {
    pub now: DateTime<Utc>,
    pub drug_table_exists: bool,
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn check_schema(pool: &PgPool) -> Result<SchemaCheck, DbError> {
    let row = sqlx::query_as::<_, SchemaCheck>(
        "SELECT NOW() AS now, \
                EXISTS ( \
                    SELECT 1 FROM information_schema.tables \
                    WHERE table_schema = current_schema() AND table_name = 'drugs' \
                ) AS drug_table_exists",
    )
    .fetch_one(pool)
    .await?;

    Ok(row)
}
