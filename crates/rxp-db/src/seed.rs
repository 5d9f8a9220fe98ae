use rxp_core::{CatalogFile, DrugConfig, ZipConfig};
use sqlx::{PgConnection, PgPool};

use crate::DbError;

/// Counts of catalog rows processed by [`seed_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub drugs: usize,
    pub zips: usize,
}

/// Upsert the drug catalog and ZIP table from config.
///
/// All upserts run inside a single transaction; if any operation fails
/// the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_catalog(pool: &PgPool, catalog: &CatalogFile) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for drug in &catalog.drugs {
        upsert_drug(&mut *tx, drug).await?;
        summary.drugs += 1;
    }

    for zip in &catalog.zips {
        upsert_zip(&mut *tx, zip).await?;
        summary.zips += 1;
    }

    tx.commit().await?;
    Ok(summary)
}

async fn upsert_drug(conn: &mut PgConnection, drug: &DrugConfig) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO drugs (rx_cui, name, forms, strengths) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (rx_cui) DO UPDATE SET \
             name = EXCLUDED.name, \
             forms = EXCLUDED.forms, \
             strengths = EXCLUDED.strengths, \
             updated_at = NOW()",
    )
    .bind(&drug.rx_cui)
    .bind(&drug.name)
    .bind(&drug.forms)
    .bind(&drug.strengths)
    .execute(conn)
    .await?;
    Ok(())
}

async fn upsert_zip(conn: &mut PgConnection, zip: &ZipConfig) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO zip_codes (zip, latitude, longitude, city, state) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (zip) DO UPDATE SET \
             latitude = EXCLUDED.latitude, \
             longitude = EXCLUDED.longitude, \
             city = EXCLUDED.city, \
             state = EXCLUDED.state",
    )
    .bind(&zip.zip)
    .bind(zip.latitude)
    .bind(zip.longitude)
    .bind(&zip.city)
    .bind(&zip.state)
    .execute(conn)
    .await?;
    Ok(())
}
