//! Postgres-backed implementations of the search engine's ports.

use async_trait::async_trait;
use rxp_pricing::{
    DrugCatalog, DrugInfo, LookupError, SearchAudit, SearchAuditEntry, ZipLookup, ZipPoint,
};
use sqlx::PgPool;

use crate::drugs::{get_drug_by_rx_cui, search_drugs_by_prefix, DrugRow};
use crate::search_queries::record_search_query;
use crate::zips::{get_zip, ZipRow};

impl From<DrugRow> for DrugInfo {
    fn from(row: DrugRow) -> Self {
        Self {
            rx_cui: row.rx_cui,
            name: row.name,
            forms: row.forms,
            strengths: row.strengths,
        }
    }
}

impl From<ZipRow> for ZipPoint {
    fn from(row: ZipRow) -> Self {
        Self {
            zip: row.zip,
            latitude: row.latitude,
            longitude: row.longitude,
            city: row.city,
            state: row.state,
        }
    }
}

/// Drug catalog, ZIP table and audit log over one pool.
#[derive(Debug, Clone)]
pub struct PgCollaborators {
    pool: PgPool,
}

impl PgCollaborators {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DrugCatalog for PgCollaborators {
    async fn find(&self, rx_cui: &str) -> Result<Option<DrugInfo>, LookupError> {
        get_drug_by_rx_cui(&self.pool, rx_cui)
            .await
            .map(|row| row.map(DrugInfo::from))
            .map_err(|e| LookupError::backend("drug", e))
    }

    async fn suggest(&self, prefix: &str, limit: usize) -> Result<Vec<DrugInfo>, LookupError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        search_drugs_by_prefix(&self.pool, prefix, limit)
            .await
            .map(|rows| rows.into_iter().map(DrugInfo::from).collect())
            .map_err(|e| LookupError::backend("drug", e))
    }
}

#[async_trait]
impl ZipLookup for PgCollaborators {
    async fn locate(&self, zip: &str) -> Result<Option<ZipPoint>, LookupError> {
        get_zip(&self.pool, zip)
            .await
            .map(|row| row.map(ZipPoint::from))
            .map_err(|e| LookupError::backend("zip", e))
    }
}

#[async_trait]
impl SearchAudit for PgCollaborators {
    async fn record(&self, entry: &SearchAuditEntry) -> Result<(), LookupError> {
        record_search_query(
            &self.pool,
            &entry.rx_cui,
            &entry.strength,
            entry.quantity,
            &entry.zip,
        )
        .await
        .map(|_| ())
        .map_err(|e| LookupError::backend("search audit", e))
    }
}
