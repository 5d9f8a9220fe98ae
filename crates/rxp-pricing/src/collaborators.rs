//! Ports the search engine reads from and writes to, plus in-memory
//! implementations backed by the YAML catalog.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rxp_core::{CatalogFile, DrugConfig, GeoPoint, SearchRequest, ZipConfig};
use serde::Serialize;

use crate::error::LookupError;

/// A catalog entry as the search engine and autocomplete see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrugInfo {
    pub rx_cui: String,
    pub name: String,
    pub forms: Vec<String>,
    pub strengths: Vec<String>,
}

impl DrugInfo {
    /// First listed form, or `"tablet"` when the catalog lists none.
    #[must_use]
    pub fn primary_form(&self) -> &str {
        self.forms.first().map_or("tablet", String::as_str)
    }
}

impl From<DrugConfig> for DrugInfo {
    fn from(d: DrugConfig) -> Self {
        Self {
            rx_cui: d.rx_cui,
            name: d.name,
            forms: d.forms,
            strengths: d.strengths,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZipPoint {
    pub zip: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl ZipPoint {
    #[must_use]
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl From<ZipConfig> for ZipPoint {
    fn from(z: ZipConfig) -> Self {
        Self {
            zip: z.zip,
            latitude: z.latitude,
            longitude: z.longitude,
            city: z.city,
            state: z.state,
        }
    }
}

/// One validated search, as written to the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchAuditEntry {
    pub rx_cui: String,
    pub strength: String,
    pub quantity: u32,
    pub zip: String,
    pub recorded_at: DateTime<Utc>,
}

impl SearchAuditEntry {
    #[must_use]
    pub fn from_request(request: &SearchRequest) -> Self {
        Self {
            rx_cui: request.rx_cui().to_string(),
            strength: request.strength().to_string(),
            quantity: request.quantity(),
            zip: request.zip().to_string(),
            recorded_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait DrugCatalog: Send + Sync {
    async fn find(&self, rx_cui: &str) -> Result<Option<DrugInfo>, LookupError>;

    /// Case-insensitive name-prefix match, alphabetical, at most `limit`.
    async fn suggest(&self, prefix: &str, limit: usize) -> Result<Vec<DrugInfo>, LookupError>;
}

#[async_trait]
pub trait ZipLookup: Send + Sync {
    async fn locate(&self, zip: &str) -> Result<Option<ZipPoint>, LookupError>;
}

#[async_trait]
pub trait SearchAudit: Send + Sync {
    async fn record(&self, entry: &SearchAuditEntry) -> Result<(), LookupError>;
}

// ---------------------------------------------------------------------------
// In-memory implementations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    /// Sorted by name.
    drugs: Vec<DrugInfo>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new(drugs: impl IntoIterator<Item = DrugInfo>) -> Self {
        let mut drugs: Vec<DrugInfo> = drugs.into_iter().collect();
        drugs.sort_by(|a, b| a.name.cmp(&b.name));
        Self { drugs }
    }

    #[must_use]
    pub fn from_catalog(catalog: &CatalogFile) -> Self {
        Self::new(catalog.drugs.iter().cloned().map(DrugInfo::from))
    }
}

#[async_trait]
impl DrugCatalog for MemoryCatalog {
    async fn find(&self, rx_cui: &str) -> Result<Option<DrugInfo>, LookupError> {
        Ok(self.drugs.iter().find(|d| d.rx_cui == rx_cui).cloned())
    }

    async fn suggest(&self, prefix: &str, limit: usize) -> Result<Vec<DrugInfo>, LookupError> {
        let prefix = prefix.to_lowercase();
        Ok(self
            .drugs
            .iter()
            .filter(|d| d.name.to_lowercase().starts_with(&prefix))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryZips {
    zips: HashMap<String, ZipPoint>,
}

impl MemoryZips {
    #[must_use]
    pub fn new(zips: impl IntoIterator<Item = ZipPoint>) -> Self {
        Self {
            zips: zips.into_iter().map(|z| (z.zip.clone(), z)).collect(),
        }
    }

    #[must_use]
    pub fn from_catalog(catalog: &CatalogFile) -> Self {
        Self::new(catalog.zips.iter().cloned().map(ZipPoint::from))
    }
}

#[async_trait]
impl ZipLookup for MemoryZips {
    async fn locate(&self, zip: &str) -> Result<Option<ZipPoint>, LookupError> {
        Ok(self.zips.get(zip).cloned())
    }
}

/// Discards audit entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAudit;

#[async_trait]
impl SearchAudit for NoopAudit {
    async fn record(&self, _entry: &SearchAuditEntry) -> Result<(), LookupError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drug(rx_cui: &str, name: &str) -> DrugInfo {
        DrugInfo {
            rx_cui: rx_cui.to_string(),
            name: name.to_string(),
            forms: vec![],
            strengths: vec![],
        }
    }

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new([
            drug("351457", "Metformin"),
            drug("723", "Amoxicillin"),
            drug("617314", "Atorvastatin"),
        ])
    }

    #[tokio::test]
    async fn suggest_matches_prefix_case_insensitively_in_name_order() {
        let names: Vec<String> = catalog()
            .suggest("A", 10)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Amoxicillin", "Atorvastatin"]);
    }

    #[tokio::test]
    async fn suggest_honours_limit() {
        let hits = catalog().suggest("a", 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Amoxicillin");
    }

    #[tokio::test]
    async fn suggest_is_prefix_not_substring() {
        assert!(catalog().suggest("form", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_misses_unknown_rx_cui() {
        let c = catalog();
        assert_eq!(c.find("723").await.unwrap().map(|d| d.name).as_deref(), Some("Amoxicillin"));
        assert!(c.find("0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn memory_zips_locate() {
        let zips = MemoryZips::new([ZipPoint {
            zip: "78701".to_string(),
            latitude: 30.2711,
            longitude: -97.7437,
            city: Some("Austin".to_string()),
            state: Some("TX".to_string()),
        }]);
        let hit = zips.locate("78701").await.unwrap().expect("known zip");
        assert_eq!(hit.point(), GeoPoint::new(30.2711, -97.7437));
        assert!(zips.locate("10001").await.unwrap().is_none());
    }

    #[test]
    fn primary_form_defaults_to_tablet() {
        assert_eq!(drug("1", "X").primary_form(), "tablet");
    }
}
