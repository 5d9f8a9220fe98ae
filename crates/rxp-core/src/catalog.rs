use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::request::is_zip5;
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugConfig {
    pub rx_cui: String,
    pub name: String,
    #[serde(default)]
    pub forms: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipConfig {
    pub zip: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub drugs: Vec<DrugConfig>,
    #[serde(default)]
    pub zips: Vec<ZipConfig>,
}

/// Load and validate the drug catalog and ZIP table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_catalog(&content)
}

/// Parse and validate catalog YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_catalog(content: &str) -> Result<CatalogFile, ConfigError> {
    let catalog: CatalogFile =
        serde_yaml::from_str(content).map_err(ConfigError::CatalogFileParse)?;

    validate_catalog(&catalog)?;

    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    let mut seen_rx_cuis = HashSet::new();

    for drug in &catalog.drugs {
        if drug.rx_cui.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "drug '{}' has an empty rx_cui",
                drug.name
            )));
        }

        if drug.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "drug {} has an empty name",
                drug.rx_cui
            )));
        }

        if !seen_rx_cuis.insert(drug.rx_cui.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate rx_cui: '{}'",
                drug.rx_cui
            )));
        }
    }

    let mut seen_zips = HashSet::new();

    for zip in &catalog.zips {
        if !is_zip5(&zip.zip) {
            return Err(ConfigError::Validation(format!(
                "zip '{}' must be 5 digits",
                zip.zip
            )));
        }

        if !(-90.0..=90.0).contains(&zip.latitude) || !(-180.0..=180.0).contains(&zip.longitude)
        {
            return Err(ConfigError::Validation(format!(
                "zip {} has out-of-range coordinates ({}, {})",
                zip.zip, zip.latitude, zip.longitude
            )));
        }

        if !seen_zips.insert(zip.zip.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate zip: '{}'",
                zip.zip
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
