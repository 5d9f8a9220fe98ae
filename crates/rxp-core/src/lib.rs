//! Shared domain types and configuration for the rxprice workspace.

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod geo;
pub mod offers;
pub mod request;
pub mod sequence;

use thiserror::Error;

pub use app_config::AppConfig;
pub use catalog::{load_catalog, parse_catalog, CatalogFile, DrugConfig, ZipConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{distance_miles, GeoPoint, EARTH_RADIUS_MILES};
pub use offers::{Fulfillment, Offer, OfferItem, OfferSource, Pharmacy, PriceParts};
pub use request::{is_zip5, SearchRequest, SearchRequestInput, ValidationError};
pub use sequence::{RequestSequencer, Ticket};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[source] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
