use thiserror::Error;

/// Failure of a single quote provider. The aggregator absorbs these as
/// "no offers from this source".
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("quote source did not answer within {secs}s")]
    Timeout { secs: u64 },

    #[error("no price list found at {url}")]
    NoPriceList { url: String },

    #[error("invalid live quote URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Failure of a collaborator backend (catalog, ZIP table, audit log).
#[derive(Debug, Error)]
#[error("{what} lookup failed: {source}")]
pub struct LookupError {
    pub what: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl LookupError {
    pub fn backend(
        what: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            what,
            source: source.into(),
        }
    }
}

/// The only search failure that is not absorbed: the drug catalog backend
/// itself could not be reached.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("drug catalog unavailable: {0}")]
    Catalog(#[source] LookupError),
}
