//! Quote providers and the offer aggregation engine.

pub mod collaborators;
pub mod error;
pub mod live;
pub mod price_text;
pub mod provider;
pub mod rank;
pub mod registry;
pub mod search;
pub mod simulated;

pub use collaborators::{
    DrugCatalog, DrugInfo, MemoryCatalog, MemoryZips, NoopAudit, SearchAudit, SearchAuditEntry,
    ZipLookup, ZipPoint,
};
pub use error::{LookupError, QuoteError, SearchError};
pub use live::{LiveQuoteProvider, PriceListing};
pub use price_text::parse_price_text;
pub use provider::{QuoteArgs, QuoteProvider};
pub use rank::{attach_distances, rank_offers};
pub use registry::default_providers;
pub use search::PriceSearch;
pub use simulated::SimulatedProvider;
