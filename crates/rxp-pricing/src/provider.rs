//! The capability every pricing source implements.

use async_trait::async_trait;
use rxp_core::{GeoPoint, Offer, OfferItem, OfferSource};

use crate::error::QuoteError;

/// Everything a provider needs to quote one drug/strength/quantity.
#[derive(Debug, Clone)]
pub struct QuoteArgs {
    pub rx_cui: String,
    pub drug_name: String,
    pub form: String,
    pub strength: String,
    pub quantity: u32,
    pub zip: String,
    /// Requester's coordinates when the ZIP resolved.
    pub origin: Option<GeoPoint>,
}

impl QuoteArgs {
    #[must_use]
    pub fn item(&self) -> OfferItem<'_> {
        OfferItem {
            rx_cui: &self.rx_cui,
            drug_name: &self.drug_name,
            form: &self.form,
            strength: &self.strength,
            quantity: self.quantity,
        }
    }
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn source(&self) -> OfferSource;

    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Quote `args`. Every returned offer satisfies the total-price invariant
    /// because it is built through [`Offer::new`].
    async fn quote(&self, args: &QuoteArgs) -> Result<Vec<Offer>, QuoteError>;
}
