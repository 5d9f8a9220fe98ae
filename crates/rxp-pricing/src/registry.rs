use std::sync::Arc;

use rxp_core::OfferSource;

use crate::live::LiveQuoteProvider;
use crate::provider::QuoteProvider;
use crate::simulated::SimulatedProvider;

/// Providers in registration order: goodrx, costplus, amazon.
///
/// When `live` is present it takes the goodrx slot in place of the
/// simulated quote.
#[must_use]
pub fn default_providers(live: Option<Arc<LiveQuoteProvider>>) -> Vec<Arc<dyn QuoteProvider>> {
    OfferSource::ALL
        .into_iter()
        .map(|source| -> Arc<dyn QuoteProvider> {
            match (source, &live) {
                (OfferSource::Goodrx, Some(live)) => Arc::clone(live) as Arc<dyn QuoteProvider>,
                _ => Arc::new(SimulatedProvider::new(source)),
            }
        })
        .collect()
}
