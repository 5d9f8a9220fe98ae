//! Offer aggregation: resolve, fan out, merge, enrich, rank.

use std::sync::Arc;

use futures::future::join_all;
use rxp_core::{GeoPoint, Offer, SearchRequest};

use crate::collaborators::{DrugCatalog, SearchAudit, SearchAuditEntry, ZipLookup};
use crate::error::SearchError;
use crate::provider::{QuoteArgs, QuoteProvider};
use crate::rank::{attach_distances, rank_offers};

/// Runs one price search across every registered provider.
///
/// Providers are queried concurrently; a failing provider contributes no
/// offers and never fails the search. Offers from providers that tie on
/// price and distance keep provider registration order.
#[derive(Clone)]
pub struct PriceSearch {
    catalog: Arc<dyn DrugCatalog>,
    zips: Arc<dyn ZipLookup>,
    audit: Arc<dyn SearchAudit>,
    providers: Vec<Arc<dyn QuoteProvider>>,
}

impl PriceSearch {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn DrugCatalog>,
        zips: Arc<dyn ZipLookup>,
        audit: Arc<dyn SearchAudit>,
        providers: Vec<Arc<dyn QuoteProvider>>,
    ) -> Self {
        Self {
            catalog,
            zips,
            audit,
            providers,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn DrugCatalog> {
        &self.catalog
    }

    /// Ranked offers for `request`. An unknown drug yields an empty list.
    ///
    /// Must be called from within a tokio runtime; the audit write is
    /// spawned and not awaited.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Catalog`] only when the drug catalog backend
    /// fails. Provider, ZIP and audit failures are logged and absorbed.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<Offer>, SearchError> {
        self.spawn_audit(SearchAuditEntry::from_request(request));

        let Some(drug) = self
            .catalog
            .find(request.rx_cui())
            .await
            .map_err(SearchError::Catalog)?
        else {
            tracing::info!(rx_cui = request.rx_cui(), "unknown drug; no offers");
            return Ok(Vec::new());
        };

        let origin = self.locate(request.zip()).await;

        let args = QuoteArgs {
            rx_cui: drug.rx_cui.clone(),
            drug_name: drug.name.clone(),
            form: drug.primary_form().to_string(),
            strength: request.strength().to_string(),
            quantity: request.quantity(),
            zip: request.zip().to_string(),
            origin,
        };

        let results = join_all(self.providers.iter().map(|p| p.quote(&args))).await;

        let mut offers = Vec::new();
        for (provider, result) in self.providers.iter().zip(results) {
            match result {
                Ok(mut quoted) => {
                    tracing::debug!(
                        provider = provider.name(),
                        count = quoted.len(),
                        "provider quoted"
                    );
                    offers.append(&mut quoted);
                }
                Err(e) => {
                    tracing::warn!(
                        source = %provider.source(),
                        provider = provider.name(),
                        error = %e,
                        "quote provider failed; continuing without its offers"
                    );
                }
            }
        }

        attach_distances(&mut offers, origin);
        rank_offers(&mut offers);

        tracing::info!(
            rx_cui = request.rx_cui(),
            zip = request.zip(),
            offers = offers.len(),
            located = origin.is_some(),
            "search complete"
        );

        Ok(offers)
    }

    async fn locate(&self, zip: &str) -> Option<GeoPoint> {
        match self.zips.locate(zip).await {
            Ok(Some(point)) => Some(point.point()),
            Ok(None) => {
                tracing::debug!(zip, "zip not in lookup table; distances omitted");
                None
            }
            Err(e) => {
                tracing::warn!(zip, error = %e, "zip lookup failed; distances omitted");
                None
            }
        }
    }

    fn spawn_audit(&self, entry: SearchAuditEntry) {
        let audit = Arc::clone(&self.audit);
        tokio::spawn(async move {
            if let Err(e) = audit.record(&entry).await {
                tracing::warn!(rx_cui = %entry.rx_cui, error = %e, "failed to record search");
            }
        });
    }
}
