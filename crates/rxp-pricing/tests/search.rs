//! End-to-end tests for `PriceSearch` using in-memory collaborators and
//! scripted providers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use rxp_core::{
    parse_catalog, CatalogFile, Offer, OfferSource, SearchRequest, SearchRequestInput,
};
use rxp_pricing::{
    default_providers, DrugCatalog, DrugInfo, LookupError, MemoryCatalog, MemoryZips, NoopAudit,
    PriceSearch, QuoteArgs, QuoteError, QuoteProvider, SearchAudit, SearchAuditEntry,
    SearchError, ZipLookup, ZipPoint,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn catalog_file() -> CatalogFile {
    parse_catalog(
        r#"
drugs:
  - rx_cui: "723"
    name: Amoxicillin
    forms: [capsule, tablet]
    strengths: ["250 mg", "500 mg"]
zips:
  - zip: "78701"
    latitude: 30.2711
    longitude: -97.7437
"#,
    )
    .expect("test catalog should parse")
}

fn request(rx_cui: &str, zip: &str) -> SearchRequest {
    SearchRequest::parse(SearchRequestInput {
        rx_cui: Some(rx_cui.to_string()),
        strength: Some("500 mg".to_string()),
        quantity: Some(30),
        zip: Some(zip.to_string()),
    })
    .expect("valid request")
}

fn search_with(providers: Vec<Arc<dyn QuoteProvider>>) -> PriceSearch {
    let catalog = catalog_file();
    PriceSearch::new(
        Arc::new(MemoryCatalog::from_catalog(&catalog)),
        Arc::new(MemoryZips::from_catalog(&catalog)),
        Arc::new(NoopAudit),
        providers,
    )
}

fn totals(offers: &[Offer]) -> Vec<Decimal> {
    offers.iter().map(|o| o.total_price).collect()
}

struct FailingProvider(OfferSource);

#[async_trait]
impl QuoteProvider for FailingProvider {
    fn source(&self) -> OfferSource {
        self.0
    }

    fn name(&self) -> &str {
        "failing"
    }

    async fn quote(&self, _args: &QuoteArgs) -> Result<Vec<Offer>, QuoteError> {
        Err(QuoteError::Timeout { secs: 5 })
    }
}

#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl QuoteProvider for CountingProvider {
    fn source(&self) -> OfferSource {
        OfferSource::Amazon
    }

    fn name(&self) -> &str {
        "counting"
    }

    async fn quote(&self, _args: &QuoteArgs) -> Result<Vec<Offer>, QuoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

struct BrokenBackend;

#[async_trait]
impl DrugCatalog for BrokenBackend {
    async fn find(&self, _rx_cui: &str) -> Result<Option<DrugInfo>, LookupError> {
        Err(LookupError::backend("drug", "connection refused"))
    }

    async fn suggest(&self, _prefix: &str, _limit: usize) -> Result<Vec<DrugInfo>, LookupError> {
        Err(LookupError::backend("drug", "connection refused"))
    }
}

#[async_trait]
impl ZipLookup for BrokenBackend {
    async fn locate(&self, _zip: &str) -> Result<Option<ZipPoint>, LookupError> {
        Err(LookupError::backend("zip", "connection refused"))
    }
}

#[async_trait]
impl SearchAudit for BrokenBackend {
    async fn record(&self, _entry: &SearchAuditEntry) -> Result<(), LookupError> {
        Err(LookupError::backend("audit", "connection refused"))
    }
}

#[derive(Default)]
struct RecordingAudit {
    entries: Mutex<Vec<SearchAuditEntry>>,
}

#[async_trait]
impl SearchAudit for RecordingAudit {
    async fn record(&self, entry: &SearchAuditEntry) -> Result<(), LookupError> {
        self.entries
            .lock()
            .expect("audit mutex poisoned")
            .push(entry.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn amoxicillin_in_austin_ranks_simulated_offers_by_total() {
    let offers = search_with(default_providers(None))
        .search(&request("723", "78701"))
        .await
        .expect("search should succeed");

    assert_eq!(
        totals(&offers),
        vec![
            Decimal::new(799, 2),
            Decimal::new(949, 2),
            Decimal::new(1500, 2)
        ]
    );
    assert_eq!(offers[0].source, OfferSource::Goodrx);
    assert_eq!(offers[0].drug_name, "Amoxicillin");
    assert_eq!(offers[0].form, "capsule");

    let d = offers[0].distance_miles.expect("goodrx distance attached");
    assert!(d > 1.0 && d < 2.0, "got {d}");
    assert!(offers[1].distance_miles.is_none());
    assert!(offers[2].distance_miles.is_none());
}

#[tokio::test]
async fn unresolved_zip_leaves_every_distance_null() {
    let offers = search_with(default_providers(None))
        .search(&request("723", "99999"))
        .await
        .expect("search should succeed");

    assert_eq!(offers.len(), 3);
    assert!(offers.iter().all(|o| o.distance_miles.is_none()));
    assert!(offers.iter().all(|o| o.pharmacy_location.is_none()));
    assert_eq!(offers[0].total_price, Decimal::new(799, 2));
}

#[tokio::test]
async fn zip_backend_failure_degrades_to_no_distances() {
    let catalog = catalog_file();
    let search = PriceSearch::new(
        Arc::new(MemoryCatalog::from_catalog(&catalog)),
        Arc::new(BrokenBackend),
        Arc::new(NoopAudit),
        default_providers(None),
    );

    let offers = search
        .search(&request("723", "78701"))
        .await
        .expect("search should succeed");
    assert_eq!(offers.len(), 3);
    assert!(offers.iter().all(|o| o.distance_miles.is_none()));
}

#[tokio::test]
async fn all_providers_failing_yields_empty_list() {
    let providers: Vec<Arc<dyn QuoteProvider>> = vec![
        Arc::new(FailingProvider(OfferSource::Goodrx)),
        Arc::new(FailingProvider(OfferSource::Costplus)),
        Arc::new(FailingProvider(OfferSource::Amazon)),
    ];
    let offers = search_with(providers)
        .search(&request("723", "78701"))
        .await
        .expect("provider failures are absorbed");

    assert!(offers.is_empty());
}

#[tokio::test]
async fn one_failing_provider_does_not_hide_the_others() {
    let mut providers = default_providers(None);
    providers[0] = Arc::new(FailingProvider(OfferSource::Goodrx));

    let offers = search_with(providers)
        .search(&request("723", "78701"))
        .await
        .expect("search should succeed");

    assert_eq!(
        totals(&offers),
        vec![Decimal::new(949, 2), Decimal::new(1500, 2)]
    );
}

#[tokio::test]
async fn unknown_drug_yields_empty_list_without_quoting() {
    let counter = Arc::new(CountingProvider::default());
    let offers = search_with(vec![counter.clone() as Arc<dyn QuoteProvider>])
        .search(&request("000000", "78701"))
        .await
        .expect("unknown drug is not an error");

    assert!(offers.is_empty());
    assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn catalog_backend_failure_is_fatal() {
    let catalog = catalog_file();
    let search = PriceSearch::new(
        Arc::new(BrokenBackend),
        Arc::new(MemoryZips::from_catalog(&catalog)),
        Arc::new(NoopAudit),
        default_providers(None),
    );

    let err = search.search(&request("723", "78701")).await.unwrap_err();
    assert!(matches!(err, SearchError::Catalog(_)));
}

#[tokio::test]
async fn audit_failure_does_not_affect_results() {
    let catalog = catalog_file();
    let search = PriceSearch::new(
        Arc::new(MemoryCatalog::from_catalog(&catalog)),
        Arc::new(MemoryZips::from_catalog(&catalog)),
        Arc::new(BrokenBackend),
        default_providers(None),
    );

    let offers = search
        .search(&request("723", "78701"))
        .await
        .expect("search should succeed");
    assert_eq!(offers.len(), 3);
}

#[tokio::test]
async fn audit_records_the_validated_request() {
    let catalog = catalog_file();
    let audit = Arc::new(RecordingAudit::default());
    let search = PriceSearch::new(
        Arc::new(MemoryCatalog::from_catalog(&catalog)),
        Arc::new(MemoryZips::from_catalog(&catalog)),
        audit.clone(),
        default_providers(None),
    );

    search
        .search(&request("723", "78701"))
        .await
        .expect("search should succeed");

    for _ in 0..100 {
        if !audit.entries.lock().expect("audit mutex poisoned").is_empty() {
            break;
        }
        tokio::task::yield_now().await;
    }

    let entries = audit.entries.lock().expect("audit mutex poisoned");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].rx_cui, "723");
    assert_eq!(entries[0].quantity, 30);
    assert_eq!(entries[0].zip, "78701");
}

#[tokio::test]
async fn every_returned_offer_satisfies_total_invariant() {
    let offers = search_with(default_providers(None))
        .search(&request("723", "78701"))
        .await
        .expect("search should succeed");

    for o in &offers {
        assert_eq!(
            o.total_price,
            o.price_subtotal + o.price_fees + o.shipping.unwrap_or(Decimal::ZERO)
        );
    }
}
