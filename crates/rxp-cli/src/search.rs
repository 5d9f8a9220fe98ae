//! `search` command: run the aggregator and print a ranked table.

use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;
use rxp_core::{AppConfig, Offer, SearchRequest, SearchRequestInput};
use rxp_db::PgCollaborators;
use rxp_pricing::{
    default_providers, LiveQuoteProvider, MemoryCatalog, MemoryZips, NoopAudit, PriceSearch,
    SearchAudit, SearchAuditEntry,
};

fn validate(input: SearchRequestInput) -> anyhow::Result<SearchRequest> {
    SearchRequest::parse(input).map_err(|e| anyhow::anyhow!(e.details.join("\n")))
}

/// Search against Postgres, with the live quote source when configured.
pub(crate) async fn run_search(config: &AppConfig, input: SearchRequestInput) -> anyhow::Result<()> {
    let request = validate(input)?;
    let pool = crate::db::connect(config).await?;
    let pg = Arc::new(PgCollaborators::new(pool));
    let live = LiveQuoteProvider::from_config(config)?.map(Arc::new);

    let search = PriceSearch::new(
        pg.clone(),
        pg.clone(),
        Arc::new(NoopAudit),
        default_providers(live),
    );

    let offers = audited_search(&search, pg.as_ref(), &request).await?;
    print_offers(&offers);
    Ok(())
}

/// Write the audit row, then search. The row is awaited before the search
/// starts, so a failing search still leaves its record.
pub(crate) async fn audited_search(
    search: &PriceSearch,
    audit: &dyn SearchAudit,
    request: &SearchRequest,
) -> anyhow::Result<Vec<Offer>> {
    if let Err(e) = audit.record(&SearchAuditEntry::from_request(request)).await {
        tracing::warn!(rx_cui = request.rx_cui(), error = %e, "failed to record search");
    }
    Ok(search.search(request).await?)
}

pub(crate) async fn run_offline_search(
    catalog_path: &Path,
    input: SearchRequestInput,
) -> anyhow::Result<()> {
    let request = validate(input)?;
    let catalog = rxp_core::load_catalog(catalog_path)?;

    let search = PriceSearch::new(
        Arc::new(MemoryCatalog::from_catalog(&catalog)),
        Arc::new(MemoryZips::from_catalog(&catalog)),
        Arc::new(NoopAudit),
        default_providers(None),
    );

    let offers = search.search(&request).await?;
    print_offers(&offers);
    Ok(())
}

fn print_offers(offers: &[Offer]) {
    if offers.is_empty() {
        println!("no offers found");
        return;
    }
    for line in format_offers(offers) {
        println!("{line}");
    }
}

fn money(value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("${v:.2}"))
}

pub(crate) fn format_offers(offers: &[Offer]) -> Vec<String> {
    let mut lines = Vec::with_capacity(offers.len() + 1);
    lines.push(format!(
        "{:<9} {:>9} {:>9} {:>9} {:>9} {:<7} {:>8}  {}",
        "source", "subtotal", "fees", "shipping", "total", "via", "miles", "pharmacy"
    ));
    for offer in offers {
        let miles = offer
            .distance_miles
            .map_or_else(|| "-".to_string(), |d| format!("{d:.1}"));
        lines.push(format!(
            "{:<9} {:>9} {:>9} {:>9} {:>9} {:<7} {:>8}  {}",
            offer.source.as_str(),
            money(Some(offer.price_subtotal)),
            money(Some(offer.price_fees)),
            money(offer.shipping),
            money(Some(offer.total_price)),
            offer.fulfillment.to_string(),
            miles,
            offer.pharmacy_name.as_deref().unwrap_or("-"),
        ));
    }
    lines
}
