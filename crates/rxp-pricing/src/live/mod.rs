//! Live discount-card quotes scraped from a configured price-list page.

mod parse;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use rxp_core::{AppConfig, Fulfillment, Offer, OfferSource, Pharmacy, PriceParts};
use serde::Serialize;

use crate::error::QuoteError;
use crate::price_text::parse_price_text;
use crate::provider::{QuoteArgs, QuoteProvider};

pub use parse::{clean_text, parse_price_list, RawListing};

const LIVE_TERMS: &str = "Discount card price at listed pharmacy";

/// One parsed price-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceListing {
    /// `None` when the page shows a price without a pharmacy name.
    pub pharmacy: Option<String>,
    pub price: Decimal,
    /// Price exactly as displayed, after whitespace cleanup.
    pub price_text: String,
}

/// Fetches and parses a price-list page. Stands in for the simulated goodrx
/// quote when `RXP_LIVE_QUOTE_URL` is set.
pub struct LiveQuoteProvider {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl LiveQuoteProvider {
    /// # Errors
    ///
    /// Returns [`QuoteError::InvalidUrl`] if `base_url` does not parse, or
    /// [`QuoteError::Http`] if the `reqwest::Client` cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, QuoteError> {
        reqwest::Url::parse(base_url).map_err(|e| QuoteError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            timeout_secs,
        })
    }

    /// Build from config; `Ok(None)` when no live URL is configured.
    ///
    /// # Errors
    ///
    /// Same as [`LiveQuoteProvider::new`].
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, QuoteError> {
        config
            .live_quote_url
            .as_deref()
            .map(|url| Self::new(url, config.quote_timeout_secs, &config.scraper_user_agent))
            .transpose()
    }

    /// Fetch the price list for `drug_name` near `zip`.
    ///
    /// Entries whose price text is not numeric are dropped individually.
    ///
    /// # Errors
    ///
    /// - [`QuoteError::Timeout`] if the whole interaction exceeds the timeout.
    /// - [`QuoteError::UnexpectedStatus`] for any non-2xx response.
    /// - [`QuoteError::NoPriceList`] if the page carries no price-list items.
    /// - [`QuoteError::Http`] for network or body read failures.
    pub async fn fetch_price_list(
        &self,
        drug_name: &str,
        strength: Option<&str>,
        zip: &str,
    ) -> Result<Vec<PriceListing>, QuoteError> {
        let limit = Duration::from_secs(self.timeout_secs);
        tokio::time::timeout(limit, self.fetch_inner(drug_name, strength, zip))
            .await
            .map_err(|_| QuoteError::Timeout {
                secs: self.timeout_secs,
            })?
    }

    async fn fetch_inner(
        &self,
        drug_name: &str,
        strength: Option<&str>,
        zip: &str,
    ) -> Result<Vec<PriceListing>, QuoteError> {
        let response = self
            .client
            .get(&self.base_url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .query(&[
                ("query", drug_name),
                ("dosage", strength.unwrap_or_default()),
                ("zip", zip),
            ])
            .send()
            .await?;

        let status = response.status();
        let url = response.url().to_string();
        if !status.is_success() {
            return Err(QuoteError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let raw = parse_price_list(&body).ok_or(QuoteError::NoPriceList { url })?;

        Ok(raw
            .into_iter()
            .filter_map(|entry| match parse_price_text(&entry.price_text) {
                Some(price) => Some(PriceListing {
                    pharmacy: entry.pharmacy,
                    price,
                    price_text: entry.price_text,
                }),
                None => {
                    tracing::debug!(
                        pharmacy = ?entry.pharmacy,
                        price_text = %entry.price_text,
                        "dropping price-list entry with non-numeric price"
                    );
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl QuoteProvider for LiveQuoteProvider {
    fn source(&self) -> OfferSource {
        OfferSource::Goodrx
    }

    fn name(&self) -> &str {
        "goodrx-live"
    }

    async fn quote(&self, args: &QuoteArgs) -> Result<Vec<Offer>, QuoteError> {
        let listings = self
            .fetch_price_list(&args.drug_name, Some(&args.strength), &args.zip)
            .await?;

        Ok(listings
            .into_iter()
            .map(|listing| {
                Offer::new(
                    OfferSource::Goodrx,
                    args.item(),
                    PriceParts {
                        subtotal: listing.price,
                        fees: Decimal::ZERO,
                        shipping: None,
                    },
                    Fulfillment::Pickup,
                    Pharmacy {
                        name: listing.pharmacy,
                        address: None,
                        location: None,
                    },
                    LIVE_TERMS,
                )
            })
            .collect())
    }
}
