use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Pricing sources an offer can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferSource {
    Goodrx,
    Costplus,
    Amazon,
}

impl OfferSource {
    pub const ALL: [OfferSource; 3] = [
        OfferSource::Goodrx,
        OfferSource::Costplus,
        OfferSource::Amazon,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OfferSource::Goodrx => "goodrx",
            OfferSource::Costplus => "costplus",
            OfferSource::Amazon => "amazon",
        }
    }
}

impl std::fmt::Display for OfferSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the patient receives the medication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fulfillment {
    Pickup,
    Mail,
}

impl std::fmt::Display for Fulfillment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fulfillment::Pickup => write!(f, "pickup"),
            Fulfillment::Mail => write!(f, "mail"),
        }
    }
}

/// Dispensing pharmacy details. Every field is optional because mail-order
/// sources and scraped listings often carry only part of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pharmacy {
    pub name: Option<String>,
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
}

/// One normalized price quote.
///
/// `total_price` is always `price_subtotal + price_fees + shipping.unwrap_or(0)`;
/// [`Offer::new`] is the only constructor and computes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub source: OfferSource,
    pub drug_rx_cui: String,
    pub drug_name: String,
    pub form: String,
    pub strength: String,
    pub quantity: u32,
    pub price_subtotal: Decimal,
    pub price_fees: Decimal,
    /// `None` when shipping does not apply (in-store pickup).
    pub shipping: Option<Decimal>,
    pub total_price: Decimal,
    pub fulfillment: Fulfillment,
    pub pharmacy_name: Option<String>,
    pub pharmacy_address: Option<String>,
    pub pharmacy_location: Option<GeoPoint>,
    /// Set by the aggregator only when both the requester's and the
    /// pharmacy's coordinates are known.
    pub distance_miles: Option<f64>,
    pub terms: String,
}

/// Drug and dosage fields copied onto each offer.
#[derive(Debug, Clone, Copy)]
pub struct OfferItem<'a> {
    pub rx_cui: &'a str,
    pub drug_name: &'a str,
    pub form: &'a str,
    pub strength: &'a str,
    pub quantity: u32,
}

/// Price components before the total is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceParts {
    pub subtotal: Decimal,
    pub fees: Decimal,
    pub shipping: Option<Decimal>,
}

impl PriceParts {
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.subtotal + self.fees + self.shipping.unwrap_or(Decimal::ZERO)
    }
}

impl Offer {
    #[must_use]
    pub fn new(
        source: OfferSource,
        item: OfferItem<'_>,
        price: PriceParts,
        fulfillment: Fulfillment,
        pharmacy: Pharmacy,
        terms: impl Into<String>,
    ) -> Self {
        Self {
            source,
            drug_rx_cui: item.rx_cui.to_string(),
            drug_name: item.drug_name.to_string(),
            form: item.form.to_string(),
            strength: item.strength.to_string(),
            quantity: item.quantity,
            price_subtotal: price.subtotal,
            price_fees: price.fees,
            shipping: price.shipping,
            total_price: price.total(),
            fulfillment,
            pharmacy_name: pharmacy.name,
            pharmacy_address: pharmacy.address,
            pharmacy_location: pharmacy.location,
            distance_miles: None,
            terms: terms.into(),
        }
    }
}
