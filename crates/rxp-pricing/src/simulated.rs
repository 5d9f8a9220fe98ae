//! Fixed-shape placeholder quotes for sources without a live integration.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rxp_core::{Fulfillment, GeoPoint, Offer, OfferSource, Pharmacy, PriceParts};

use crate::error::QuoteError;
use crate::provider::{QuoteArgs, QuoteProvider};

/// Offset applied to the requester's point to place the simulated pickup
/// pharmacy a short drive away.
const PICKUP_OFFSET: GeoPoint = GeoPoint::new(0.02, 0.01);

/// Returns one deterministic offer for its source.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedProvider {
    source: OfferSource,
}

impl SimulatedProvider {
    #[must_use]
    pub const fn new(source: OfferSource) -> Self {
        Self { source }
    }

    fn offer(&self, args: &QuoteArgs) -> Offer {
        match self.source {
            OfferSource::Goodrx => Offer::new(
                OfferSource::Goodrx,
                args.item(),
                PriceParts {
                    subtotal: Decimal::new(799, 2),
                    fees: Decimal::ZERO,
                    shipping: None,
                },
                Fulfillment::Pickup,
                Pharmacy {
                    name: Some("CVS Pharmacy".to_string()),
                    address: Some("123 Main St".to_string()),
                    location: args.origin.map(|o| {
                        GeoPoint::new(
                            o.latitude + PICKUP_OFFSET.latitude,
                            o.longitude + PICKUP_OFFSET.longitude,
                        )
                    }),
                },
                "Coupon at checkout",
            ),
            OfferSource::Costplus => Offer::new(
                OfferSource::Costplus,
                args.item(),
                PriceParts {
                    subtotal: Decimal::new(500, 2),
                    fees: Decimal::new(500, 2),
                    shipping: Some(Decimal::new(500, 2)),
                },
                Fulfillment::Mail,
                Pharmacy::default(),
                "Membership optional",
            ),
            OfferSource::Amazon => Offer::new(
                OfferSource::Amazon,
                args.item(),
                PriceParts {
                    subtotal: Decimal::new(949, 2),
                    fees: Decimal::ZERO,
                    shipping: Some(Decimal::ZERO),
                },
                Fulfillment::Mail,
                Pharmacy::default(),
                "Prime Rx estimate",
            ),
        }
    }
}

#[async_trait]
impl QuoteProvider for SimulatedProvider {
    fn source(&self) -> OfferSource {
        self.source
    }

    fn name(&self) -> &str {
        match self.source {
            OfferSource::Goodrx => "goodrx-simulated",
            OfferSource::Costplus => "costplus-simulated",
            OfferSource::Amazon => "amazon-simulated",
        }
    }

    async fn quote(&self, args: &QuoteArgs) -> Result<Vec<Offer>, QuoteError> {
        Ok(vec![self.offer(args)])
    }
}
