//! Distance enrichment and the two-key offer ordering.

use std::cmp::Ordering;

use rxp_core::{distance_miles, GeoPoint, Offer};

/// Set `distance_miles` on every offer that has pharmacy coordinates when
/// `origin` is known; clear it everywhere else.
pub fn attach_distances(offers: &mut [Offer], origin: Option<GeoPoint>) {
    for offer in offers {
        offer.distance_miles = match (origin, offer.pharmacy_location) {
            (Some(from), Some(to)) => Some(distance_miles(from, to)),
            _ => None,
        };
    }
}

/// Sort by total price, then distance. Unknown distance sorts after every
/// known distance. The sort is stable, so offers equal on both keys keep
/// their incoming order.
pub fn rank_offers(offers: &mut [Offer]) {
    offers.sort_by(|a, b| {
        a.total_price
            .cmp(&b.total_price)
            .then_with(|| compare_distance(a.distance_miles, b.distance_miles))
    });
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
