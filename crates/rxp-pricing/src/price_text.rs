use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse displayed price text such as `"$1,234.56"`.
///
/// Currency symbols, thousands separators and whitespace are stripped.
/// Returns `None` for anything that is not a non-negative decimal.
#[must_use]
pub fn parse_price_text(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&cleaned).ok()?;
    if value.is_sign_negative() {
        return None;
    }
    Some(value)
}
