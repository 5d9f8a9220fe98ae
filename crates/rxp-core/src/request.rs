//! Search request validation.
//!
//! [`SearchRequest`] can only be built through [`SearchRequest::parse`], so
//! anything holding one has already passed the request boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw, untrusted search fields as they arrive from a transport.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequestInput {
    pub rx_cui: Option<String>,
    pub strength: Option<String>,
    pub quantity: Option<i64>,
    pub zip: Option<String>,
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    rx_cui: String,
    strength: String,
    quantity: u32,
    zip: String,
}

/// Every problem found with a [`SearchRequestInput`], in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid search request: {}", details.join("; "))]
pub struct ValidationError {
    pub details: Vec<String>,
}

impl SearchRequest {
    /// Trim and validate raw input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing each failing field when the drug
    /// identifier or strength is empty, the quantity is missing or not
    /// positive, or the ZIP is not exactly five digits.
    pub fn parse(input: SearchRequestInput) -> Result<Self, ValidationError> {
        let mut details = Vec::new();

        let rx_cui = input.rx_cui.as_deref().map(str::trim).unwrap_or_default();
        if rx_cui.is_empty() {
            details.push("rx_cui is required".to_string());
        }

        let strength = input.strength.as_deref().map(str::trim).unwrap_or_default();
        if strength.is_empty() {
            details.push("strength is required".to_string());
        }

        let quantity = match input.quantity {
            Some(q) if q > 0 => match u32::try_from(q) {
                Ok(q) => Some(q),
                Err(_) => {
                    details.push(format!("quantity must be at most {}", u32::MAX));
                    None
                }
            },
            _ => {
                details.push("quantity must be positive".to_string());
                None
            }
        };

        let zip = input.zip.as_deref().map(str::trim).unwrap_or_default();
        if !is_zip5(zip) {
            details.push("zip must be 5 digits".to_string());
        }

        match quantity {
            Some(quantity) if details.is_empty() => Ok(Self {
                rx_cui: rx_cui.to_string(),
                strength: strength.to_string(),
                quantity,
                zip: zip.to_string(),
            }),
            _ => Err(ValidationError { details }),
        }
    }

    #[must_use]
    pub fn rx_cui(&self) -> &str {
        &self.rx_cui
    }

    #[must_use]
    pub fn strength(&self) -> &str {
        &self.strength
    }

    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub fn zip(&self) -> &str {
        &self.zip
    }
}

/// `true` for exactly five ASCII digits.
#[must_use]
pub fn is_zip5(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}
