use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use rxp_pricing::PriceListing;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct LiveQuoteRequest {
    pub drug_name: Option<String>,
    #[serde(alias = "dosage")]
    pub strength: Option<String>,
    pub zip: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct LiveQuoteData {
    offers: Vec<PriceListing>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Run only the live price-list fetch, bypassing catalog and ranking.
pub(super) async fn live_quote(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<LiveQuoteRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LiveQuoteData>>, ApiError> {
    let Json(body) =
        body.map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.body_text()))?;

    let drug_name = non_blank(body.drug_name.as_ref());
    let zip = non_blank(body.zip.as_ref());
    let (Some(drug_name), Some(zip)) = (drug_name, zip) else {
        let mut details = Vec::new();
        if drug_name.is_none() {
            details.push("drug_name is required".to_string());
        }
        if zip.is_none() {
            details.push("zip is required".to_string());
        }
        return Err(ApiError::new(
            req_id.0.clone(),
            "validation_error",
            "missing drug_name or zip",
        )
        .with_details(details));
    };

    let Some(live) = state.live.as_ref() else {
        return Err(ApiError::new(
            req_id.0.clone(),
            "live_quotes_disabled",
            "live quotes are not configured",
        ));
    };

    let offers = live
        .fetch_price_list(drug_name, non_blank(body.strength.as_ref()), zip)
        .await
        .map_err(|e| {
            tracing::warn!(drug_name, zip, error = %e, "live quote failed");
            ApiError::new(req_id.0.clone(), "upstream_error", "failed to fetch live prices")
        })?;

    Ok(Json(ApiResponse {
        data: LiveQuoteData { offers },
        meta: ResponseMeta::new(req_id.0),
    }))
}
