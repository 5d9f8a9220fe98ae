use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use rxp_core::{Offer, SearchRequest, SearchRequestInput};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct SearchData {
    offers: Vec<Offer>,
}

pub(super) async fn search_offers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<SearchRequestInput>, JsonRejection>,
) -> Result<Json<ApiResponse<SearchData>>, ApiError> {
    let Json(input) = body.map_err(|e| {
        tracing::debug!(error = %e, "unreadable search body");
        ApiError::new(req_id.0.clone(), "bad_request", e.body_text())
    })?;

    let request = SearchRequest::parse(input).map_err(|e| {
        ApiError::new(req_id.0.clone(), "validation_error", "invalid search request")
            .with_details(e.details)
    })?;

    let offers = state.search.search(&request).await.map_err(|e| {
        tracing::error!(error = %e, "search failed");
        ApiError::new(req_id.0.clone(), "internal_error", "search failed")
    })?;

    Ok(Json(ApiResponse {
        data: SearchData { offers },
        meta: ResponseMeta::new(req_id.0),
    }))
}
