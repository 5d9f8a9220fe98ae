use axum::{
    extract::{Query, State},
    Extension, Json,
};
use rxp_pricing::{DrugCatalog, DrugInfo};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Queries shorter than this return nothing without touching the catalog.
const MIN_QUERY_CHARS: usize = 2;
const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Deserialize)]
pub(super) struct AutocompleteQuery {
    pub q: Option<String>,
}

pub(super) async fn autocomplete(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AutocompleteQuery>,
) -> Result<Json<ApiResponse<Vec<DrugInfo>>>, ApiError> {
    let q = query.q.as_deref().map(str::trim).unwrap_or_default();

    let data = if q.chars().count() < MIN_QUERY_CHARS {
        Vec::new()
    } else {
        state
            .search
            .catalog()
            .suggest(q, MAX_SUGGESTIONS)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "autocomplete lookup failed");
                ApiError::new(req_id.0.clone(), "internal_error", "autocomplete failed")
            })?
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
