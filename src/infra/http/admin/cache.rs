use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::AdminState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ClearCacheRequest {
    slug: Option<String>,
}

#[derive(Debug, Serialize)]
struct ClearCacheResponse {
    removed: usize,
}

/// Clear one cached page when a slug is given, otherwise every cached page.
pub(super) async fn clear_cache(
    State(state): State<AdminState>,
    body: Option<Json<ClearCacheRequest>>,
) -> Response {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let removed = state.renderer.clear_cache(request.slug.as_deref());
    Json(ClearCacheResponse { removed }).into_response()
}
