use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::application::error::HttpError;
use crate::domain::content::RecordKind;

use super::AdminState;

const SOURCE: &str = "infra::http::admin::records::update_title";

#[derive(Debug, Deserialize)]
pub(super) struct UpdateTitleRequest {
    title: String,
}

#[derive(Debug, Serialize)]
pub(super) struct UpdateTitleResponse {
    kind: RecordKind,
    name: String,
    title: String,
    slug: String,
}

/// Save a record's new title along with the slug derived from it.
pub(super) async fn update_title(
    State(state): State<AdminState>,
    Path((kind, name)): Path<(String, String)>,
    Json(request): Json<UpdateTitleRequest>,
) -> Result<Json<UpdateTitleResponse>, HttpError> {
    let kind: RecordKind = kind.parse().map_err(|err| {
        HttpError::from_error(SOURCE, StatusCode::BAD_REQUEST, "Unknown record kind", &err)
    })?;

    let slug = state
        .slugs
        .assign_and_validate(kind, &name, &request.title)
        .await?;

    Ok(Json(UpdateTitleResponse {
        kind,
        name,
        title: request.title,
        slug,
    }))
}
