use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderValue, header::CONTENT_TYPE},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::info;

use crate::application::site::{RenderedPage, SiteRenderer};

use super::middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct HttpState {
    pub renderer: Arc<SiteRenderer>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/{*slug}", get(page))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn index(State(state): State<HttpState>) -> Response {
    serve_page(&state, "").await
}

async fn page(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    serve_page(&state, &slug).await
}

async fn serve_page(state: &HttpState, slug: &str) -> Response {
    let rendered = state.renderer.render(slug).await;
    info!(
        target = "pagewright::http::public",
        slug = %slug,
        status = rendered.status.as_u16(),
        "page served"
    );
    rendered.into_response()
}

impl IntoResponse for RenderedPage {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        response
    }
}
