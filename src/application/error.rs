use std::error::Error as StdError;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{
    application::repos::RepoError,
    domain::{content::RecordKind, error::DomainError},
    infra::error::InfraError,
};

/// A captured error chain, outermost message first.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    /// Multi-line trace suitable for embedding in a diagnostic comment.
    pub fn trace(&self) -> String {
        let mut trace = format!("{}: ", self.source);
        for (index, message) in self.messages.iter().enumerate() {
            if index > 0 {
                trace.push_str("\n  caused by: ");
            }
            trace.push_str(message);
        }
        trace
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    public_message: String,
    report: ErrorReport,
}

impl HttpError {
    pub fn from_error(
        source: &'static str,
        status: StatusCode,
        public_message: impl Into<String>,
        error: &dyn StdError,
    ) -> Self {
        let report = ErrorReport::from_error(source, status, error);
        Self {
            status,
            public_message: public_message.into(),
            report,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.public_message }));
        let mut response = (self.status, body).into_response();
        self.report.attach(&mut response);
        response
    }
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template `{name}` not found")]
    NotFound { name: String },
    #[error("failed to render template `{name}`: {message}")]
    Render { name: String, message: String },
}

/// Failures on the page rendering path. All of them end in the 404 page.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("no published record matches slug `{slug}`")]
    NotFound { slug: String },
    #[error("no template is mapped for record kind `{kind}`")]
    UnmappedTemplate { kind: RecordKind },
    #[error("prepared page arguments carry no template")]
    MissingTemplate,
    #[error("failed to list static pages")]
    StaticPages(#[source] std::io::Error),
    #[error("failed to serialize record fields")]
    Fields(#[from] serde_json::Error),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("repository lookup failed")]
    Repo(#[from] RepoError),
}

impl PageError {
    pub fn not_found(slug: impl Into<String>) -> Self {
        Self::NotFound { slug: slug.into() }
    }
}

/// Failures while assigning a slug on save. These reach the caller.
#[derive(Debug, Error)]
pub enum SlugAssignError {
    #[error(
        "A {} with the same title already exists. Please change the title of {name} and save again.",
        .kind.label()
    )]
    Duplicate { kind: RecordKind, name: String },
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("slug assignment failed")]
    Repo(#[from] RepoError),
}

impl SlugAssignError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SlugAssignError::Duplicate { .. }
            | SlugAssignError::Repo(RepoError::Duplicate { .. }) => StatusCode::CONFLICT,
            SlugAssignError::Validation(DomainError::Missing { .. })
            | SlugAssignError::Repo(RepoError::NotFound) => StatusCode::NOT_FOUND,
            SlugAssignError::Validation(_) => StatusCode::BAD_REQUEST,
            SlugAssignError::Repo(RepoError::Timeout) => StatusCode::SERVICE_UNAVAILABLE,
            SlugAssignError::Repo(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            SlugAssignError::Duplicate { .. } | SlugAssignError::Validation(_) => {
                self.to_string()
            }
            SlugAssignError::Repo(RepoError::NotFound) => "Record not found".to_string(),
            SlugAssignError::Repo(RepoError::Duplicate { .. }) => {
                "Another record already uses this slug".to_string()
            }
            SlugAssignError::Repo(_) => "Could not save the record".to_string(),
        }
    }
}

impl From<SlugAssignError> for HttpError {
    fn from(error: SlugAssignError) -> Self {
        HttpError::from_error(
            "application::slugs::SlugService",
            error.status_code(),
            error.public_message(),
            &error,
        )
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_trace_walks_sources() {
        let error = PageError::Repo(RepoError::Persistence("connection reset".to_string()));
        let report = ErrorReport::from_error(
            "application::site::SiteRenderer",
            StatusCode::NOT_FOUND,
            &error,
        );

        assert_eq!(
            report.trace(),
            "application::site::SiteRenderer: repository lookup failed\n  caused by: persistence error: connection reset"
        );
    }

    #[test]
    fn duplicate_message_names_kind_and_record() {
        let error = SlugAssignError::Duplicate {
            kind: RecordKind::BlogPost,
            name: "POST-0002".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "A Blog Post with the same title already exists. Please change the title of POST-0002 and save again."
        );
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn unknown_record_maps_to_not_found() {
        let error = SlugAssignError::Repo(RepoError::NotFound);
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.public_message(), "Record not found");
    }
}
