use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation failed: {message}")]
    Validation { message: String },
    #[error("no {entity} named `{name}`")]
    Missing { entity: &'static str, name: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn missing(entity: &'static str, name: impl Into<String>) -> Self {
        Self::Missing {
            entity,
            name: name.into(),
        }
    }
}
