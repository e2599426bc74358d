use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("content path `{path}` has no file name segment")]
    MalformedPath { path: String },
    #[error("{entity} `{key}` not found")]
    NotFound { entity: &'static str, key: String },
}

impl DomainError {
    pub fn malformed_path(path: impl Into<String>) -> Self {
        Self::MalformedPath { path: path.into() }
    }

    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }
}
