use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage full: {0}")]
    StorageFull(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::not_found(&format!("blog {id}")),
            StoreError::StorageFull(msg) => Self::StorageFull(msg),
            StoreError::Storage(msg) => Self::Storage(msg),
        }
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(value: models::errors::ModelError) -> Self {
        match value {
            models::errors::ModelError::Validation(msg) => Self::InvalidInput(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_service_kinds() {
        assert_eq!(
            ServiceError::from(StoreError::NotFound(3)),
            ServiceError::NotFound("blog 3 not found".into())
        );
        assert!(matches!(
            ServiceError::from(StoreError::StorageFull("cap".into())),
            ServiceError::StorageFull(_)
        ));
        assert!(matches!(
            ServiceError::from(StoreError::Storage("io".into())),
            ServiceError::Storage(_)
        ));
    }
}
