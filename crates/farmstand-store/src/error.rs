//! Store errors.

use farmstand_core::{CatalogError, FieldErrors, RecordId};
use thiserror::Error;

/// Result type alias using [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised by a [`crate::CatalogStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    /// The document failed the store-level schema rules.
    #[error("document rejected: {}", .0.joined())]
    Rejected(FieldErrors),

    /// A product referenced a farm that does not exist.
    #[error("farm {farm} does not exist")]
    DanglingReference {
        /// The missing farm id.
        farm: RecordId,
    },

    /// Seed data could not be read or parsed.
    #[error("failed to load seed data from {path}: {message}")]
    Seed {
        /// Seed file path.
        path: String,
        /// Underlying failure.
        message: String,
    },
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(errors) => CatalogError::from(errors),
            StoreError::DanglingReference { farm } => {
                let mut errors = FieldErrors::new();
                errors.add("farm", format!("\"farm\" {farm} does not exist"));
                CatalogError::from(errors)
            }
            other => CatalogError::internal_with_source("store operation failed", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmstand_core::ErrorKind;

    #[test]
    fn test_rejection_becomes_validation() {
        let mut errors = FieldErrors::new();
        errors.add("price", "\"price\" must be greater than or equal to 0");
        let err = CatalogError::from(StoreError::Rejected(errors));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.to_string(),
            "\"price\" must be greater than or equal to 0"
        );
    }

    #[test]
    fn test_dangling_reference_becomes_validation() {
        let farm = RecordId::new();
        let err = CatalogError::from(StoreError::DanglingReference { farm });
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains(&farm.to_string()));
    }

    #[test]
    fn test_seed_failure_is_internal() {
        let err = CatalogError::from(StoreError::Seed {
            path: "seed.json".to_string(),
            message: "expected value".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
