pub mod cart_repo;
pub mod category_repo;
pub mod models;
pub mod order_repo;
pub mod product_repo;
pub mod user_repo;
pub mod wishlist_repo;

use diesel::result::DatabaseErrorKind;

use crate::domain::errors::DomainError;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                DomainError::Conflict(info.message().to_string())
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_maps_to_conflict() {
        let err = diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value".to_string()),
        );
        assert!(matches!(DomainError::from(err), DomainError::Conflict(_)));
    }

    #[test]
    fn not_found_maps_to_internal() {
        let err = diesel::result::Error::NotFound;
        assert!(matches!(DomainError::from(err), DomainError::Internal(_)));
    }
}
