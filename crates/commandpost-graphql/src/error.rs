//! Mapping from service errors to GraphQL errors.
//!
//! Every error carries `extensions.code` (stable, machine-readable) and
//! `extensions.category` (for logging dashboards) next to the
//! human-readable message.

use async_graphql::ErrorExtensions;

use commandpost_service::{ErrorCategory, ServiceError};

/// Converts a service error to a GraphQL error with extensions.
pub fn service_error_to_graphql(error: ServiceError) -> async_graphql::Error {
    let category = error.category();
    let code = error_code(category);
    let message = error.to_string();

    async_graphql::Error::new(message).extend_with(|_, e| {
        e.set("code", code);
        e.set("category", category.to_string());
    })
}

/// Stable error code for GraphQL error extensions.
#[must_use]
pub fn error_code(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::NotFound => "NOT_FOUND",
        ErrorCategory::Conflict => "CONFLICT",
        ErrorCategory::Deletion => "DELETION_FAILED",
        ErrorCategory::Auth => "UNAUTHORIZED",
        ErrorCategory::Validation => "VALIDATION_ERROR",
        ErrorCategory::Storage => "STORAGE_ERROR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commandpost_core::EntityKind;

    #[test]
    fn test_error_codes() {
        assert_eq!(error_code(ErrorCategory::NotFound), "NOT_FOUND");
        assert_eq!(error_code(ErrorCategory::Auth), "UNAUTHORIZED");
        assert_eq!(error_code(ErrorCategory::Deletion), "DELETION_FAILED");
    }

    #[test]
    fn test_message_survives_conversion() {
        let err = service_error_to_graphql(ServiceError::not_found(EntityKind::Hospital, 9));
        assert_eq!(err.message, "hospital not found: 9");
    }
}
