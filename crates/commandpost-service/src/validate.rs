//! Referential validation.
//!
//! Read-only checks run before any write is issued. Batch operations
//! validate their entire id set first, so a single bad id fails the whole
//! mutation closed with nothing written.

use commandpost_storage::{Record, Repository, Visibility};

use crate::error::ServiceError;

/// Fails with `NotFound` unless a row with the given id exists under the
/// given visibility.
pub async fn ensure_exists<R: Record>(
    repo: &dyn Repository<R>,
    id: R::Id,
    vis: Visibility,
) -> Result<(), ServiceError> {
    match repo.find_by_id(id, vis).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::not_found(R::KIND, id)),
    }
}

/// Validates every id in the set before the caller issues any write.
pub async fn ensure_all_exist<R: Record>(
    repo: &dyn Repository<R>,
    ids: &[R::Id],
    vis: Visibility,
) -> Result<(), ServiceError> {
    for &id in ids {
        ensure_exists(repo, id, vis).await?;
    }
    Ok(())
}

/// Rejects blank required string arguments.
pub fn require_nonempty(field: &'static str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        Err(ServiceError::validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}
