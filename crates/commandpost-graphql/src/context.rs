//! Per-request execution context.

use std::sync::Arc;

use async_graphql::Context;
use axum::http::HeaderMap;
use tracing::warn;

use commandpost_core::Role;
use commandpost_service::CommandService;

/// Header carrying the caller's access level.
pub const ACCESS_LEVEL_HEADER: &str = "x-access-level";

/// The caller identity attached to each GraphQL request.
///
/// `role` is `None` for unauthenticated callers and for unknown access
/// levels; the role gate rejects both on gated operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Caller {
    pub role: Option<Role>,
}

impl Caller {
    /// Creates a caller with the given role.
    #[must_use]
    pub fn with_role(role: Role) -> Self {
        Self { role: Some(role) }
    }

    /// Extracts the caller from request headers.
    ///
    /// A missing header means an unauthenticated caller. A present but
    /// unknown access level is logged and treated the same way, so it
    /// fails closed at the gate instead of the transport.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(value) = headers.get(ACCESS_LEVEL_HEADER) else {
            return Self::default();
        };
        let role = value
            .to_str()
            .ok()
            .and_then(|raw| match raw.parse::<Role>() {
                Ok(role) => Some(role),
                Err(err) => {
                    warn!(error = %err, "ignoring unparseable access level header");
                    None
                }
            });
        Self { role }
    }
}

/// The service handle shared by every resolver.
pub(crate) fn service<'a>(ctx: &'a Context<'_>) -> async_graphql::Result<&'a Arc<CommandService>> {
    ctx.data::<Arc<CommandService>>()
}

/// The caller role for this request; `None` when no caller was attached.
pub(crate) fn caller_role(ctx: &Context<'_>) -> Option<Role> {
    ctx.data_opt::<Caller>().and_then(|caller| caller.role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_missing_header_means_unauthenticated() {
        let headers = HeaderMap::new();
        assert_eq!(Caller::from_headers(&headers).role, None);
    }

    #[test]
    fn test_known_access_level_is_parsed() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_LEVEL_HEADER, HeaderValue::from_static("COMMANDER"));
        assert_eq!(Caller::from_headers(&headers).role, Some(Role::Commander));
    }

    #[test]
    fn test_unknown_access_level_is_dropped() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_LEVEL_HEADER, HeaderValue::from_static("OBSERVER"));
        assert_eq!(Caller::from_headers(&headers).role, None);
    }
}
