//! GraphQL API layer.
//!
//! Exposes the service layer as a typed query/mutation schema: per-entity
//! list and by-id queries, add/update/delete/restore mutations, and the
//! event batch link mutations. The caller's access level arrives in the
//! `x-access-level` header and is threaded to the role gate through the
//! request data.

pub mod context;
pub mod error;
pub mod handler;
pub mod schema;
pub mod types;

pub use context::{ACCESS_LEVEL_HEADER, Caller};
pub use handler::{GraphQLState, routes};
pub use schema::{CommandSchema, MutationRoot, QueryRoot, build_schema};
