//! Axum HTTP handlers for the GraphQL endpoint.
//!
//! - `POST /graphql`: query/mutation execution
//! - `GET /graphql`: GraphiQL IDE for manual exploration

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Router;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use tracing::debug;
use uuid::Uuid;

use crate::context::Caller;
use crate::schema::CommandSchema;

/// State shared across GraphQL handlers.
#[derive(Clone)]
pub struct GraphQLState {
    pub schema: CommandSchema,
}

/// Executes a GraphQL request with the caller attached.
pub async fn graphql_handler(
    State(state): State<GraphQLState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let caller = Caller::from_headers(&headers);
    let request_id = Uuid::new_v4();
    debug!(%request_id, role = ?caller.role, "executing graphql request");

    let request = req.into_inner().data(caller);
    state.schema.execute(request).await.into()
}

/// Serves the GraphiQL IDE.
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Router for the GraphQL endpoint.
pub fn routes(schema: CommandSchema) -> Router {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .with_state(GraphQLState { schema })
}
