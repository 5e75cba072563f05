//! services/api/src/web/graphql.rs
//!
//! HTTP entry points for the GraphQL schema.

use async_graphql::http::{parse_query_string, GraphiQLSource};
use async_graphql::parser::{parse_query, types::OperationType};
use async_graphql::ServerError;
use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::debug;

use crate::graph::Viewer;
use crate::web::state::AppState;

/// Methods accepted on `/query`.
const ALLOWED_METHODS: &str = "OPTIONS, GET, POST";

/// POST /query - Execute a GraphQL request
pub async fn graphql_handler(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    Json(execute(&state, cookies, request).await)
}

/// GET /query - Execute a GraphQL query passed as URL parameters
///
/// Reads `query`, `operationName`, `variables` and `extensions`, the last two as
/// JSON strings. Hash-only persisted queries usually arrive this way. Only query
/// operations are allowed, so a link can never trigger a mutation.
pub async fn graphql_get_handler(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    RawQuery(params): RawQuery,
) -> Response {
    let request = match parse_query_string(params.as_deref().unwrap_or_default()) {
        Ok(request) => request,
        Err(e) => {
            debug!("Rejected malformed GET query: {}", e);
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    if has_non_query_operation(&request.query) {
        return error_response(
            StatusCode::NOT_ACCEPTABLE,
            "GET requests only allow query operations".to_string(),
        );
    }

    Json(execute(&state, cookies, request).await).into_response()
}

/// OPTIONS /query - Advertise the accepted methods
pub async fn graphql_options_handler() -> impl IntoResponse {
    (StatusCode::OK, [(header::ALLOW, ALLOWED_METHODS)])
}

/// GET / - Interactive query explorer (development only)
pub async fn explorer_handler() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/query").finish())
}

/// Runs `request` with the session user (if any) and the response cookie jar
/// attached, so resolvers can read the identity and `loginUser` can set the cookie.
async fn execute(
    state: &AppState,
    cookies: Cookies,
    request: async_graphql::Request,
) -> async_graphql::Response {
    let viewer = Viewer(state.sessions.current_user(&cookies));
    let request = request.data(viewer).data(cookies);
    state.schema.execute(request).await
}

/// True when the document parses and declares a mutation or subscription.
///
/// Unparseable documents are left to the executor, which reports the syntax error.
/// An empty document (hash-only persisted query) has nothing to inspect yet.
fn has_non_query_operation(query: &str) -> bool {
    if query.trim().is_empty() {
        return false;
    }
    parse_query(query).is_ok_and(|document| {
        document
            .operations
            .iter()
            .any(|(_, op)| op.node.ty != OperationType::Query)
    })
}

fn error_response(status: StatusCode, message: String) -> Response {
    let body = async_graphql::Response::from_errors(vec![ServerError::new(message, None)]);
    (status, Json(body)).into_response()
}
