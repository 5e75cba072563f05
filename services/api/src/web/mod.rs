pub mod auth;
pub mod graphql;
pub mod middleware;
pub mod session;
pub mod state;
pub mod templates;
pub mod todos;

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::warn;

use self::state::AppState;

/// Builds the complete HTTP application.
///
/// Public pages and the GraphQL endpoint are open; `/todos` requires a session.
/// The query explorer at `/` is only mounted in development.
pub fn router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route(
            "/register",
            get(auth::show_register_form).post(auth::register_handler),
        )
        .route("/login", get(auth::show_login_form).post(auth::login_handler))
        .route("/logout", post(auth::logout_handler))
        .route(
            "/query",
            get(graphql::graphql_get_handler)
                .post(graphql::graphql_handler)
                .options(graphql::graphql_options_handler),
        );

    let protected_routes = Router::new()
        .route("/todos", get(todos::show_todos_page))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ));

    let mut app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/static", ServeDir::new(&state.config.static_dir));

    if state.config.is_development() {
        app = app.route("/", get(graphql::explorer_handler));
    }

    if let Some(cors) = cors_layer(state.config.cors_allowed_origin.as_deref()) {
        app = app.layer(cors);
    }

    app.layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> Option<CorsLayer> {
    let origin = origin?;
    let Ok(origin) = origin.parse::<HeaderValue>() else {
        warn!("Ignoring invalid CORS_ALLOWED_ORIGIN {:?}", origin);
        return None;
    };
    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE, ACCEPT]),
    )
}
