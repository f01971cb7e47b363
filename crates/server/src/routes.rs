pub mod customers;
pub mod greetings;

use axum::{
    routing::{delete, get},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: health, docs, customer API and the greeting demo
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    // static segments win over `:id`, so `all` and the search paths are safe here
    let customer_routes = Router::new()
        .route("/api/customers", get(customers::list).post(customers::create))
        .route("/api/customers/batch", axum::routing::post(customers::batch_create))
        .route("/api/customers/all", delete(customers::delete_all))
        .route("/api/customers/searchbyname", get(customers::search_by_name))
        .route("/api/customers/searchbyemail", get(customers::search_by_email))
        .route(
            "/api/customers/:id",
            get(customers::get).put(customers::update).delete(customers::delete),
        );

    let greeting_routes = Router::new()
        .route("/hello", get(greetings::hello))
        .route("/greet", get(greetings::greet))
        .route("/square/:num", get(greetings::square))
        .route("/names", get(greetings::list_names).post(greetings::add_name));

    public
        .merge(customer_routes)
        .merge(greeting_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses are logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
