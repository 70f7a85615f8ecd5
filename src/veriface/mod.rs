//! HTTP surface: router wiring, middleware stack, and the server loop.

pub mod handlers;
pub mod openapi;

use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, Request,
    },
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};

use crate::auth::AuthEngine;

/// Build the application router with the shared engine attached.
#[must_use]
pub fn router(engine: Arc<AuthEngine>) -> Router {
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/auth/signup", post(handlers::signup))
        .route("/v1/auth/verify-otp", post(handlers::verify_otp))
        .route("/v1/auth/resend-otp", post(handlers::resend_otp))
        .route("/v1/auth/login", post(handlers::login))
        .route("/v1/auth/login-password", post(handlers::login_password))
        .route("/v1/auth/logout", post(handlers::logout))
        .route("/v1/auth/session", get(handlers::session))
        .route("/v1/auth/validate-face", post(handlers::validate_face))
        .route("/v1/openapi.json", get(openapi_json))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(engine)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, engine: Arc<AuthEngine>) -> Result<()> {
    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    // Connect info feeds the signup rate limiter when no proxy headers are
    // present.
    axum::serve(
        listener,
        router(engine).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn openapi_json() -> impl IntoResponse {
    Json(openapi::openapi())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
