use std::io;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use lovematch_storage::LazyRecordSink;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::handler::{CompatibilityService, HandlerError};
use crate::protocol::{
    CompatibilityRequest, CompatibilityResponse, ErrorBody, METHOD_NOT_ALLOWED_MESSAGE,
    MISSING_INPUT_MESSAGE, STORAGE_FAILURE_MESSAGE,
};

pub const COMPATIBILITY_PATH: &str = "/api/compatibility";
pub const HEALTH_PATH: &str = "/health";

#[derive(Clone)]
struct AppState {
    service: CompatibilityService,
    cors_origin: HeaderValue,
}

pub fn router(service: CompatibilityService, cors_origin: HeaderValue) -> Router {
    let state = AppState {
        service,
        cors_origin,
    };
    Router::new()
        .route(
            COMPATIBILITY_PATH,
            post(compatibility).fallback(method_not_allowed),
        )
        .route(HEALTH_PATH, get(health))
        .layer(middleware::from_fn_with_state(state.clone(), cors))
        .with_state(state)
}

/// Router wired to a lazily connected record store. Nothing touches storage
/// until the first compatibility request arrives.
pub fn app(config: &ServerConfig) -> Router {
    let records = Arc::new(LazyRecordSink::from_url(
        &config.db_url,
        config.store_timeout,
    ));
    router(
        CompatibilityService::new(records),
        config.cors_origin.clone(),
    )
}

/// Serves until ctrl-c, then drains in-flight requests.
pub async fn serve(listener: TcpListener, routes: Router) -> io::Result<()> {
    info!(addr = %listener.local_addr()?, "lovematch http listening");
    axum::serve(listener, routes)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

async fn compatibility(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match serde_json::from_slice::<CompatibilityRequest>(&body) {
        Ok(request) => request,
        Err(err) => {
            debug!(error = %err, "unparseable compatibility request body");
            CompatibilityRequest::default()
        }
    };

    match state
        .service
        .handle(request.name1.as_deref(), request.name2.as_deref())
        .await
    {
        Ok(compatibility) => Json(CompatibilityResponse { compatibility }).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody::new(METHOD_NOT_ALLOWED_MESSAGE)),
    )
        .into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingInput => (StatusCode::BAD_REQUEST, MISSING_INPUT_MESSAGE),
            Self::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, STORAGE_FAILURE_MESSAGE),
        };
        (status, Json(ErrorBody::new(message))).into_response()
    }
}

async fn cors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let preflight = request.method() == Method::OPTIONS;
    let mut response = if preflight {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, state.cors_origin.clone());
    if preflight {
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("content-type"),
        );
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));
    }
    response
}
