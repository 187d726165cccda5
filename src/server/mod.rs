//! HTTP edge: routes, client addressing, inbound rate limiting and the serve loop.

pub mod limiter;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{ConnectInfo, Path, Query, Request, State};
use axum::http::header::{HeaderName, HeaderValue, RETRY_AFTER};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::App;
use crate::badge::BadgeKind;
use crate::config::ServiceConfig;
use crate::errors::BadgeError;
use crate::service::{BadgeResponse, BadgeService};
use crate::svg::ErrorBadge;
pub use limiter::{Decision, RateLimiter};

/// Address used when neither a proxy header nor a peer address is available.
pub const UNKNOWN_CLIENT: &str = "0.0.0.0";
const TOO_MANY: &str = "Too many requests, please try again later.";

#[derive(Clone)]
pub struct AppState {
    service: BadgeService,
    limiter: Arc<RateLimiter>,
    trust_proxy: bool,
}

impl AppState {
    pub fn new(service: BadgeService, limiter: RateLimiter, trust_proxy: bool) -> Self {
        Self { service, limiter: Arc::new(limiter), trust_proxy }
    }

    pub fn from_config(service: BadgeService, config: &ServiceConfig) -> Self {
        let limiter = RateLimiter::new(config.rate_limit_max, config.rate_limit_window());
        Self::new(service, limiter, config.trust_proxy)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/badge/{kind}", get(badge))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .with_state(state)
}

/// Serve until Ctrl-C, then stop the background sweeps.
///
/// # Errors
/// Fails if the store cannot be opened, the provider cannot be built or the
/// listener cannot bind.
pub async fn run(config: ServiceConfig) -> Result<(), BadgeError> {
    let app = App::from_config(&config)?;
    let maintenance = app.start_maintenance(&config);
    let state = AppState::from_config(app.service().clone(), &config);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    log::info!("statbadge listening on {}", listener.local_addr()?);

    let served = axum::serve(listener, router(state).into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await;
    maintenance.shutdown().await;
    served?;
    log::info!("statbadge stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("server: cannot listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("server: shutdown requested");
}

/// Client address for cooldown and rate limiting purposes.
pub fn client_addr(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy
        && let Some(forwarded) = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    {
        return forwarded.to_string();
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let addr = client_addr(&request, state.trust_proxy);
    match state.limiter.check(&addr) {
        Decision::Allowed { .. } => next.run(request).await,
        Decision::Limited { retry_after } => {
            log::warn!("server: rate limited {addr}");
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            let mut response = (StatusCode::TOO_MANY_REQUESTS, TOO_MANY).into_response();
            response.headers_mut().insert(RETRY_AFTER, HeaderValue::from(secs));
            response
        }
    }
}

/// Undecodable path or query input still yields an image, never a bare 400.
async fn badge(
    State(state): State<AppState>,
    kind: Result<Path<String>, PathRejection>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    request: Request,
) -> Response {
    let (Path(kind), Query(query)) = match (kind, query) {
        (Ok(kind), Ok(query)) => (kind, query),
        (Err(e), _) => return rejected(&e.body_text()),
        (_, Err(e)) => return rejected(&e.body_text()),
    };
    let addr = client_addr(&request, state.trust_proxy);
    into_http(state.service.handle(&kind, &query, &addr).await)
}

fn rejected(reason: &str) -> Response {
    log::debug!("badge: rejected request: {reason}");
    into_http(BadgeResponse::degraded(ErrorBadge::Generic, false))
}

fn into_http(badge: BadgeResponse) -> Response {
    let headers = badge.headers();
    let mut response = badge.svg.into_response();
    for (name, value) in headers {
        if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
            response.headers_mut().insert(name, HeaderValue::from_static(value));
        }
    }
    response
}

async fn index() -> Json<serde_json::Value> {
    let kinds: Vec<&str> = BadgeKind::ALL.iter().map(|k| k.as_str()).collect();
    Json(json!({
        "service": "statbadge",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoint": "/badge/{kind}?username={username}",
        "kinds": kinds,
        "params": ["label", "color", "labelColor", "style", "prefix", "suffix"],
    }))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
