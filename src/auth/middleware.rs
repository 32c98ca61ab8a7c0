use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{
        header::{self, InvalidHeaderValue, AUTHORIZATION},
        HeaderValue, Method,
    },
    middleware::Next,
    response::Response,
};
use tower::{layer::util::Identity, layer::util::Stack, ServiceBuilder};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer};

use crate::auth::{extract_bearer_token, AuthError, AuthService};
use crate::error::ApiError;

/// JWT authentication middleware
pub async fn jwt_auth_middleware(
    State(auth_service): State<AuthService>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = extract_bearer_token(auth_header)?;

    let session = auth_service.validate_session(token)?;

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

/// CORS for the browser client: a single origin, credentials allowed.
pub fn cors_layer(client_url: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin = HeaderValue::from_str(client_url.trim_end_matches('/'))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true))
}

pub type SecurityHeadersLayer = ServiceBuilder<
    Stack<
        SetResponseHeaderLayer<HeaderValue>,
        Stack<SetResponseHeaderLayer<HeaderValue>, Identity>,
    >,
>;

/// `X-Content-Type-Options: nosniff` and `X-Frame-Options: DENY` on every response
pub fn security_headers_layer() -> SecurityHeadersLayer {
    ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Sliding-window request log keyed by client address (in-memory).
///
/// A client may make `max_requests` requests in any `window`. Keys with no
/// request inside the window are swept once per window.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    state: Arc<Mutex<RateLimiterState>>,
    max_requests: usize,
    window: Duration,
    trust_proxy: bool,
}

#[derive(Debug)]
struct RateLimiterState {
    requests: HashMap<String, Vec<Instant>>,
    last_sweep: Instant,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(RateLimiterState {
                requests: HashMap::new(),
                last_sweep: Instant::now(),
            })),
            max_requests,
            window,
            trust_proxy: false,
        }
    }

    /// Key clients on proxy headers. Only for deployments behind a proxy
    /// that overwrites them.
    pub fn trusting_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    pub fn check_rate_limit(&self, key: &str) -> bool {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Instant::now();
        let window = self.window;

        if now.duration_since(state.last_sweep) >= window {
            state.requests.retain(|_, times| {
                times.retain(|&time| now.duration_since(time) < window);
                !times.is_empty()
            });
            state.last_sweep = now;
        }

        let entry = state.requests.entry(key.to_string()).or_default();
        entry.retain(|&time| now.duration_since(time) < window);

        if entry.len() >= self.max_requests {
            return false;
        }

        entry.push(now);
        true
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .requests
            .len()
    }

    fn client_key(&self, request: &Request) -> String {
        if self.trust_proxy {
            if let Some(forwarded) = forwarded_client(request) {
                return forwarded;
            }
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

fn forwarded_client(request: &Request) -> Option<String> {
    let headers = request.headers();

    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|value| value.to_str().ok()))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Rate limiting middleware function
pub async fn rate_limit_middleware(
    State(rate_limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = rate_limiter.client_key(&request);

    if !rate_limiter.check_rate_limit(&client) {
        tracing::warn!(client = %client, "rate limit exceeded");
        return Err(ApiError::RateLimited);
    }

    Ok(next.run(request).await)
}
