//! Per-client fixed-window rate limiting for the webhook endpoint.
//!
//! Each client (keyed by peer IP) gets `max_requests` per window. The window
//! starts with the client's first request and resets once it has fully
//! elapsed. Every response passing through the limiter carries the
//! `RateLimit-Limit`, `RateLimit-Remaining` and `RateLimit-Reset` headers;
//! rejected requests additionally get `Retry-After`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::config::RateLimitConfig;

/// Body of a `429 Too Many Requests` response.
pub const LIMITED_MESSAGE: &str = "Too many requests from this IP, please try again later.";

/// Key used when the peer address is unknown (e.g. in-process tests).
const UNKNOWN_CLIENT: &str = "unknown";

/// Expired windows are swept once the table grows past this size.
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// The limiter's verdict on one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the client's window resets.
    pub reset_after: Duration,
}

impl RateLimitStatus {
    fn apply_headers(&self, headers: &mut HeaderMap) {
        let reset_secs = self.reset_after.as_secs_f64().ceil() as u64;
        headers.insert("ratelimit-limit", HeaderValue::from(self.limit));
        headers.insert("ratelimit-remaining", HeaderValue::from(self.remaining));
        headers.insert("ratelimit-reset", HeaderValue::from(reset_secs));
        if !self.allowed {
            headers.insert("retry-after", HeaderValue::from(reset_secs));
        }
    }
}

/// Fixed-window request counter shared by all connections.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    clients: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        RateLimiter {
            config,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Counts a request from `client` and decides whether to let it through.
    pub fn check(&self, client: &str) -> RateLimitStatus {
        self.check_at(client, Instant::now())
    }

    /// Like [`check`](Self::check), at an explicit instant.
    pub fn check_at(&self, client: &str, now: Instant) -> RateLimitStatus {
        let window_len = self.config.window;
        let limit = self.config.max_requests;

        // Counters stay valid after a panic elsewhere.
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);

        if clients.len() > SWEEP_THRESHOLD {
            clients.retain(|_, w| now.saturating_duration_since(w.started) < window_len);
        }

        let window = clients.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.saturating_duration_since(window.started) >= window_len {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        let allowed = window.count < limit;
        if allowed {
            window.count += 1;
        }

        RateLimitStatus {
            allowed,
            limit,
            remaining: limit.saturating_sub(window.count),
            reset_after: window_len.saturating_sub(now.saturating_duration_since(window.started)),
        }
    }
}

/// Axum middleware enforcing the limit per peer IP.
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(&request);
    let status = limiter.check(&client);

    let mut response = if status.allowed {
        next.run(request).await
    } else {
        warn!(client = %client, "Rate limit exceeded");
        (StatusCode::TOO_MANY_REQUESTS, LIMITED_MESSAGE).into_response()
    };

    status.apply_headers(response.headers_mut());
    response
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
