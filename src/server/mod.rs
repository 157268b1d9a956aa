//! HTTP server for the relay.
//!
//! # Endpoints
//!
//! - `POST /github/webhook` - Accepts GitHub webhook deliveries and relays
//!   them to Discord (rate limited per client IP)
//! - `GET /health` - Returns 200 if the server is running

use std::sync::Arc;

pub mod health;
pub mod rate_limit;
pub mod webhook;

pub use health::health_handler;
pub use rate_limit::{RateLimiter, rate_limit};
pub use webhook::{WebhookError, webhook_handler};

use crate::config::{ChannelRoutes, Config, RateLimitConfig};
use crate::delivery::MessageSink;
use crate::directory::IdentityDirectory;

/// Shared application state.
///
/// Passed to handlers via Axum's `State` extractor. Everything in it is
/// immutable after startup, so clones share one allocation.
pub struct AppState<S> {
    inner: Arc<AppStateInner<S>>,
}

struct AppStateInner<S> {
    /// Repository → Discord webhook URL.
    routes: ChannelRoutes,

    /// GitHub login → Discord user ID.
    directory: IdentityDirectory,

    /// Where messages go.
    sink: S,

    rate_limit: RateLimitConfig,
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: MessageSink> AppState<S> {
    pub fn new(
        routes: ChannelRoutes,
        directory: IdentityDirectory,
        sink: S,
        rate_limit: RateLimitConfig,
    ) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                routes,
                directory,
                sink,
                rate_limit,
            }),
        }
    }

    /// Builds the state from loaded configuration.
    pub fn from_config(config: Config, sink: S) -> Self {
        Self::new(config.routes, config.directory, sink, config.rate_limit)
    }

    pub fn routes(&self) -> &ChannelRoutes {
        &self.inner.routes
    }

    pub fn directory(&self) -> &IdentityDirectory {
        &self.inner.directory
    }

    pub fn sink(&self) -> &S {
        &self.inner.sink
    }

    pub fn rate_limit(&self) -> RateLimitConfig {
        self.inner.rate_limit
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router<S: MessageSink>(app_state: AppState<S>) -> axum::Router {
    use axum::middleware::from_fn_with_state;
    use axum::routing::{get, post};

    let limiter = Arc::new(RateLimiter::new(app_state.rate_limit()));

    axum::Router::new()
        .route("/github/webhook", post(webhook_handler::<S>))
        .route_layer(from_fn_with_state(limiter, rate_limit))
        .route("/health", get(health_handler))
        .with_state(app_state)
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::test_utils::{
        RecordingSink, issue_comment_payload, pull_request_payload, review_payload,
        test_directory,
    };

    const CORE_URL: &str = "https://discord.test/api/webhooks/1/core";

    fn routes() -> ChannelRoutes {
        ChannelRoutes::from_pairs([("test-repo", CORE_URL)])
    }

    fn test_app(sink: RecordingSink) -> axum::Router {
        test_app_with_limit(sink, RateLimitConfig::default())
    }

    fn test_app_with_limit(sink: RecordingSink, rate_limit: RateLimitConfig) -> axum::Router {
        build_router(AppState::new(routes(), test_directory(), sink, rate_limit))
    }

    fn webhook_request(event_type: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/github/webhook")
            .header("content-type", "application/json")
            .header("x-github-event", event_type)
            .header("x-github-delivery", "72d3162e-cc78-11e3-81ab-4c9367dc0958")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    // ─── Health endpoint ───

    #[tokio::test]
    async fn health_returns_200() {
        let app = test_app(RecordingSink::new());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key("ratelimit-limit"));
        assert_eq!(body_text(response).await, "OK");
    }

    // ─── Request validation ───

    #[tokio::test]
    async fn missing_event_header_returns_400() {
        let sink = RecordingSink::new();
        let app = test_app(sink.clone());

        let request = Request::builder()
            .method("POST")
            .uri("/github/webhook")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(sink.deliveries().is_empty());
    }

    #[tokio::test]
    async fn invalid_json_returns_400() {
        let app = test_app(RecordingSink::new());

        let request = Request::builder()
            .method("POST")
            .uri("/github/webhook")
            .header("x-github-event", "pull_request")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn ping_returns_pong() {
        let sink = RecordingSink::new();
        let app = test_app(sink.clone());

        let response = app
            .oneshot(webhook_request("ping", &json!({ "zen": "Design for failure." })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "pong");
        assert!(sink.deliveries().is_empty());
    }

    // ─── Routing ───

    #[tokio::test]
    async fn unmapped_repo_is_acknowledged_and_dropped() {
        let sink = RecordingSink::new();
        let app = test_app(sink.clone());

        let mut payload = pull_request_payload("opened", "a", "b", None);
        payload["repository"]["name"] = json!("elsewhere");

        let response = app
            .oneshot(webhook_request("pull_request", &payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Repo not mapped");
        assert!(sink.deliveries().is_empty());
    }

    #[tokio::test]
    async fn payload_without_repository_is_unmapped() {
        let app = test_app(RecordingSink::new());

        let response = app
            .oneshot(webhook_request("pull_request", &json!({ "action": "opened" })))
            .await
            .unwrap();

        assert_eq!(body_text(response).await, "Repo not mapped");
    }

    #[tokio::test]
    async fn uninteresting_event_is_ignored() {
        let sink = RecordingSink::new();
        let app = test_app(sink.clone());

        let payload = pull_request_payload("synchronize", "a", "b", None);
        let response = app
            .oneshot(webhook_request("pull_request", &payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Event ignored");
        assert!(sink.deliveries().is_empty());
    }

    // ─── Relaying ───

    #[tokio::test]
    async fn review_request_pings_reviewer() {
        let sink = RecordingSink::new();
        let app = test_app(sink.clone());

        let payload =
            pull_request_payload("review_requested", "froster01", "froster01", Some("chaad98"));
        let response = app
            .oneshot(webhook_request("pull_request", &payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");

        let deliveries = sink.deliveries();
        assert_eq!(deliveries.len(), 1);
        let (url, message) = &deliveries[0];
        assert_eq!(url, CORE_URL);
        assert_eq!(message.content.as_deref(), Some("<@335363734446931968>"));
        assert_eq!(message.embeds.len(), 1);
    }

    #[tokio::test]
    async fn approval_pings_author() {
        let sink = RecordingSink::new();
        let app = test_app(sink.clone());

        let payload = review_payload("approved", "chaad98", "froster01");
        app.oneshot(webhook_request("pull_request_review", &payload))
            .await
            .unwrap();

        let deliveries = sink.deliveries();
        assert_eq!(
            deliveries[0].1.content.as_deref(),
            Some("<@620058726069567503>")
        );
    }

    #[tokio::test]
    async fn plain_issue_comment_is_posted_without_mentions() {
        let sink = RecordingSink::new();
        let app = test_app(sink.clone());

        let payload = issue_comment_payload("chaad98", "froster01", false);
        app.oneshot(webhook_request("issue_comment", &payload))
            .await
            .unwrap();

        let deliveries = sink.deliveries();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].1.content, None);
    }

    #[tokio::test]
    async fn delivery_failure_still_returns_200() {
        let sink = RecordingSink::failing();
        let app = test_app(sink.clone());

        let payload = pull_request_payload("opened", "froster01", "chaad98", None);
        let response = app
            .oneshot(webhook_request("pull_request", &payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
        assert_eq!(sink.deliveries().len(), 1);
    }

    // ─── Rate limiting ───

    #[tokio::test]
    async fn rate_limit_headers_on_webhook_responses() {
        let app = test_app(RecordingSink::new());

        let response = app
            .oneshot(webhook_request("ping", &json!({})))
            .await
            .unwrap();

        assert_eq!(response.headers()["ratelimit-limit"], "100");
        assert_eq!(response.headers()["ratelimit-remaining"], "99");
        assert_eq!(response.headers()["ratelimit-reset"], "900");
    }

    #[tokio::test]
    async fn over_limit_returns_429() {
        let sink = RecordingSink::new();
        let app = test_app_with_limit(
            sink.clone(),
            RateLimitConfig {
                window: Duration::from_secs(60),
                max_requests: 2,
            },
        );
        let payload = pull_request_payload("opened", "a", "b", None);

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(webhook_request("pull_request", &payload))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(webhook_request("pull_request", &payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["ratelimit-remaining"], "0");
        assert!(response.headers().contains_key("retry-after"));
        assert_eq!(body_text(response).await, rate_limit::LIMITED_MESSAGE);
        assert_eq!(sink.deliveries().len(), 2);
    }
}
