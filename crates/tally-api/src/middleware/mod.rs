//! Middleware stack for the webhook server
//!
//! Request ids, tracing, and timeouts for every route, plus Slack signature
//! verification for the command endpoint. Verification needs the raw body,
//! so the middleware buffers it and rebuilds the request for downstream
//! extractors.

use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Router,
};
use chrono::Utc;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

use tally_common::AppError;
use tally_slack::{verify_signature, SignatureError, SIGNATURE_HEADER, TIMESTAMP_HEADER};

use crate::response::ApiError;
use crate::state::AppState;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Largest webhook body accepted for signature verification
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Upper bound on request handling time
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Apply the common middleware stack to the router
pub fn apply_middleware(router: Router<AppState>) -> Router<AppState> {
    router.layer(
        ServiceBuilder::new()
            // Request ID
            .layer(SetRequestIdLayer::new(
                header::HeaderName::from_static(REQUEST_ID_HEADER),
                MakeRequestUuid,
            ))
            .layer(PropagateRequestIdLayer::new(header::HeaderName::from_static(
                REQUEST_ID_HEADER,
            )))
            // Tracing
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(|request: &Request| {
                        let request_id = request
                            .headers()
                            .get(REQUEST_ID_HEADER)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("unknown");

                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id,
                        )
                    })
                    .on_request(DefaultOnRequest::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            // Timeout (returns 503 Service Unavailable on timeout)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::SERVICE_UNAVAILABLE,
                REQUEST_TIMEOUT,
            )),
    )
}

/// Verify the Slack signature on an incoming webhook request.
///
/// Rejects before any handler runs; on success the buffered body is handed
/// back to the router untouched.
pub async fn verify_slack_signature(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();

    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(ApiError::internal)?;

    let timestamp = header_value(&parts.headers, TIMESTAMP_HEADER)?;
    let signature = header_value(&parts.headers, SIGNATURE_HEADER)?;

    verify_signature(
        &state.config().slack.signing_secret,
        timestamp,
        &bytes,
        signature,
        Utc::now(),
    )
    .map_err(|e| {
        warn!(error = %e, "webhook signature rejected");
        match e {
            SignatureError::StaleTimestamp | SignatureError::InvalidTimestamp => {
                ApiError::App(AppError::StaleTimestamp)
            }
            _ => ApiError::App(AppError::InvalidSignature),
        }
    })?;

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}

fn header_value<'a>(
    headers: &'a axum::http::HeaderMap,
    name: &'static str,
) -> Result<&'a str, ApiError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::App(AppError::MissingSignature(name)))
}
