// ============================================================================
// Proxy Route
// ============================================================================
//
// Forwards /proxy to the customer service:
// - Path rewritten to the customers endpoint
// - Request headers copied (except Host)
// - Access-Control-Allow-Origin: * added to the response
//
// Status and body pass through untouched. No routing table, no retries.
//
// ============================================================================

use crate::context::AppContext;
use crate::error::AppError;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, Response};
use std::sync::Arc;
use tracing::debug;

/// Request bodies above this size are rejected rather than buffered
const MAX_PROXY_BODY_SIZE: usize = 2 * 1024 * 1024; // 2 MB

/// Forward the request to the customer service endpoint
pub async fn proxy_customers(
    State(ctx): State<Arc<AppContext>>,
    request: Request<Body>,
) -> Result<Response<Body>, AppError> {
    let method = request.method().clone();
    let headers = request.headers().clone();

    let (_parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, MAX_PROXY_BODY_SIZE)
        .await
        .map_err(|e| AppError::internal(format!("read proxy request body: {}", e)))?;

    debug!(target = %ctx.config.customers_url, "forwarding proxy request");

    let mut upstream = ctx.http.request(method, &ctx.config.customers_url);

    // Copy headers (except Host, which reqwest sets for the target)
    for (key, value) in headers.iter() {
        if key != "host" {
            upstream = upstream.header(key, value);
        }
    }

    if !body_bytes.is_empty() {
        upstream = upstream.body(body_bytes.to_vec());
    }

    let response = upstream.send().await.map_err(AppError::from)?;
    let status = response.status();

    let mut forwarded = Response::builder().status(status);
    for (key, value) in response.headers().iter() {
        forwarded = forwarded.header(key, value);
    }
    forwarded = forwarded.header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*");

    let body_bytes = response.bytes().await.map_err(AppError::from)?;

    forwarded
        .body(Body::from(body_bytes))
        .map_err(|e| AppError::internal(format!("assemble proxy response: {}", e)))
}
