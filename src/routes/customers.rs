use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::Response;
use bytes::{BufMut, Bytes, BytesMut};
use futures_util::StreamExt;
use std::sync::Arc;

use crate::context::AppContext;
use crate::error::{AppError, AppResult};

/// GET /all
/// Streams customer/profile pairings as newline-delimited JSON, one object
/// per pairing, written out as each pairing completes. A mid-stream failure
/// terminates the body; output already sent is not retracted.
pub async fn all_customer_profiles(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Response, AppError> {
    let lines = ctx.crm.customer_profiles().map(|item| -> AppResult<Bytes> {
        let pairing = item?;
        let line = serde_json::to_vec(&pairing)?;
        let mut buf = BytesMut::with_capacity(line.len() + 1);
        buf.put_slice(&line);
        buf.put_u8(b'\n');
        Ok(buf.freeze())
    });

    Response::builder()
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(Body::from_stream(lines))
        .map_err(|e| AppError::internal(format!("assemble stream response: {}", e)))
}
