//! Request correlation ids.
//!
//! Every request runs inside a span carrying an id that is echoed back in
//! the `x-request-id` response header, so a client-reported failure can be
//! matched to its log lines. A client-supplied id is kept as-is.

use axum::{extract::Request, http::HeaderName, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

pub async fn request_id_middleware(req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    // Instrumenting the future keeps the span attached across awaits inside
    // the handler, not just until the first yield.
    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = request_id.parse() {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
