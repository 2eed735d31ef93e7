//! HTTP middleware (CORS, 404 handler)

use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::{Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::types::ApiError;

/// Create CORS layer
///
/// Any origin is accepted. The request origin is echoed back rather than `*`
/// so that credentialed requests stay valid.
pub fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            header::CACHE_CONTROL,
        ])
        .allow_credentials(true)
}

const MAX_404_BODY_LOG: usize = 16 * 1024;

/// Handle 404 Not Found with logging
///
/// At debug level the request line, user agent and a preview of the body are
/// logged to help spot misrouted clients.
pub async fn handle_404(req: Request) -> ApiError {
    if tracing::enabled!(tracing::Level::DEBUG) {
        let method = req.method().clone();
        let uri = req.uri().clone();
        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();

        let body = match to_bytes(req.into_body(), MAX_404_BODY_LOG).await {
            Ok(bytes) if bytes.is_empty() => String::new(),
            Ok(bytes) => match std::str::from_utf8(&bytes) {
                Ok(text) => text.to_string(),
                Err(_) => format!("<binary {} bytes>", bytes.len()),
            },
            Err(_) => "<unreadable>".to_string(),
        };

        tracing::debug!(%method, %uri, %user_agent, %body, "[404] No route");
    }

    ApiError::not_found("NOT_FOUND", "Resource not found")
}
