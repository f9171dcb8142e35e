//! Response finisher.
//!
//! IFTTT insists on a charset parameter for JSON even though RFC 4627 says
//! `application/json` takes none, so the header is overwritten on every
//! response, empty bodies and rejections included.

use axum::http::HeaderValue;
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Per-response marker set by handlers that render HTML.
///
/// Lives in the response extensions, so it is scoped to one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Html,
}

pub async fn force_content_type(mut response: Response) -> Response {
    let content_type = match response.extensions().get::<ResponseFormat>() {
        Some(ResponseFormat::Html) => HTML_CONTENT_TYPE,
        None => JSON_CONTENT_TYPE,
    };
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
