//! The response side of the data model (spec §3, §4.4).

use crate::body::{BodyCommunicator, BodyKind, IntoBody};
use crate::headers::ResponseHeaders;
use crate::status::StatusCode;

/// An outbound response: status + headers + body, built up by a handler
/// (and, on the error path, by the router itself).
#[derive(Default)]
pub struct Response {
    pub headers: ResponseHeaders,
    pub body: BodyCommunicator,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(status: StatusCode) -> Self {
        let mut headers = ResponseHeaders::new();
        headers.set_status_code(status);
        Self {
            headers,
            body: BodyCommunicator::new(),
        }
    }

    /// A `200 OK` with a text body — the common case for a handler that
    /// just wants to return a string.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        let mut headers = ResponseHeaders::new();
        headers.set_status_code(status);
        Self {
            headers,
            body: BodyCommunicator::from_text(body.into()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.headers.status_code()
    }

    pub fn set_status_code(&mut self, status: StatusCode) {
        self.headers.set_status_code(status);
    }

    /// True iff both headers and body are empty — the router's signal that
    /// no route has produced a response yet.
    pub fn empty(&self) -> bool {
        self.headers.is_empty() && self.body.empty()
    }

    /// Fills in headers a response should always carry before going out on
    /// the wire. Idempotent: running it twice in a row is the same as
    /// running it once, and it never overwrites an existing
    /// `content-type`/`content-length`.
    pub fn calculate_default_headers(&mut self) {
        if !self.headers.has("content-type") {
            let _ = self.headers.set("content-type", "text/html; charset=utf-8");
        }
        if !self.headers.has("content-length") {
            if let Some(size) = known_size(&self.body) {
                let _ = self.headers.set("content-length", size.to_string());
            }
        }
    }
}

/// `Text`/`CStream` bodies know their size up front; `Stream` bodies may
/// not (spec: "if ... `body.size()` is known").
fn known_size(body: &BodyCommunicator) -> Option<usize> {
    match body.which() {
        BodyKind::Stream => None,
        _ => body.size(),
    }
}

/// What a route handler is allowed to hand back: a full `Response`, a bare
/// status code, or anything that converts into a body (spec §4.7).
/// Returning `()` means "I already mutated `ctx.response` directly, leave
/// it alone" — see [`crate::handler`].
pub trait IntoResponse {
    fn into_response_opt(self) -> Option<Response>;
}

impl IntoResponse for Response {
    fn into_response_opt(self) -> Option<Response> {
        Some(self)
    }
}

impl IntoResponse for StatusCode {
    fn into_response_opt(self) -> Option<Response> {
        Some(Response::with_status(self))
    }
}

impl IntoResponse for String {
    fn into_response_opt(self) -> Option<Response> {
        Some(Response::text(StatusCode::OK, self))
    }
}

impl IntoResponse for &str {
    fn into_response_opt(self) -> Option<Response> {
        Some(Response::text(StatusCode::OK, self))
    }
}

impl IntoResponse for () {
    fn into_response_opt(self) -> Option<Response> {
        None
    }
}

impl<T: IntoBody> IntoResponse for (StatusCode, T) {
    fn into_response_opt(self) -> Option<Response> {
        let (status, body) = self;
        let mut response = Response::with_status(status);
        response.body = body.into_body();
        Some(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_response_is_empty() {
        let response = Response::new();
        assert!(response.empty());
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    #[test]
    fn assigning_status_leaves_body_untouched() {
        let mut response = Response::text(StatusCode::OK, "hi");
        response.set_status_code(StatusCode::NOT_FOUND);
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(response.body.data(), Some("hi"));
    }

    #[test]
    fn default_headers_fill_content_type_and_length() {
        let mut response = Response::text(StatusCode::OK, "hi");
        response.calculate_default_headers();
        assert_eq!(response.headers.get("content-type"), "text/html; charset=utf-8");
        assert_eq!(response.headers.get("content-length"), "2");
    }

    #[test]
    fn default_headers_are_idempotent() {
        let mut response = Response::text(StatusCode::OK, "hi");
        response.calculate_default_headers();
        let mut once = String::new();
        response.headers.to_string(&mut once);
        response.calculate_default_headers();
        let mut twice = String::new();
        response.headers.to_string(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn default_headers_do_not_overwrite_existing() {
        let mut response = Response::text(StatusCode::OK, "hi");
        response.headers.set("content-type", "application/json").unwrap();
        response.headers.set("content-length", "999").unwrap();
        response.calculate_default_headers();
        assert_eq!(response.headers.get("content-type"), "application/json");
        assert_eq!(response.headers.get("content-length"), "999");
    }

    #[test]
    fn stream_body_gets_no_content_length() {
        use std::io::Cursor;
        use std::sync::{Arc, Mutex};
        let mut response = Response::new();
        response.body = BodyCommunicator::from_stream(Arc::new(Mutex::new(Cursor::new(vec![1, 2, 3]))));
        response.calculate_default_headers();
        assert!(!response.headers.has("content-length"));
    }
}
