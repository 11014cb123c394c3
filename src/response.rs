//! Framework response values.
//!
//! Route callbacks and controller actions produce a [`HandlerResult`]; the
//! dispatcher turns it into a [`Response`] and hands that to the HTTP edge.
//! Headers keep their insertion order because asset responses emit a fixed
//! header sequence that clients and caches observe.

use serde_json::Value;
use std::path::PathBuf;

/// Response body, resolved at the HTTP edge.
///
/// `File` defers reading to the server so asset bytes stream from disk
/// instead of being buffered through the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Empty,
    Bytes(Vec<u8>),
    File(PathBuf),
}

/// Status, ordered headers and body produced by dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl Response {
    /// Empty response with the given status and no headers.
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    /// JSON error response: the body is serialized as-is with an
    /// `application/json` content type.
    #[must_use]
    pub fn error(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Body::Bytes(body.to_string().into_bytes()),
        }
    }

    /// Append a header, preserving emission order.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replace the body.
    #[must_use]
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }
}

/// Rendered view content plus its content type.
///
/// Views carry no status; wrapping one into a `200` response is the
/// dispatcher's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub content: String,
    pub content_type: String,
}

impl View {
    /// HTML view with the conventional `text/html; charset=utf-8` type.
    #[must_use]
    pub fn html(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: "text/html; charset=utf-8".to_string(),
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

impl From<View> for Response {
    fn from(view: View) -> Self {
        Response {
            status: 200,
            headers: vec![("Content-Type".to_string(), view.content_type)],
            body: Body::Bytes(view.content.into_bytes()),
        }
    }
}

/// What a route callback or controller action hands back to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResult {
    /// A full response, finished and sent by the dispatcher.
    Response(Response),
    /// A view, wrapped into a `200` response and sent.
    View(View),
    /// The callback already took care of the request; nothing more is sent.
    Handled,
}

impl From<Response> for HandlerResult {
    fn from(response: Response) -> Self {
        HandlerResult::Response(response)
    }
}

impl From<View> for HandlerResult {
    fn from(view: View) -> Self {
        HandlerResult::View(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_is_json() {
        let res = Response::error(404, json!({ "error": "missing" }));
        assert_eq!(res.status, 404);
        assert_eq!(
            res.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
        assert_eq!(
            res.body,
            Body::Bytes(br#"{"error":"missing"}"#.to_vec())
        );
    }

    #[test]
    fn test_view_wraps_as_ok() {
        let res: Response = View::html("<h1>Hi</h1>").into();
        assert_eq!(res.status, 200);
        assert_eq!(res.headers[0].1, "text/html; charset=utf-8");
        assert_eq!(res.body, Body::Bytes(b"<h1>Hi</h1>".to_vec()));
    }

    #[test]
    fn test_header_order_preserved() {
        let res = Response::new(200)
            .with_header("X-One", "1")
            .with_header("X-Two", "2");
        assert_eq!(res.headers[0].0, "X-One");
        assert_eq!(res.headers[1].0, "X-Two");
    }
}
