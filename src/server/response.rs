//! Writes framework responses onto the `may_minihttp` wire.

use crate::response::{Body, Response};
use may_minihttp::Response as RawResponse;
use std::fs;
use tracing::warn;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

/// Copy status, headers and body onto the raw response.
///
/// `Body::File` is read here, at the edge, so dispatch never buffers asset
/// bytes. A file that disappears between resolution and this read downgrades
/// the response to a bare 500.
pub fn write_response(res: &mut RawResponse, response: &Response) {
    res.status_code(response.status as usize, status_reason(response.status));

    for (name, value) in &response.headers {
        // may_minihttp emits Content-Length itself from the body it writes.
        if name.eq_ignore_ascii_case("content-length") {
            continue;
        }
        let header = format!("{name}: {value}").into_boxed_str();
        res.header(Box::leak(header));
    }

    match &response.body {
        Body::Empty => {}
        Body::Bytes(bytes) => res.body_vec(bytes.clone()),
        Body::File(path) => match fs::read(path) {
            Ok(bytes) => res.body_vec(bytes),
            Err(err) => {
                warn!(file = %path.display(), error = %err, "Asset vanished before send");
                res.status_code(500, "Internal Server Error");
            }
        },
    }
}
