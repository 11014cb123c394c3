//! `may_minihttp` service adapter.
//!
//! One coroutine per connection calls [`AppService::call`]; the service
//! parses the request, runs it through the dispatcher and writes whatever
//! came back. All routing behavior lives in the dispatcher, the service
//! stays a thin edge.

use super::request::parse_request;
use super::response::write_response;
use crate::dispatcher::Dispatcher;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

#[derive(Clone)]
pub struct AppService {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppService {
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let start = Instant::now();
        let parsed = parse_request(req);
        let method = parsed.method.clone();
        let path = parsed.path.clone();

        let outcome = self.dispatcher.dispatch(&parsed);
        match outcome.response {
            Some(response) => write_response(res, &response),
            None => {
                // A callback reported the request as handled out-of-band;
                // the connection still needs a well-formed answer.
                res.status_code(204, "No Content");
            }
        }

        debug!(
            method = %method,
            path = %path,
            handled = outcome.handled,
            duration_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );
        Ok(())
    }
}
