pub mod request;
pub mod response;
pub mod service;
pub mod http_server;

pub use request::{parse_request, ParsedRequest};
pub use response::write_response;
pub use service::AppService;
pub use http_server::{HttpServer, ServerHandle};
