//! Integration tests for the HTTP server and request processing pipeline
//!
//! # Test Coverage
//!
//! This module tests the complete HTTP stack:
//! - Server startup and lifecycle management
//! - End-to-end flow: raw socket → parse → dispatch → response bytes
//! - Asset serving with cache headers and 304 revalidation
//! - Convention dispatch of controllers over the wire
//! - The JSON 404 fallback
//!
//! # Test Fixtures
//!
//! `TestServer` builds a full application tree in a temp directory, starts
//! the coroutine server on a random port and tears everything down on drop.
//! Requests go through a minimal raw-TCP client so the bytes on the wire
//! are exactly what a browser would see.

mod common;

use classic_router::controller::{Controller, ControllerRegistry};
use classic_router::dispatcher::Dispatcher;
use classic_router::response::{HandlerResult, View};
use classic_router::router::{Callback, Router};
use classic_router::server::{AppService, HttpServer, ServerHandle};
use common::fixture;
use common::http::send_request;
use common::test_server::setup_may_runtime;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct Posts;

impl Controller for Posts {
    fn methods(&self) -> &[&'static str] {
        &["index", "show"]
    }

    fn call_action(&mut self, method: &str, params: &[String]) -> HandlerResult {
        match method {
            "show" => View::html(format!("post {}", params.join("/"))).into(),
            _ => View::html("all posts").into(),
        }
    }
}

/// Test fixture with automatic setup and teardown using RAII.
struct TestServer {
    // Keeps the tree alive for the server's lifetime.
    _root: TempDir,
    handle: Option<ServerHandle>,
    addr: SocketAddr,
}

impl TestServer {
    fn new() -> Self {
        setup_may_runtime();

        let root = TempDir::new().unwrap();
        let config = fixture::config_at(root.path());
        fixture::controller_file(&config.app_dir, "Controllers/Posts.rs");
        fixture::asset_file(root.path(), "assets/css/site.css", "body { margin: 0 }");

        let mut router = Router::new();
        router.get(
            "health",
            Callback::handler(|_| {
                classic_router::response::Response::new(200)
                    .with_header("Content-Type", "application/json")
                    .with_body(classic_router::response::Body::Bytes(
                        br#"{"status":"ok"}"#.to_vec(),
                    ))
                    .into()
            }),
        );
        router.any("articles/{id}", "posts/show/$1");

        let mut controllers = ControllerRegistry::new();
        controllers.register("App::Controllers::Posts", || Box::new(Posts));

        let dispatcher = Dispatcher::new(
            Arc::new(router),
            Arc::new(controllers),
            Arc::new(config),
        );

        // Bind to a random free port, then hand the address to the server.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let handle = HttpServer(AppService::new(Arc::new(dispatcher)))
            .start(addr)
            .unwrap();
        handle.wait_ready(Duration::from_secs(1)).unwrap();

        Self {
            _root: root,
            addr: handle.addr(),
            handle: Some(handle),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
    }
}

#[test]
fn test_health_route_over_the_wire() {
    let server = TestServer::new();
    let response = send_request(&server.addr, "GET", "/health", &[]);
    assert_eq!(response.status, 200);
    assert_eq!(response.header("Content-Type"), Some("application/json"));
    assert_eq!(response.body_str(), r#"{"status":"ok"}"#);
}

#[test]
fn test_rewrite_route_reaches_controller() {
    let server = TestServer::new();
    let response = send_request(&server.addr, "GET", "/articles/42", &[]);
    assert_eq!(response.status, 200);
    assert_eq!(response.header("Content-Type"), Some("text/html; charset=utf-8"));
    assert_eq!(response.body_str(), "post 42");
}

#[test]
fn test_convention_dispatch_over_the_wire() {
    let server = TestServer::new();
    let response = send_request(&server.addr, "GET", "/posts", &[]);
    assert_eq!(response.status, 200);
    assert_eq!(response.body_str(), "all posts");
}

#[test]
fn test_asset_roundtrip_with_revalidation() {
    let server = TestServer::new();

    let fresh = send_request(&server.addr, "GET", "/assets/css/site.css", &[]);
    assert_eq!(fresh.status, 200);
    assert_eq!(fresh.header("Content-type"), Some("text/css"));
    assert_eq!(fresh.header("Access-Control-Allow-Origin"), Some("*"));
    assert_eq!(fresh.header("Cache-Control"), Some("max-age=31536000"));
    assert_eq!(fresh.body_str(), "body { margin: 0 }");

    let last_modified = fresh.header("Last-Modified").unwrap().to_string();
    let revalidated = send_request(
        &server.addr,
        "GET",
        "/assets/css/site.css",
        &[("If-Modified-Since", &last_modified)],
    );
    assert_eq!(revalidated.status, 304);
    assert!(revalidated.body.is_empty());
}

#[test]
fn test_missing_asset_is_bare_404() {
    let server = TestServer::new();
    let response = send_request(&server.addr, "GET", "/assets/nope.css", &[]);
    assert_eq!(response.status, 404);
    assert!(response.body.is_empty());
}

#[test]
fn test_unresolved_request_gets_json_404() {
    let server = TestServer::new();
    let response = send_request(&server.addr, "GET", "/no/such/page", &[]);
    assert_eq!(response.status, 404);
    assert_eq!(response.header("Content-Type"), Some("application/json"));
    assert!(response.body_str().contains("no/such/page"));
}

#[test]
fn test_method_gating_over_the_wire() {
    let server = TestServer::new();
    // `health` is GET-only; POST falls through to the convention walk and
    // then the 404 fallback.
    let response = send_request(&server.addr, "POST", "/health", &[]);
    assert_eq!(response.status, 404);
}
