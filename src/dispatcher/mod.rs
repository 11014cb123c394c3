//! # Dispatcher Module
//!
//! Drives a request through the full dispatch sequence: asset short-circuit,
//! route table scan, callback invocation, URI rewriting and the convention
//! walk, down to the 404 fallback.
//!
//! ## Overview
//!
//! The [`Dispatcher`] owns the pieces dispatch needs and runs them in a fixed
//! order:
//!
//! - `GET` requests are first checked against the asset URL shapes; a
//!   recognized shape is served from disk and terminates dispatch
//! - registered routes are scanned in registration order, first match wins
//! - handler callbacks run directly; string targets either name a
//!   `Controller@method` pair or rewrite the URI for the convention walk
//! - unrouted URIs go through [`AutoDispatchResolver`], which walks the
//!   application tree to find a controller by convention
//! - anything still unresolved answers a JSON 404
//!
//! ## Invocation
//!
//! Controller invocation is exposed separately from dispatch:
//! [`Dispatcher::invoke_controller`] and [`Dispatcher::invoke_object`] run a
//! registered controller action with before/after hooks, and report via
//! [`Invocation`] whether anything was actually invoked.
//!
//! ## Example
//!
//! ```rust,no_run
//! use classic_router::config::RoutingConfig;
//! use classic_router::controller::ControllerRegistry;
//! use classic_router::dispatcher::Dispatcher;
//! use classic_router::router::Router;
//! use classic_router::server::request::ParsedRequest;
//! use http::Method;
//! use std::sync::Arc;
//!
//! let mut router = Router::new();
//! router.any("admin/users/{id}", "App::Controllers::Admin::Users@show");
//!
//! let dispatcher = Dispatcher::new(
//!     Arc::new(router),
//!     Arc::new(ControllerRegistry::new()),
//!     Arc::new(RoutingConfig::default()),
//! );
//! let outcome = dispatcher.dispatch(&ParsedRequest::new(Method::GET, "/admin/users/7"));
//! ```

mod auto;
mod core;

pub use auto::{AutoDispatchResolver, AutoTarget};
pub use core::{DispatchOutcome, Dispatcher, FinishHook, Invocation};
