//! # ClassicRouter
//!
//! **ClassicRouter** is a coroutine-powered request dispatcher for Rust that
//! brings classic MVC routing conventions to the `may` runtime: explicit
//! route tables, `Controller@method` targets, URI rewriting and a
//! convention-over-configuration controller walk.
//!
//! ## Overview
//!
//! ClassicRouter resolves every request through a fixed pipeline. Explicit
//! routes are tried first; anything a route rewrites (or nothing matched at
//! all) falls through to auto-dispatch, which walks the application tree the
//! way classic MVC frameworks locate controllers by URL convention. `GET`
//! requests additionally short-circuit through an asset pipeline that serves
//! site, module and template assets straight off disk with long-lived cache
//! headers.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`router`]** - Route table with placeholder patterns and verb sets
//! - **[`dispatcher`]** - Dispatch pipeline and the convention walk
//! - **[`controller`]** - Controller trait, registry and invocation hooks
//! - **[`assets`]** - Asset URL resolution and cached file serving
//! - **[`server`]** - HTTP server built on `may_minihttp` with request and
//!   response types
//! - **[`config`]** - Routing configuration from TOML files and environment
//! - **[`inflect`]** - URL segment to type-name classification
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as HttpServer<br/>(may_minihttp)
//!     participant Dispatcher
//!     participant Assets as AssetResolver
//!     participant Router
//!     participant Auto as AutoDispatchResolver
//!     participant Controller
//!
//!     Client->>Server: GET /modules/blog/assets/css/app.css
//!     Server->>Dispatcher: dispatch(request)
//!     Dispatcher->>Assets: resolve(uri)
//!     alt Asset URL shape
//!         Assets-->>Dispatcher: file path
//!         Dispatcher-->>Client: 200 / 304 / 404 / 403
//!     end
//!
//!     Dispatcher->>Router: match_route(uri, method)
//!     alt Handler callback
//!         Router-->>Dispatcher: matched route
//!         Dispatcher->>Dispatcher: run handler
//!         Dispatcher-->>Client: response
//!     else Controller@method target
//!         Dispatcher->>Controller: before / action / after
//!         Controller-->>Client: response
//!     else String target
//!         Dispatcher->>Dispatcher: rewrite uri ($n expansion)
//!     end
//!
//!     Dispatcher->>Auto: resolve(uri)
//!     alt Controller found by convention
//!         Auto-->>Dispatcher: App::...::Controller, method, params
//!         Dispatcher->>Controller: before / action / after
//!         Controller-->>Client: response
//!     else Nothing matched
//!         Dispatcher-->>Client: 404 JSON
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use classic_router::config::RoutingConfig;
//! use classic_router::controller::ControllerRegistry;
//! use classic_router::dispatcher::Dispatcher;
//! use classic_router::response::View;
//! use classic_router::router::{Callback, Router};
//! use classic_router::server::{AppService, HttpServer};
//! use std::sync::Arc;
//!
//! let mut router = Router::new();
//! router.get(
//!     "hello/{name}",
//!     Callback::handler(|params| View::html(format!("<h1>Hello {}</h1>", params[0])).into()),
//! );
//! router.any("blog/{id}", "App::Controllers::Blog@show");
//!
//! let dispatcher = Dispatcher::new(
//!     Arc::new(router),
//!     Arc::new(ControllerRegistry::new()),
//!     Arc::new(RoutingConfig::default()),
//! );
//!
//! let server = HttpServer(AppService::new(Arc::new(dispatcher)));
//! let handle = server.start("127.0.0.1:8080").unwrap();
//! handle.join().unwrap();
//! ```
//!
//! ## Configuration
//!
//! Filesystem layout and convention defaults come from [`RoutingConfig`],
//! loadable from a TOML `[routing]` table with `CLASSIC_*` environment
//! overrides. The coroutine stack size is tuned via `CLASSIC_STACK_SIZE`.

pub mod assets;
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod fsprobe;
pub mod inflect;
pub mod response;
pub mod router;
pub mod server;

pub use config::RoutingConfig;
pub use controller::{Controller, ControllerRegistry};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use response::{Body, HandlerResult, Response, View};
pub use router::{Callback, MatchedRoute, Route, Router};
