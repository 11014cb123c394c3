//! # Router Module
//!
//! Ordered route table and URL pattern matching.
//!
//! ## Overview
//!
//! Routes map a verb set and a URL pattern to a callback: either an
//! invocable handler or a string target consumed by convention dispatch.
//! The table is append-only and scanned in registration order; the first
//! route that matches both the path and the method wins, so specific
//! patterns must be registered before catch-alls.
//!
//! ## Matching
//!
//! Patterns live in dispatch space (no leading slash). `{name}` segments
//! capture one path segment each; a `{language}` segment additionally tags
//! the match with a request language. Patterns without placeholders are
//! compared literally and never touch the regex engine. Parameterized
//! patterns compile lazily on their first match attempt - registration
//! stays cheap and unmatched routes never pay for compilation.
//!
//! ## Example
//!
//! ```rust
//! use classic_router::router::{Callback, Router};
//! use classic_router::response::View;
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.get(
//!     "posts/{id}",
//!     Callback::handler(|params| View::html(format!("post {}", params[0])).into()),
//! );
//! router.any("blog/{id}", "blog/posts/$1");
//!
//! let matched = router.match_route("posts/42", &Method::GET).unwrap();
//! assert_eq!(matched.get_param("id"), Some("42"));
//! ```

mod core;
mod route;

pub use core::{supported_methods, MatchedRoute, MethodSpec, Router};
pub use route::{
    Callback, HandlerFn, ParamVec, Route, RouteParams, LANGUAGE_PARAM, MAX_INLINE_PARAMS,
};
