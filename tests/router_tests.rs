//! Tests for the route table's public API
//!
//! # Test Coverage
//!
//! - Verb helpers and custom verb sets on `Router`
//! - Method-spec widening (`any`, empty and invalid verb lists)
//! - Registration-order matching and the routes accessor
//! - Placeholder capture and the `{language}` convention
//!
//! Pattern-compilation details are covered by unit tests inside the router
//! module; this file sticks to the surface a consumer sees.

use classic_router::router::{Callback, MatchedRoute, Router, LANGUAGE_PARAM};
use http::Method;

fn match_path<'r>(router: &'r Router, path: &str, method: Method) -> Option<MatchedRoute> {
    router.match_route(path, &method)
}

#[test]
fn test_verb_helpers_gate_methods() {
    let mut router = Router::new();
    router.get("read", "Pages@read");
    router.post("write", "Pages@write");
    router.put("replace", "Pages@replace");
    router.delete("remove", "Pages@remove");
    router.head("peek", "Pages@peek");
    router.options("ask", "Pages@ask");

    assert!(match_path(&router, "read", Method::GET).is_some());
    assert!(match_path(&router, "read", Method::POST).is_none());
    assert!(match_path(&router, "write", Method::POST).is_some());
    assert!(match_path(&router, "write", Method::GET).is_none());
    assert!(match_path(&router, "replace", Method::PUT).is_some());
    assert!(match_path(&router, "remove", Method::DELETE).is_some());
    assert!(match_path(&router, "peek", Method::HEAD).is_some());
    assert!(match_path(&router, "ask", Method::OPTIONS).is_some());
}

#[test]
fn test_any_accepts_every_supported_method() {
    let mut router = Router::new();
    router.any("open", "Pages@open");

    for method in [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::HEAD,
        Method::OPTIONS,
    ] {
        assert!(match_path(&router, "open", method).is_some());
    }
}

#[test]
fn test_register_accepts_custom_verb_sets() {
    let mut router = Router::new();
    router.register(["get", "post"], "edit", "Pages@edit");

    assert!(match_path(&router, "edit", Method::GET).is_some());
    assert!(match_path(&router, "edit", Method::POST).is_some());
    assert!(match_path(&router, "edit", Method::DELETE).is_none());
}

#[test]
fn test_verb_method_registers_by_name() {
    let mut router = Router::new();
    router.verb("post", "submit", "Forms@submit");
    router.verb("ANY", "open", "Pages@open");

    assert!(match_path(&router, "submit", Method::POST).is_some());
    assert!(match_path(&router, "submit", Method::GET).is_none());
    assert!(match_path(&router, "open", Method::DELETE).is_some());
}

#[test]
#[should_panic(expected = "unsupported HTTP method")]
fn test_verb_method_panics_on_garbage() {
    let mut router = Router::new();
    router.verb("sneak", "edit", "Pages@edit");
}

#[test]
fn test_registration_order_wins() {
    let mut router = Router::new();
    router.any("posts/{id}", "first");
    router.any("posts/{slug}", "second");

    let matched = match_path(&router, "posts/42", Method::GET).unwrap();
    assert_eq!(matched.get_param("id"), Some("42"));
    assert!(matched.get_param("slug").is_none());
}

#[test]
fn test_routes_accessor_reflects_registrations() {
    let mut router = Router::new();
    router.get("a", "A@a");
    router.any("b/{x}", "B@b");

    let routes = router.routes();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].pattern(), "a");
    assert_eq!(routes[1].pattern(), "b/{x}");
    assert_eq!(routes[0].methods(), &[Method::GET]);
    assert_eq!(routes[1].methods().len(), 6);
}

#[test]
fn test_placeholders_capture_in_order() {
    let mut router = Router::new();
    router.any("{language}/docs/{page}", "Docs@view");

    let matched = match_path(&router, "en/docs/install", Method::GET).unwrap();
    assert_eq!(matched.param_values(), vec!["en", "install"]);
    assert_eq!(matched.get_param(LANGUAGE_PARAM), Some("en"));
    assert_eq!(matched.language.as_deref(), Some("en"));
    assert_eq!(matched.get_param("page"), Some("install"));
}

#[test]
fn test_callback_conversions() {
    let mut router = Router::new();
    // Strings become targets, closures become handlers.
    router.any("string-target", "Admin@go");
    router.any(
        "handler-target",
        Callback::handler(|_| classic_router::response::HandlerResult::Handled),
    );

    let routes = router.routes();
    assert!(matches!(routes[0].callback(), Callback::Target(t) if t == "Admin@go"));
    assert!(matches!(routes[1].callback(), Callback::Handler(_)));
}
