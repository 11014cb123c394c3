//! Dispatcher core module - hot path for request dispatch.

// Part of the request hot path: no avoidable allocations off the error paths.
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use super::auto::AutoDispatchResolver;
use crate::assets::{serve_file, AssetResolver};
use crate::config::RoutingConfig;
use crate::controller::{ControllerRegistry, RESERVED_METHOD};
use crate::fsprobe::{FileProbe, NativeProbe};
use crate::response::{HandlerResult, Response};
use crate::router::{Callback, MatchedRoute, Router};
use crate::server::request::ParsedRequest;
use http::Method;
use serde_json::json;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Hook run on every routed response before it is sent.
///
/// The session layer persists its state here; assets bypass it.
pub type FinishHook = Arc<dyn Fn(&Response) + Send + Sync>;

/// What one dispatch attempt produced.
#[derive(Debug)]
pub struct DispatchOutcome {
    /// `false` only when nothing could take the request and the 404
    /// response was produced.
    pub handled: bool,
    /// The response to send; `None` when a callback reported that it
    /// already took care of the request.
    pub response: Option<Response>,
    /// The route that won the scan, if any. Carries the captured
    /// parameters and the request language.
    pub matched: Option<MatchedRoute>,
}

/// Result of trying to invoke one concrete target.
#[derive(Debug)]
pub enum Invocation {
    /// The target ran; a `None` response means it handled the request
    /// without producing one.
    Invoked(Option<Response>),
    /// The target does not exist or is not routable; dispatch continues.
    NotInvoked,
}

/// The per-application dispatch pipeline.
///
/// Owns the composition: route table, controller registry, asset resolver
/// and the convention-dispatch configuration. One dispatcher is shared
/// immutably across all serving coroutines; every per-request product is
/// returned by value.
///
/// ## Request flow
///
/// 1. `GET` requests are checked against the asset URL shapes first; a
///    recognized asset path terminates dispatch whatever the file outcome.
/// 2. The route table is scanned in order. A handler callback is invoked
///    with the captured parameters. A `Controller@method` target is invoked
///    directly. Any other string target rewrites the dispatch path and falls
///    through.
/// 3. Convention dispatch resolves the (possibly rewritten) path against the
///    application tree and invokes the resolved controller.
/// 4. Nothing took the request: a JSON 404 carrying the escaped path.
pub struct Dispatcher {
    router: Arc<Router>,
    controllers: Arc<ControllerRegistry>,
    config: Arc<RoutingConfig>,
    assets: AssetResolver,
    probe: Arc<dyn FileProbe>,
    finish_hook: Option<FinishHook>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        router: Arc<Router>,
        controllers: Arc<ControllerRegistry>,
        config: Arc<RoutingConfig>,
    ) -> Self {
        let assets = AssetResolver::new(Arc::clone(&config));
        Self {
            router,
            controllers,
            config,
            assets,
            probe: Arc::new(NativeProbe),
            finish_hook: None,
        }
    }

    /// Replace the filesystem probe. Tests resolve against fake trees.
    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn FileProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Install the finish hook run before every routed response.
    #[must_use]
    pub fn with_finish_hook(mut self, hook: FinishHook) -> Self {
        self.finish_hook = Some(hook);
        self
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn controllers(&self) -> &ControllerRegistry {
        &self.controllers
    }

    /// Run one request through the pipeline.
    pub fn dispatch(&self, req: &ParsedRequest) -> DispatchOutcome {
        let mut uri = req.path.clone();

        // Asset URLs are only ever served for GET; a recognized shape
        // terminates dispatch even when the file is missing or unreadable.
        if req.method == Method::GET {
            if let Some(path) = self.assets.resolve(&uri) {
                let response = serve_file(&path, req.header("if-modified-since"));
                return DispatchOutcome {
                    handled: true,
                    response: Some(response),
                    matched: None,
                };
            }
        }

        let mut matched: Option<MatchedRoute> = None;
        let mut attempt_auto = true;

        if let Some(m) = self.router.match_route(&uri, &req.method) {
            match m.route.callback() {
                Callback::Handler(handler) => {
                    debug!(pattern = %m.route.pattern(), "Invoking route handler");
                    let result = handler(&m.param_values());
                    let response = self.process_result(result);
                    return DispatchOutcome {
                        handled: true,
                        response,
                        matched: Some(m),
                    };
                }
                Callback::Target(target) if target.contains('@') => {
                    // A direct controller reference; never rewritten into
                    // the convention walk.
                    match self.invoke_object(m.route.callback(), &m.param_values()) {
                        Invocation::Invoked(response) => {
                            return DispatchOutcome {
                                handled: true,
                                response,
                                matched: Some(m),
                            }
                        }
                        Invocation::NotInvoked => {
                            attempt_auto = false;
                            matched = Some(m);
                        }
                    }
                }
                Callback::Target(target) => {
                    // Rewrite the dispatch path for the convention walk,
                    // expanding $n group references for pattern routes.
                    uri = match m.route.regex() {
                        Some(regex) => regex
                            .replace(&uri, brace_group_refs(target).as_ref())
                            .into_owned(),
                        None => target.clone(),
                    };
                    debug!(uri = %uri, "Route target substituted into dispatch path");
                    matched = Some(m);
                }
            }
        }

        if attempt_auto {
            if let Invocation::Invoked(response) = self.auto_dispatch(&uri) {
                return DispatchOutcome {
                    handled: true,
                    response,
                    matched,
                };
            }
        }

        warn!(method = %req.method, path = %req.path, uri = %uri, "Nothing took the request, responding 404");
        let response = Response::error(404, json!({ "error": html_escape(&uri) }));
        self.finish(&response);
        DispatchOutcome {
            handled: false,
            response: Some(response),
            matched,
        }
    }

    /// Resolve a dispatch path against the application tree and invoke the
    /// resulting controller.
    fn auto_dispatch(&self, uri: &str) -> Invocation {
        let resolver = AutoDispatchResolver::new(&self.config, self.probe.as_ref());
        match resolver.resolve(uri) {
            Some(target) => {
                self.invoke_controller(&target.identifier, &target.method, &target.params)
            }
            None => Invocation::NotInvoked,
        }
    }

    /// Invoke a controller action through the trampoline.
    ///
    /// The reserved `execute` name is rejected in any casing; the action is
    /// looked up case-insensitively and invoked under its canonical name.
    pub fn invoke_controller(
        &self,
        identifier: &str,
        method: &str,
        params: &[String],
    ) -> Invocation {
        if method.eq_ignore_ascii_case(RESERVED_METHOD) {
            warn!(controller = %identifier, "Rejected reserved trampoline method as routing target");
            return Invocation::NotInvoked;
        }

        let Some(mut controller) = self.controllers.instantiate(identifier) else {
            debug!(controller = %identifier, "Controller not registered");
            return Invocation::NotInvoked;
        };

        let Some(canonical) = controller
            .methods()
            .iter()
            .find(|name| name.eq_ignore_ascii_case(method))
            .copied()
        else {
            debug!(controller = %identifier, method = %method, "Controller method not found");
            return Invocation::NotInvoked;
        };

        info!(controller = %identifier, method = %canonical, params = ?params, "Controller invoked");
        let result = controller.execute(canonical, params);
        Invocation::Invoked(self.process_result(result))
    }

    /// Invoke a callback outside the route scan.
    ///
    /// Handlers always run; string targets must be `Controller@method`
    /// references with a routable method name.
    pub fn invoke_object(&self, callback: &Callback, params: &[String]) -> Invocation {
        match callback {
            Callback::Handler(handler) => {
                let result = handler(params);
                Invocation::Invoked(self.process_result(result))
            }
            Callback::Target(target) => {
                let Some((identifier, method)) = target.split_once('@') else {
                    warn!(target = %target, "Malformed controller reference, expected `Controller@method`");
                    return Invocation::NotInvoked;
                };
                if method.starts_with('_') {
                    debug!(target = %target, "Rejected underscore-prefixed method");
                    return Invocation::NotInvoked;
                }
                self.invoke_controller(identifier, method, params)
            }
        }
    }

    /// Finish and surface the response for a handler result. `Handled`
    /// means the callback already took care of the request: no response,
    /// no finish hook.
    fn process_result(&self, result: HandlerResult) -> Option<Response> {
        let response = match result {
            HandlerResult::Response(response) => response,
            HandlerResult::View(view) => view.into(),
            HandlerResult::Handled => return None,
        };
        self.finish(&response);
        Some(response)
    }

    fn finish(&self, response: &Response) {
        if let Some(hook) = &self.finish_hook {
            hook(response);
        }
    }
}

/// Wrap `$n` digit group references in braces before regex replacement.
///
/// Replacement group names may contain word characters, so a bare `$1_raw`
/// would read as a group named `1_raw` and expand to nothing. Rewrite
/// targets mean `$1` followed by literal text; bracing the digits pins that
/// reading. `$$` escapes and already-braced `${n}` references pass through.
fn brace_group_refs(target: &str) -> Cow<'_, str> {
    if !target.contains('$') {
        return Cow::Borrowed(target);
    }
    let mut out = String::with_capacity(target.len() + 4);
    let mut chars = target.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('$') => {
                out.push_str("$$");
                chars.next();
            }
            Some(d) if d.is_ascii_digit() => {
                out.push_str("${");
                while let Some(&d) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    out.push(d);
                    chars.next();
                }
                out.push('}');
            }
            _ => out.push('$'),
        }
    }
    Cow::Owned(out)
}

/// Escape `&`, `<`, `>` and `"` for embedding the request path in the 404
/// payload. Apostrophes pass through.
fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
