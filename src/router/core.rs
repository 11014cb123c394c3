//! Route table - registration, verb normalization and first-match scanning.

// Part of the request hot path: no avoidable allocations while scanning.
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use super::route::{Callback, ParamVec, Route, RouteParams};
use http::Method;
use std::sync::Arc;
use tracing::{debug, info};

/// The verb universe routes can answer. Verbs outside this set are dropped
/// during registration normalization.
#[must_use]
pub fn supported_methods() -> [Method; 6] {
    [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::HEAD,
        Method::OPTIONS,
    ]
}

/// Method specification accepted by [`Router::register`].
///
/// Registration never fails: whatever arrives is normalized into a non-empty
/// verb set. `"any"` (case-insensitive) means the full supported set; verb
/// lists are uppercased and intersected with the supported set; an empty
/// result silently widens to the full set.
#[derive(Debug, Clone)]
pub enum MethodSpec {
    /// Match every supported verb.
    Any,
    /// Verb names, normalized during registration.
    Verbs(Vec<String>),
    /// Already-parsed methods, intersected with the supported set.
    Methods(Vec<Method>),
}

impl MethodSpec {
    /// Apply the registration normalization rules.
    #[must_use]
    pub fn normalize(self) -> Vec<Method> {
        let supported = supported_methods();
        let methods: Vec<Method> = match self {
            MethodSpec::Any => return supported.to_vec(),
            MethodSpec::Verbs(verbs) => verbs
                .iter()
                .filter_map(|v| Method::from_bytes(v.to_ascii_uppercase().as_bytes()).ok())
                .filter(|m| supported.contains(m))
                .collect(),
            MethodSpec::Methods(methods) => methods
                .into_iter()
                .filter(|m| supported.contains(m))
                .collect(),
        };
        if methods.is_empty() {
            // No valid verbs left: fall back to ANY.
            supported.to_vec()
        } else {
            methods
        }
    }
}

impl From<&str> for MethodSpec {
    fn from(verb: &str) -> Self {
        if verb.eq_ignore_ascii_case("any") {
            MethodSpec::Any
        } else {
            MethodSpec::Verbs(vec![verb.to_string()])
        }
    }
}

impl From<&[&str]> for MethodSpec {
    fn from(verbs: &[&str]) -> Self {
        MethodSpec::Verbs(verbs.iter().map(|v| (*v).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for MethodSpec {
    fn from(verbs: [&str; N]) -> Self {
        MethodSpec::Verbs(verbs.iter().map(|v| (*v).to_string()).collect())
    }
}

impl From<Method> for MethodSpec {
    fn from(method: Method) -> Self {
        MethodSpec::Methods(vec![method])
    }
}

impl From<Vec<Method>> for MethodSpec {
    fn from(methods: Vec<Method>) -> Self {
        MethodSpec::Methods(methods)
    }
}

/// Result of successfully matching a request path against the route table.
///
/// Ephemeral and request-scoped: the route is shared through an `Arc`, the
/// captured parameters belong to this match alone.
#[derive(Debug, Clone)]
pub struct MatchedRoute {
    /// The route that won the scan.
    pub route: Arc<Route>,
    /// Captured parameter values in placeholder order.
    pub params: ParamVec,
    /// Value of the `{language}` placeholder, if the pattern has one.
    pub language: Option<String>,
}

impl MatchedRoute {
    /// Get a captured parameter by placeholder name.
    ///
    /// Last write wins when a pattern repeats a placeholder name.
    #[inline]
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Captured values in order, the shape callbacks are invoked with.
    #[must_use]
    pub fn param_values(&self) -> Vec<String> {
        self.params.iter().map(|(_, v)| v.clone()).collect()
    }
}

/// Ordered, append-only route table.
///
/// Routes are scanned in registration order and the first match wins, so
/// more specific patterns must be registered before catch-alls. Registration
/// is a startup concern: share the table immutably (`Arc<Router>`) once
/// serving begins.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Arc<Route>>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route.
    ///
    /// `methods` accepts a verb name (`"get"`, `"any"`), a list of verb
    /// names, or parsed [`Method`]s; see [`MethodSpec`] for the
    /// normalization rules. The callback is either a closure
    /// ([`Callback::handler`]) or a string target.
    pub fn register(
        &mut self,
        methods: impl Into<MethodSpec>,
        pattern: &str,
        callback: impl Into<Callback>,
    ) {
        let route = Route::new(methods.into().normalize(), pattern, callback.into());
        debug!(
            pattern = %route.pattern(),
            methods = ?route.methods(),
            "Route registered"
        );
        self.routes.push(Arc::new(route));
    }

    /// Register under a verb name, `"any"` included.
    ///
    /// # Panics
    ///
    /// Panics when `verb` is not a supported HTTP method name or `pattern`
    /// is empty. Misspelling a verb or dropping the pattern at registration
    /// is a programmer error and should fail loudly at startup, not surface
    /// as a route that never matches. The root route is spelled `"/"`.
    pub fn verb(&mut self, verb: &str, pattern: &str, callback: impl Into<Callback>) {
        let valid = verb.eq_ignore_ascii_case("any")
            || Method::from_bytes(verb.to_ascii_uppercase().as_bytes())
                .map(|m| supported_methods().contains(&m))
                .unwrap_or(false);
        assert!(valid, "unsupported HTTP method `{verb}`");
        assert!(!pattern.is_empty(), "missing route pattern");
        self.register(verb, pattern, callback);
    }

    /// Register a route answering every supported verb.
    pub fn any(&mut self, pattern: &str, callback: impl Into<Callback>) {
        self.register(MethodSpec::Any, pattern, callback);
    }

    pub fn get(&mut self, pattern: &str, callback: impl Into<Callback>) {
        self.register(Method::GET, pattern, callback);
    }

    pub fn post(&mut self, pattern: &str, callback: impl Into<Callback>) {
        self.register(Method::POST, pattern, callback);
    }

    pub fn put(&mut self, pattern: &str, callback: impl Into<Callback>) {
        self.register(Method::PUT, pattern, callback);
    }

    pub fn delete(&mut self, pattern: &str, callback: impl Into<Callback>) {
        self.register(Method::DELETE, pattern, callback);
    }

    pub fn head(&mut self, pattern: &str, callback: impl Into<Callback>) {
        self.register(Method::HEAD, pattern, callback);
    }

    pub fn options(&mut self, pattern: &str, callback: impl Into<Callback>) {
        self.register(Method::OPTIONS, pattern, callback);
    }

    /// The registered routes, in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    /// Scan the table for the first route matching `path` and `method`.
    ///
    /// `path` must be in dispatch space (no leading slash, no query string).
    #[must_use]
    pub fn match_route(&self, path: &str, method: &Method) -> Option<MatchedRoute> {
        debug!(method = %method, path = %path, "Route match attempt");

        for route in &self.routes {
            if let Some(RouteParams { params, language }) = route.matches(path, method) {
                info!(
                    method = %method,
                    path = %path,
                    pattern = %route.pattern(),
                    params = ?params,
                    "Route matched"
                );
                return Some(MatchedRoute {
                    route: Arc::clone(route),
                    params,
                    language,
                });
            }
        }

        debug!(method = %method, path = %path, "No route matched");
        None
    }

    /// Print the route table to stdout. Debugging aid.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for route in &self.routes {
            let target = match route.callback() {
                Callback::Handler(_) => "<handler>",
                Callback::Target(s) => s.as_str(),
            };
            let verbs: Vec<&str> = route.methods().iter().map(Method::as_str).collect();
            println!("[route] {} {} -> {}", verbs.join(","), route.pattern(), target);
        }
    }
}
