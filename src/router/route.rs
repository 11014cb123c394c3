//! Route definition and pattern matching - hot path for request routing.

use crate::response::HandlerResult;
use http::Method;
use once_cell::sync::OnceCell;
use regex::Regex;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Maximum number of captured parameters before heap allocation.
/// Most route patterns carry ≤4 placeholders.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the match hot path.
///
/// Placeholder names use `Arc<str>` because they come from the compiled
/// pattern (known at first match); values are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Placeholder whose captured value doubles as the request language.
pub const LANGUAGE_PARAM: &str = "language";

/// Handler invoked with the parameter values captured from the URL.
pub type HandlerFn = Arc<dyn Fn(&[String]) -> HandlerResult + Send + Sync>;

/// What a route maps to.
pub enum Callback {
    /// Invocable handler, called with the captured parameters.
    Handler(HandlerFn),
    /// String target: `Controller@method` for direct invocation, or a
    /// substitution template that rewrites the URL for convention dispatch.
    /// In templates, `$1` expands to the first captured group, with or
    /// without literal text glued on (`docs/$1_full`).
    Target(String),
}

impl Callback {
    /// Wrap a closure as an invocable callback.
    pub fn handler<F>(f: F) -> Self
    where
        F: Fn(&[String]) -> HandlerResult + Send + Sync + 'static,
    {
        Callback::Handler(Arc::new(f))
    }

    /// String target, kept verbatim until dispatch.
    pub fn target(target: impl Into<String>) -> Self {
        Callback::Target(target.into())
    }
}

impl Clone for Callback {
    fn clone(&self) -> Self {
        match self {
            Callback::Handler(f) => Callback::Handler(Arc::clone(f)),
            Callback::Target(s) => Callback::Target(s.clone()),
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Handler(_) => f.write_str("Callback::Handler(..)"),
            Callback::Target(s) => f.debug_tuple("Callback::Target").field(s).finish(),
        }
    }
}

impl From<&str> for Callback {
    fn from(target: &str) -> Self {
        Callback::Target(target.to_string())
    }
}

impl From<String> for Callback {
    fn from(target: String) -> Self {
        Callback::Target(target)
    }
}

impl From<HandlerFn> for Callback {
    fn from(f: HandlerFn) -> Self {
        Callback::Handler(f)
    }
}

/// Compiled form of a route pattern.
///
/// Literal patterns skip the regex engine entirely; parameterized patterns
/// compile to an anchored regex with one capture group per placeholder.
#[derive(Debug)]
enum Matcher {
    Literal,
    Pattern {
        regex: Regex,
        param_names: Vec<Arc<str>>,
    },
}

/// Parameters captured by a successful pattern match.
#[derive(Debug, Clone, Default)]
pub struct RouteParams {
    /// Captured values in placeholder order.
    pub params: ParamVec,
    /// Value of the `{language}` placeholder, if the pattern has one.
    pub language: Option<String>,
}

/// One registered route: verb set, URL pattern and callback.
///
/// Routes are immutable once registered. The pattern is compiled lazily on
/// the first match attempt; compilation is idempotent and thread-safe, so
/// concurrent first matches are fine. Match state is never stored on the
/// route - [`Route::matches`] returns it to the caller.
#[derive(Debug)]
pub struct Route {
    methods: Vec<Method>,
    pattern: String,
    callback: Callback,
    matcher: OnceCell<Matcher>,
}

impl Route {
    /// Build a route. Leading slashes are stripped from the pattern so all
    /// routes live in the same dispatch space as request URIs.
    #[must_use]
    pub fn new(methods: Vec<Method>, pattern: &str, callback: Callback) -> Self {
        Self {
            methods,
            pattern: pattern.trim_start_matches('/').to_string(),
            callback,
            matcher: OnceCell::new(),
        }
    }

    /// HTTP methods this route answers.
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// The normalized (slash-stripped) pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn callback(&self) -> &Callback {
        &self.callback
    }

    /// The compiled anchored regex, `None` for literal patterns.
    ///
    /// Used by dispatch to rewrite the URI of string-target routes with
    /// `$1`-style group references.
    #[must_use]
    pub fn regex(&self) -> Option<&Regex> {
        match self.matcher() {
            Matcher::Literal => None,
            Matcher::Pattern { regex, .. } => Some(regex),
        }
    }

    /// Test a request against this route.
    ///
    /// `path` must already be in dispatch space (no leading slash, no query
    /// string). Returns the captured parameters on a structural + method
    /// match; the route itself is left untouched.
    #[must_use]
    pub fn matches(&self, path: &str, method: &Method) -> Option<RouteParams> {
        if !self.methods.contains(method) {
            return None;
        }
        match self.matcher() {
            Matcher::Literal => (path == self.pattern).then(RouteParams::default),
            Matcher::Pattern { regex, param_names } => {
                let captures = regex.captures(path)?;
                let mut params = ParamVec::new();
                let mut language = None;
                for (name, capture) in param_names.iter().zip(captures.iter().skip(1)) {
                    let value = capture.map(|c| c.as_str()).unwrap_or_default().to_string();
                    if name.as_ref() == LANGUAGE_PARAM {
                        language = Some(value.clone());
                    }
                    params.push((Arc::clone(name), value));
                }
                Some(RouteParams { params, language })
            }
        }
    }

    fn matcher(&self) -> &Matcher {
        self.matcher.get_or_init(|| compile_pattern(&self.pattern))
    }
}

/// Convert a route pattern into its matcher, extracting placeholder names.
///
/// `posts/{id}` compiles to `^posts/([^/]+)$` with names `["id"]`. Segments
/// that are not a whole `{name}` placeholder are regex-escaped, so literal
/// dots and parentheses in patterns match only themselves.
fn compile_pattern(pattern: &str) -> Matcher {
    if !pattern.contains('{') {
        return Matcher::Literal;
    }

    let mut source = String::with_capacity(pattern.len() + 8);
    source.push('^');
    let mut param_names: Vec<Arc<str>> = Vec::with_capacity(pattern.matches('{').count());

    for (i, segment) in pattern.split('/').enumerate() {
        if i > 0 {
            source.push('/');
        }
        if segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}') {
            source.push_str("([^/]+)");
            param_names.push(Arc::from(&segment[1..segment.len() - 1]));
        } else {
            source.push_str(&regex::escape(segment));
        }
    }

    source.push('$');
    let regex = Regex::new(&source).expect("failed to compile route pattern");

    Matcher::Pattern { regex, param_names }
}
