//! Controller contract and registry.
//!
//! Controllers are routed to by identifier (e.g. `App::Controllers::Home`)
//! and invoked through the `execute` trampoline. The registry maps
//! identifiers to factories and stands in for runtime class lookup:
//! registration is a startup concern, resolution stays lazy until a request
//! actually needs the controller.

use crate::response::HandlerResult;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Execution-flow method reserved for the trampoline; never a routing target.
pub const RESERVED_METHOD: &str = "execute";

/// A routable controller.
///
/// [`methods`](Controller::methods) lists the action names requests may
/// target; the dispatcher resolves incoming names against it
/// case-insensitively and always enters through the
/// [`execute`](Controller::execute) trampoline, never the action directly.
pub trait Controller: Send {
    /// Action names this controller exposes to routing.
    fn methods(&self) -> &[&'static str];

    /// Run one action. `method` is the canonical name from `methods`.
    fn call_action(&mut self, method: &str, params: &[String]) -> HandlerResult;

    /// Hook run before the action.
    fn before(&mut self, _method: &str, _params: &[String]) {}

    /// Hook run after the action.
    fn after(&mut self, _result: &HandlerResult) {}

    /// Execution-flow trampoline: `before`, the action, then `after`.
    fn execute(&mut self, method: &str, params: &[String]) -> HandlerResult {
        self.before(method, params);
        let result = self.call_action(method, params);
        self.after(&result);
        result
    }
}

/// Factory producing a fresh controller instance per request.
pub type ControllerFactory = Arc<dyn Fn() -> Box<dyn Controller> + Send + Sync>;

/// Identifier → factory map.
///
/// Identifiers follow the convention-dispatch shape
/// (`App::Modules::Blog::Controllers::Posts`); whatever auto dispatch can
/// derive from a URL must be registered here to be reachable.
#[derive(Default, Clone)]
pub struct ControllerRegistry {
    factories: HashMap<String, ControllerFactory>,
}

impl ControllerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller factory under its dispatch identifier.
    ///
    /// Re-registering an identifier replaces the previous factory.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Controller> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(controller = %name, "Controller registered");
        if self
            .factories
            .insert(name.clone(), Arc::new(factory))
            .is_some()
        {
            warn!(controller = %name, "Controller factory was replaced");
        }
    }

    /// Whether an identifier is registered (the class-existence check).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build a fresh instance for one request.
    #[must_use]
    pub fn instantiate(&self, name: &str) -> Option<Box<dyn Controller>> {
        self.factories.get(name).map(|factory| factory())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::View;

    #[derive(Default)]
    struct Probe {
        calls: Vec<String>,
    }

    impl Controller for Probe {
        fn methods(&self) -> &[&'static str] {
            &["index"]
        }

        fn call_action(&mut self, method: &str, _params: &[String]) -> HandlerResult {
            self.calls.push(format!("action:{method}"));
            View::html("ok").into()
        }

        fn before(&mut self, method: &str, _params: &[String]) {
            self.calls.push(format!("before:{method}"));
        }

        fn after(&mut self, _result: &HandlerResult) {
            self.calls.push("after".to_string());
        }
    }

    #[test]
    fn test_execute_runs_hooks_in_order() {
        let mut controller = Probe::default();
        let result = controller.execute("index", &[]);
        assert!(matches!(result, HandlerResult::View(_)));
        assert_eq!(controller.calls, vec!["before:index", "action:index", "after"]);
    }

    #[test]
    fn test_registry_round_trip() {
        let mut registry = ControllerRegistry::new();
        registry.register("App::Controllers::Home", || Box::new(Probe::default()));

        assert!(registry.contains("App::Controllers::Home"));
        assert!(!registry.contains("App::Controllers::Missing"));
        assert_eq!(registry.len(), 1);
        assert!(registry.instantiate("App::Controllers::Home").is_some());
        assert!(registry.instantiate("App::Controllers::Missing").is_none());
    }
}
