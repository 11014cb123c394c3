//! Convention dispatch resolution - URL segments to controller targets.

use crate::config::RoutingConfig;
use crate::fsprobe::FileProbe;
use crate::inflect::classify;
use std::collections::VecDeque;
use tracing::debug;

/// Outcome of a successful convention walk.
///
/// `identifier` is the controller's dispatch identifier in the fixed `App`
/// namespace (`App::Modules::Blog::Controllers::Admin::Posts`). `method` and
/// `params` are taken verbatim from the URL, case preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoTarget {
    pub identifier: String,
    pub method: String,
    pub params: Vec<String>,
}

/// Resolves URLs of the shape `module/directory/controller/method/params`
/// against the application tree.
///
/// The resolver is a pure function of the URL, the configuration and the
/// probe's answers; it holds no state and never asks whether the final
/// controller exists - that is the registry's call during invocation.
pub struct AutoDispatchResolver<'a> {
    config: &'a RoutingConfig,
    probe: &'a dyn FileProbe,
}

impl<'a> AutoDispatchResolver<'a> {
    #[must_use]
    pub fn new(config: &'a RoutingConfig, probe: &'a dyn FileProbe) -> Self {
        Self { config, probe }
    }

    /// Walk the URL into a controller target.
    ///
    /// The walk is greedy and order-sensitive:
    ///
    /// 1. The first segment is classified; when `Modules/<Name>` is a
    ///    directory it selects that module and the next segment (if any)
    ///    restarts the controller search inside it.
    /// 2. Segments keep descending into controller sub-directories as long
    ///    as no controller file with the configured extension exists at the
    ///    current position but a directory of that name does.
    /// 3. The next segment names the method, everything after it becomes
    ///    positional parameters.
    ///
    /// An empty controller falls back to the module name, then to the
    /// configured default; a missing method segment falls back to the
    /// configured default method. Returns `None` when the derived method
    /// starts with `_` - such names are never routable.
    #[must_use]
    pub fn resolve(&self, uri: &str) -> Option<AutoTarget> {
        let mut parts: VecDeque<&str> = uri.trim_matches('/').split('/').collect();

        let mut controller = parts.pop_front().map(classify).unwrap_or_default();

        // The first segment may select a module.
        let mut module_name = String::new();
        let mut base_path = String::from("Controllers/");

        if !controller.is_empty() && self.probe.is_dir(&self.config.modules_dir().join(&controller))
        {
            debug!(module = %controller, "Module directory matched");
            module_name = controller.clone();
            base_path = format!("Modules/{controller}/Controllers/");

            // Only consume another segment when one exists, so a bare
            // module URL maps to the module-named controller.
            if let Some(next) = parts.pop_front() {
                controller = classify(next);
            }
        }

        // Descend while the current name is a sub-directory rather than a
        // controller file.
        let mut directory = String::new();

        while !parts.is_empty() {
            let candidate = format!("{base_path}{directory}{controller}");
            let file = self
                .config
                .app_dir
                .join(format!("{candidate}.{}", self.config.controller_ext));

            if !self.probe.is_file(&file) && self.probe.is_dir(&self.config.app_dir.join(&candidate))
            {
                directory.push_str(&controller);
                directory.push('/');
                controller = parts.pop_front().map(classify).unwrap_or_default();
                continue;
            }

            break;
        }

        if controller.is_empty() {
            controller = if module_name.is_empty() {
                self.config.default_controller.clone()
            } else {
                module_name
            };
        }

        let method = parts
            .pop_front()
            .map(str::to_string)
            .unwrap_or_else(|| self.config.default_method.clone());

        if method.starts_with('_') {
            debug!(method = %method, "Rejected underscore-prefixed method");
            return None;
        }

        let identifier = std::iter::once("App")
            .chain(base_path.split('/'))
            .chain(directory.split('/'))
            .chain(std::iter::once(controller.as_str()))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("::");

        let params: Vec<String> = parts.into_iter().map(str::to_string).collect();

        debug!(
            identifier = %identifier,
            method = %method,
            params = ?params,
            "Convention target resolved"
        );

        Some(AutoTarget {
            identifier,
            method,
            params,
        })
    }
}
