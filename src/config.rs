//! # Routing Configuration
//!
//! Filesystem layout and convention defaults for a dispatched application.
//!
//! Configuration can come from three places, lowest priority first:
//!
//! 1. Built-in defaults (`RoutingConfig::default()`)
//! 2. A TOML file with a `[routing]` table (`RoutingConfig::from_file`)
//! 3. `CLASSIC_*` environment variables (`with_env_overrides`)
//!
//! ## Environment Variables
//!
//! - `CLASSIC_ROOT_DIR` - site root holding `assets/` and `vendor/`
//! - `CLASSIC_APP_DIR` - application tree holding `Controllers/`, `Modules/`, `Templates/`
//! - `CLASSIC_DEFAULT_CONTROLLER` - controller used for the bare root URL (default `Home`)
//! - `CLASSIC_DEFAULT_METHOD` - method used when the URL names none (default `index`)
//! - `CLASSIC_CONTROLLER_EXT` - extension probed for controller files (default `rs`)
//! - `CLASSIC_STACK_SIZE` - coroutine stack size, decimal or `0x` hex (default `0x4000`)

use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Filesystem roots and convention-dispatch defaults.
///
/// `root_dir` is the site root (plain assets and vendor packages live under
/// it); `app_dir` is the application tree that convention dispatch probes for
/// controllers, modules and templates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Site root holding `assets/` and `vendor/`.
    pub root_dir: PathBuf,
    /// Application tree holding `Controllers/`, `Modules/` and `Templates/`.
    pub app_dir: PathBuf,
    /// Controller name used when the URL resolves to none.
    pub default_controller: String,
    /// Method name used when the URL names none.
    pub default_method: String,
    /// File extension probed for controller files, without the dot.
    pub controller_ext: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            app_dir: PathBuf::from("app"),
            default_controller: "Home".to_string(),
            default_method: "index".to_string(),
            controller_ext: "rs".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    routing: RoutingConfig,
}

impl RoutingConfig {
    /// Load the `[routing]` table from a TOML file.
    ///
    /// Missing keys fall back to their defaults; a missing table yields the
    /// full default configuration.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(file.routing)
    }

    /// Defaults plus any `CLASSIC_*` environment overrides.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `CLASSIC_*` environment variables over the current values.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = env::var("CLASSIC_ROOT_DIR") {
            self.root_dir = PathBuf::from(val);
        }
        if let Ok(val) = env::var("CLASSIC_APP_DIR") {
            self.app_dir = PathBuf::from(val);
        }
        if let Ok(val) = env::var("CLASSIC_DEFAULT_CONTROLLER") {
            self.default_controller = val;
        }
        if let Ok(val) = env::var("CLASSIC_DEFAULT_METHOD") {
            self.default_method = val;
        }
        if let Ok(val) = env::var("CLASSIC_CONTROLLER_EXT") {
            self.controller_ext = val;
        }
        self
    }

    /// Directory for plain asset URLs (`assets/...`).
    #[must_use]
    pub fn assets_dir(&self) -> PathBuf {
        self.root_dir.join("assets")
    }

    /// Directory holding application modules.
    #[must_use]
    pub fn modules_dir(&self) -> PathBuf {
        self.app_dir.join("Modules")
    }

    /// Directory holding application templates.
    #[must_use]
    pub fn templates_dir(&self) -> PathBuf {
        self.app_dir.join("Templates")
    }

    /// Directory holding vendor packages referenced by template descriptors.
    #[must_use]
    pub fn vendor_dir(&self) -> PathBuf {
        self.root_dir.join("vendor")
    }
}

/// Coroutine stack size from `CLASSIC_STACK_SIZE`.
///
/// Accepts decimal (`16384`) or hexadecimal (`0x4000`) values; anything
/// unparsable falls back to the 16 KB default.
#[must_use]
pub fn stack_size_from_env() -> usize {
    match env::var("CLASSIC_STACK_SIZE") {
        Ok(val) => {
            if let Some(hex) = val.strip_prefix("0x") {
                usize::from_str_radix(hex, 16).unwrap_or(0x4000)
            } else {
                val.parse().unwrap_or(0x4000)
            }
        }
        Err(_) => 0x4000,
    }
}
