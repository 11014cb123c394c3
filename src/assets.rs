//! # Asset Resolution and Serving
//!
//! Maps asset-shaped URLs onto the filesystem and serves the files with
//! long-lived cache headers.
//!
//! ## URL shapes
//!
//! Three shapes are recognized, matched case-insensitively:
//!
//! - `assets/<path>` - plain site assets under the root directory
//! - `modules/<name>/assets/<folder>/<path>` - module assets under
//!   `Modules/<Name>/Assets/`
//! - `templates/<name>/assets/<folder>/<path>` - template assets, placed by
//!   the template's `template.json` descriptor either locally under
//!   `Templates/<Name>/Assets/` or inside a vendor package under `vendor/`
//!
//! Anything else is not an asset URL and flows on to routing. A recognized
//! URL terminates dispatch whatever the file-level outcome: missing files
//! answer 404, unreadable ones 403.
//!
//! ## Caching
//!
//! Served files carry a one-year `Expires`/`Cache-Control` pair plus
//! `Last-Modified`; a request whose `If-Modified-Since` equals the file's
//! mtime to the second gets a bodyless 304 with the same cache headers.

use crate::config::RoutingConfig;
use crate::inflect::classify;
use crate::response::{Body, Response};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Browser cache lifetime for served assets: one year, in seconds.
const CACHE_LIFETIME_SECS: i64 = 60 * 60 * 24 * 365;

static PLAIN_ASSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^assets/(.*)$").expect("failed to compile asset URL regex"));

static SCOPED_ASSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(templates|modules)/([^/]+)/assets/([^/]+)/(.*)$")
        .expect("failed to compile asset URL regex")
});

/// `template.json` sidecar describing where a template's asset folders live.
///
/// ```json
/// { "assets": { "paths": { "css": "vendor" }, "vendor": "almasaeed2010/adminlte" } }
/// ```
///
/// A folder missing from `paths` is `local`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateInfo {
    #[serde(default)]
    assets: TemplateAssets,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TemplateAssets {
    /// Asset folder name → `local` | `vendor`.
    #[serde(default)]
    paths: HashMap<String, String>,
    /// Vendor package root under `vendor/`, possibly nested.
    #[serde(default)]
    vendor: String,
}

impl TemplateInfo {
    fn folder_mode(&self, folder: &str) -> &str {
        self.assets
            .paths
            .get(folder)
            .map(String::as_str)
            .unwrap_or("local")
    }

    fn vendor(&self) -> &str {
        &self.assets.vendor
    }
}

/// Maps asset URLs to candidate file paths.
///
/// Resolution is pure apart from template descriptor reads, which are
/// cached per template name once the descriptor file was readable.
pub struct AssetResolver {
    config: Arc<RoutingConfig>,
    descriptors: DashMap<String, TemplateInfo>,
}

impl AssetResolver {
    #[must_use]
    pub fn new(config: Arc<RoutingConfig>) -> Self {
        Self {
            config,
            descriptors: DashMap::new(),
        }
    }

    /// Map an asset-shaped URL to the file it names.
    ///
    /// `None` means the URL is not an asset URL (or maps nowhere, like a
    /// vendor folder without a vendor name) and dispatch should continue
    /// with routing.
    #[must_use]
    pub fn resolve(&self, uri: &str) -> Option<PathBuf> {
        if let Some(captures) = PLAIN_ASSET_RE.captures(uri) {
            return safe_join(self.config.assets_dir(), &captures[1]);
        }

        if let Some(captures) = SCOPED_ASSET_RE.captures(uri) {
            let name = classify(&captures[2]);
            let folder = &captures[3];
            let path = &captures[4];

            if captures[1].eq_ignore_ascii_case("modules") {
                return safe_join(
                    self.config.modules_dir(),
                    &format!("{name}/Assets/{folder}/{path}"),
                );
            }
            return self.template_asset_path(&name, folder, path);
        }

        None
    }

    fn template_asset_path(&self, template: &str, folder: &str, path: &str) -> Option<PathBuf> {
        // The template name feeds the descriptor read; refuse traversal
        // before touching the filesystem.
        if template == "." || template == ".." {
            return None;
        }

        let info = self.template_info(template);
        match info.folder_mode(folder) {
            "local" => safe_join(
                self.config.templates_dir(),
                &format!("{template}/Assets/{folder}/{path}"),
            ),
            "vendor" => {
                let vendor = info.vendor();
                if vendor.is_empty() {
                    debug!(
                        template = %template,
                        folder = %folder,
                        "Vendor asset folder without a vendor name"
                    );
                    return None;
                }
                safe_join(self.config.vendor_dir(), &format!("{vendor}/{folder}/{path}"))
            }
            other => {
                debug!(
                    template = %template,
                    folder = %folder,
                    mode = %other,
                    "Unknown asset folder mode"
                );
                None
            }
        }
    }

    /// Descriptor lookup with caching.
    ///
    /// Only successfully read files populate the cache: unreadable
    /// descriptors are re-probed on the next request, unparseable ones
    /// count as read and cache the empty descriptor.
    fn template_info(&self, template: &str) -> TemplateInfo {
        if let Some(info) = self.descriptors.get(template) {
            return info.clone();
        }

        let info_file = self
            .config
            .templates_dir()
            .join(template)
            .join("template.json");

        match fs::read_to_string(&info_file) {
            Ok(raw) => {
                let info: TemplateInfo = serde_json::from_str(&raw).unwrap_or_else(|err| {
                    warn!(
                        file = %info_file.display(),
                        error = %err,
                        "Malformed template descriptor"
                    );
                    TemplateInfo::default()
                });
                self.descriptors.insert(template.to_string(), info.clone());
                info
            }
            Err(_) => TemplateInfo::default(),
        }
    }
}

/// Join a URL remainder onto a base directory, refusing traversal.
fn safe_join(base: PathBuf, rest: &str) -> Option<PathBuf> {
    let mut out = base;
    for comp in Path::new(rest).components() {
        match comp {
            Component::Normal(s) => out.push(s),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(out)
}

/// Serve an asset file with the fixed cache-header set.
///
/// Always produces a response: missing files map to a bare 404, unreadable
/// ones to a bare 403. Fresh responses carry, in order,
/// `Access-Control-Allow-Origin`, `Content-type`, `Expires`,
/// `Last-Modified` and `Cache-Control`, then `Content-Length` with the body
/// streamed from disk. An `If-Modified-Since` equal to the file's mtime in
/// whole seconds short-circuits to a bodyless 304.
#[must_use]
pub fn serve_file(path: &Path, if_modified_since: Option<&str>) -> Response {
    let metadata = match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        _ => {
            debug!(file = %path.display(), "Asset not found");
            return Response::new(404);
        }
    };

    if fs::File::open(path).is_err() {
        warn!(file = %path.display(), "Asset not readable");
        return Response::new(403);
    }

    let modified: DateTime<Utc> = metadata
        .modified()
        .map(DateTime::from)
        .unwrap_or_else(|_| Utc::now());
    let expires = Utc::now() + chrono::Duration::seconds(CACHE_LIFETIME_SECS);

    let mut response = Response::new(200)
        .with_header("Access-Control-Allow-Origin", "*")
        .with_header("Content-type", content_type(path))
        .with_header("Expires", http_date(&expires))
        .with_header("Last-Modified", http_date(&modified))
        .with_header("Cache-Control", format!("max-age={CACHE_LIFETIME_SECS}"));

    if let Some(since) = if_modified_since {
        if let Ok(parsed) = DateTime::parse_from_rfc2822(since) {
            if parsed.timestamp() == modified.timestamp() {
                debug!(file = %path.display(), "Asset unchanged, responding 304");
                response.status = 304;
                return response;
            }
        }
    }

    response.headers.push((
        "Content-Length".to_string(),
        metadata.len().to_string(),
    ));
    response.body = Body::File(path.to_path_buf());
    info!(file = %path.display(), size = metadata.len(), "Asset served");
    response
}

/// HTTP-date in the `D, d M Y H:i:s GMT` shape cache headers use.
fn http_date(when: &DateTime<Utc>) -> String {
    when.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Content type by extension. `css` and `js` are pinned ahead of the guess
/// table; unknown extensions fall back to `application/octet-stream`.
fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "css" => "text/css",
        "js" => "application/javascript",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "txt" => "text/plain",
        "xml" => "text/xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
