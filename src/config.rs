//! # Explorer Configuration
//!
//! Settings for one explorer instance, read from an optional file that sits
//! next to the model document and then overridden from the environment.
//!
//! ## Environment Variables
//!
//! | Variable | Field |
//! |---|---|
//! | `EDMX_ROUTE_PREFIX` | `route_prefix` |
//! | `EDMX_SERVICE_ROOT` | `service_root` |
//! | `EDMX_ENUM_PREFIX_FREE` | `enum_prefix_free` |
//! | `EDMX_PARALLELISM` | `parallelism` |
//! | `EDMX_NAVIGATION` | `include_navigation_properties` |
//!
//! Boolean variables accept `1`, `true`, `yes` or `on` (case-insensitive);
//! anything else reads as `false`.
//!
//! ## Example (`edm-explorer.yaml`)
//!
//! ```yaml
//! route_prefix: odata
//! service_root: http://localhost:8080
//! enum_prefix_free: true
//! parallelism: 4
//! custom_routes:
//!   - template: /Health
//!     group: Diagnostics
//!     operations:
//!       - method: GET
//!         returns: Edm.String
//! ```

use crate::generator::CustomRoute;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File names probed next to the model document, in order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["edm-explorer.yaml", "edm-explorer.toml", "edm-explorer.json"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Path prefix every model route is emitted under, e.g. `odata`.
    pub route_prefix: String,
    /// Name of the model route, carried on every candidate.
    pub route_name: String,
    /// Absolute base URI that synthetic requests are issued against.
    pub service_root: String,
    /// Emit enum key literals as `'Value'` instead of `Namespace.Enum'Value'`.
    pub enum_prefix_free: bool,
    pub include_navigation_properties: bool,
    /// Worker threads used for verification; `1` verifies inline.
    pub parallelism: usize,
    pub custom_routes: Vec<CustomRoute>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            route_prefix: String::new(),
            route_name: "odata".to_string(),
            service_root: "http://localhost".to_string(),
            enum_prefix_free: false,
            include_navigation_properties: false,
            parallelism: 1,
            custom_routes: Vec::new(),
        }
    }
}

impl ExplorerConfig {
    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prefix) = lookup("EDMX_ROUTE_PREFIX") {
            self.route_prefix = prefix;
        }
        if let Some(root) = lookup("EDMX_SERVICE_ROOT") {
            self.service_root = root;
        }
        if let Some(v) = lookup("EDMX_ENUM_PREFIX_FREE") {
            self.enum_prefix_free = truthy(&v);
        }
        if let Some(v) = lookup("EDMX_NAVIGATION") {
            self.include_navigation_properties = truthy(&v);
        }
        if let Some(v) = lookup("EDMX_PARALLELISM") {
            match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => self.parallelism = n,
                _ => warn!(value = %v, "Ignoring invalid EDMX_PARALLELISM"),
            }
        }
    }

    /// Route prefix normalized to `""` or `/segment[/segment]`.
    pub fn normalized_prefix(&self) -> String {
        normalize_prefix(&self.route_prefix)
    }

    /// Parsed service root.
    pub fn service_root_url(&self) -> crate::error::Result<url::Url> {
        url::Url::parse(&self.service_root).map_err(|e| crate::error::ExplorerError::Config {
            message: format!("invalid service_root '{}': {e}", self.service_root),
        })
    }
}

pub(crate) fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Load an explorer configuration file.
///
/// Returns `Ok(None)` if the file does not exist and `Err` if it exists but
/// cannot be parsed. The format follows the extension: YAML for
/// `.yaml`/`.yml`, TOML for `.toml`, JSON otherwise.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<ExplorerConfig>> {
    if !config_path.exists() {
        debug!(path = %config_path.display(), "No explorer config file");
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read explorer config: {}", config_path.display()))?;

    let config: ExplorerConfig = match config_path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse explorer config: {}", config_path.display()))?,
        Some("toml") => toml::from_str(&contents)
            .with_context(|| format!("Failed to parse explorer config: {}", config_path.display()))?,
        _ => serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse explorer config: {}", config_path.display()))?,
    };

    Ok(Some(config))
}

/// Look for a config file alongside the model document.
pub fn auto_detect_config_path(model_path: &Path) -> Option<PathBuf> {
    let dir = model_path.parent()?;
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Resolve the effective configuration.
///
/// Priority: explicit path, then a file detected next to the model, then
/// defaults. Environment overrides are applied last in every case.
pub fn resolve_config(
    explicit_path: Option<&Path>,
    model_path: &Path,
) -> anyhow::Result<ExplorerConfig> {
    let path = explicit_path
        .map(Path::to_path_buf)
        .or_else(|| auto_detect_config_path(model_path));
    let mut config = match path {
        Some(p) => load_config(&p)?.unwrap_or_default(),
        None => ExplorerConfig::default(),
    };
    config.apply_env();
    Ok(config)
}
