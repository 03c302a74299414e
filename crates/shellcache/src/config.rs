//! Worker configuration management.
//!
//! This module handles loading and saving the worker configuration, which
//! includes the page origin, the precache manifest (local assets and external
//! resources), the trusted-host allow-list, and the on-disk store location.
//!
//! Configuration is stored at `~/.config/shellcache/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use url::Url;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "shellcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Cache version baked into generation names.
/// Bumping this orphans the previous generations, which are then purged
/// on the next activation.
const DEFAULT_CACHE_VERSION: &str = "1.0.0";

/// Default page origin (development server)
const DEFAULT_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Version string suffixed onto generation names.
    pub version: String,

    /// The page's own origin; same-origin requests go cache-first.
    pub origin: Url,

    /// Local asset paths precached into the `static` generation at install.
    pub static_assets: Vec<String>,

    /// External resource URLs precached into the `dynamic` generation at install.
    pub external_resources: Vec<String>,

    /// Hostnames served stale-while-revalidate.
    pub trusted_hosts: Vec<String>,

    /// Directory holding the persisted cache generations.
    pub store_dir: PathBuf,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_CACHE_VERSION.to_string(),
            origin: Url::parse(DEFAULT_ORIGIN).expect("default origin is valid"),
            static_assets: vec![
                "/".to_string(),
                "/static/js/bundle.js".to_string(),
                "/static/css/main.css".to_string(),
                "/manifest.json".to_string(),
                "/favicon.ico".to_string(),
                "/logo192.png".to_string(),
                "/logo512.png".to_string(),
            ],
            external_resources: vec![
                "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&display=swap".to_string(),
                "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css".to_string(),
                "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css".to_string(),
            ],
            trusted_hosts: vec![
                "fonts.googleapis.com".to_string(),
                "fonts.gstatic.com".to_string(),
                "cdn.jsdelivr.net".to_string(),
                "cdnjs.cloudflare.com".to_string(),
            ],
            store_dir: default_store_dir(),
        }
    }
}

impl WorkerConfig {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Name of the static (app shell) generation for this version.
    pub fn static_generation(&self) -> String {
        format!("static-v{}", self.version)
    }

    /// Name of the dynamic (external assets) generation for this version.
    pub fn dynamic_generation(&self) -> String {
        format!("dynamic-v{}", self.version)
    }

    /// The two generation names expected to survive activation.
    pub fn expected_generations(&self) -> [String; 2] {
        [self.static_generation(), self.dynamic_generation()]
    }

    /// Resolve a manifest asset path against the configured origin.
    pub fn resolve_asset(&self, path: &str) -> Result<Url> {
        Ok(self.origin.join(path)?)
    }

    /// URL of the root document, used as the offline navigation fallback.
    pub fn root_url(&self) -> Url {
        let mut root = self.origin.clone();
        root.set_path("/");
        root
    }
}

fn default_store_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_NAME)))
}
